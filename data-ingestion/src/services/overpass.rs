// Overpass API service module
// Builds the food-places query for a bounding box and posts it to a list of
// mirror endpoints, taking the first one that answers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use shared_types::City;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
    "https://overpass.nchc.org.tw/api/interpreter",
];

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Error)]
pub enum OverpassError {
    #[error("no Overpass endpoints configured")]
    NoEndpoints,

    #[error("invalid Overpass endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        source: url::ParseError,
    },

    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: Url,
        source: reqwest::Error,
    },

    #[error("{endpoint} answered {status}: {body}")]
    Status {
        endpoint: Url,
        status: reqwest::StatusCode,
        body: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

pub fn city_bbox(city: City) -> BoundingBox {
    match city {
        City::SaoPaulo => BoundingBox {
            south: -23.8,
            west: -46.9,
            north: -23.4,
            east: -46.4,
        },
        City::Malmo => BoundingBox {
            south: 55.52,
            west: 12.9,
            north: 55.65,
            east: 13.2,
        },
        City::Copenhagen => BoundingBox {
            south: 55.6,
            west: 12.45,
            north: 55.75,
            east: 12.7,
        },
    }
}

const FOOD_AMENITIES: &str = "^(restaurant|cafe|fast_food|food_court|pub|bar|biergarten)$";

/// Overpass QL for eating places inside `bbox`; ways and relations come back
/// with a computed `center`.
pub fn build_query(bbox: &BoundingBox) -> String {
    let area = format!("{},{},{},{}", bbox.south, bbox.west, bbox.north, bbox.east);
    let mut query = String::from("[out:json][timeout:25];\n(\n");
    for kind in ["node", "way", "relation"] {
        query.push_str(&format!("  {}[\"amenity\"~\"{}\"]({});\n", kind, FOOD_AMENITIES, area));
    }
    for kind in ["node", "way", "relation"] {
        query.push_str(&format!("  {}[\"shop\"=\"kiosk\"]({});\n", kind, area));
    }
    query.push_str(");\nout center;\n");
    query
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OsmElement {
    #[serde(rename = "type")]
    pub kind: String,
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OsmElement>,
}

pub fn parse_endpoints<I, S>(endpoints: I) -> Result<Vec<Url>, OverpassError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    endpoints
        .into_iter()
        .map(|e| {
            let e = e.as_ref().trim();
            Url::parse(e).map_err(|source| OverpassError::InvalidEndpoint {
                endpoint: e.to_string(),
                source,
            })
        })
        .collect()
}

/// Tries `attempt` against each endpoint in order. Returns the first success,
/// or the last failure once every endpoint has failed.
pub async fn with_failover<T, F, Fut>(endpoints: &[Url], mut attempt: F) -> Result<T, OverpassError>
where
    F: FnMut(Url) -> Fut,
    Fut: Future<Output = Result<T, OverpassError>>,
{
    let mut last_err = OverpassError::NoEndpoints;
    for endpoint in endpoints {
        match attempt(endpoint.clone()).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::debug!(%endpoint, error = %err, "Overpass endpoint failed");
                last_err = err;
            }
        }
    }
    Err(last_err)
}

/// Where the seeding pipeline gets raw map elements for a city.
#[async_trait]
pub trait ElementSource {
    async fn fetch_city(&self, city: City) -> Result<Vec<OsmElement>, OverpassError>;
}

pub struct OverpassClient {
    client: Client,
    endpoints: Vec<Url>,
}

impl OverpassClient {
    pub fn new(endpoints: Vec<Url>) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { client, endpoints })
    }

    async fn post_query(&self, endpoint: Url, body: String) -> Result<OverpassResponse, OverpassError> {
        let response = self
            .client
            .post(endpoint.clone())
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await
            .map_err(|source| OverpassError::Http {
                endpoint: endpoint.clone(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OverpassError::Status {
                endpoint,
                status,
                body,
            });
        }

        response
            .json::<OverpassResponse>()
            .await
            .map_err(|source| OverpassError::Http { endpoint, source })
    }

    pub async fn fetch(&self, query: &str) -> Result<OverpassResponse, OverpassError> {
        let body = format!("data={}", urlencoding::encode(query));
        with_failover(&self.endpoints, |endpoint| self.post_query(endpoint, body.clone())).await
    }
}

#[async_trait]
impl ElementSource for OverpassClient {
    async fn fetch_city(&self, city: City) -> Result<Vec<OsmElement>, OverpassError> {
        let query = build_query(&city_bbox(city));
        Ok(self.fetch(&query).await?.elements)
    }
}

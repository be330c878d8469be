// Firestore REST service module
// Service-account OAuth, typed value encoding, and the commit/runQuery calls
// the places collection needs.

use crate::credentials::ServiceAccount;
use crate::services::store::PlaceStore;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shared_types::{FieldValue, Place, PlaceFilter};
use thiserror::Error;
use tokio::sync::Mutex;

pub const PLACES_COLLECTION: &str = "places";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";
const FIRESTORE_HOST: &str = "https://firestore.googleapis.com";
const TOKEN_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Error)]
pub enum FirestoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("could not sign service account assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Firestore answered {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("invalid document data: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Value encoding
// ============================================================================

/// Encodes plain JSON as a Firestore typed `Value`.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64().unwrap_or_default() }),
        },
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => json!({
            "arrayValue": { "values": items.iter().map(encode_value).collect::<Vec<_>>() }
        }),
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), encode_value(v)))
        .collect()
}

/// Decodes a Firestore typed `Value` back into plain JSON. Timestamps become
/// RFC 3339 strings and geo points `{latitude, longitude}` objects.
pub fn decode_value(value: &Value) -> Value {
    let Some((kind, inner)) = value.as_object().and_then(|o| o.iter().next()) else {
        return Value::Null;
    };
    match kind.as_str() {
        "booleanValue" | "stringValue" | "doubleValue" | "timestampValue" | "referenceValue"
        | "bytesValue" | "geoPointValue" => inner.clone(),
        "integerValue" => inner
            .as_str()
            .and_then(|s| s.parse::<i64>().ok())
            .map(Value::from)
            .unwrap_or_else(|| inner.clone()),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(k, v)| (k.clone(), decode_value(v)))
        .collect()
}

fn encode_filter_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Bool(b) => json!({ "booleanValue": b }),
        FieldValue::String(s) => json!({ "stringValue": s }),
    }
}

fn field_filter(field: &str, value: Value) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field },
            "op": "EQUAL",
            "value": value
        }
    })
}

/// `structuredQuery` over the places collection; equality filters are ANDed.
pub fn structured_query(filters: Vec<Value>) -> Value {
    let mut query = json!({ "from": [{ "collectionId": PLACES_COLLECTION }] });
    let where_clause = match filters.len() {
        0 => None,
        1 => filters.into_iter().next(),
        _ => Some(json!({ "compositeFilter": { "op": "AND", "filters": filters } })),
    };
    if let Some(clause) = where_clause {
        query["where"] = clause;
    }
    json!({ "structuredQuery": query })
}

pub fn place_filter_query(filter: &PlaceFilter) -> Value {
    structured_query(
        filter
            .constraints()
            .iter()
            .map(|c| field_filter(c.field, encode_filter_value(&c.value)))
            .collect(),
    )
}

pub fn owner_query(uid: &str) -> Value {
    let mut query = structured_query(vec![field_filter("uid", json!({ "stringValue": uid }))]);
    query["structuredQuery"]["select"] = json!({ "fields": [{ "fieldPath": "__name__" }] });
    query
}

// ============================================================================
// Auth
// ============================================================================

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

struct CachedToken {
    value: String,
    expires_at: i64,
}

enum Auth {
    ServiceAccount {
        account: ServiceAccount,
        cached: Mutex<Option<CachedToken>>,
    },
    // The emulator accepts any bearer token.
    Emulator,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    document: Option<Document>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
    create_time: Option<String>,
}

impl Document {
    fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }
}

pub struct FirestoreClient {
    client: Client,
    project_id: String,
    base_url: String,
    auth: Auth,
}

impl FirestoreClient {
    pub fn new(account: ServiceAccount) -> Result<Self, FirestoreError> {
        let project_id = account.project_id.clone();
        Ok(Self {
            client: Client::builder().build()?,
            base_url: format!("{}/v1", FIRESTORE_HOST),
            project_id,
            auth: Auth::ServiceAccount {
                account,
                cached: Mutex::new(None),
            },
        })
    }

    /// Talks to a local emulator (`FIRESTORE_EMULATOR_HOST`) without OAuth.
    pub fn emulator(host: &str, project_id: &str) -> Result<Self, FirestoreError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: format!("http://{}/v1", host.trim_end_matches('/')),
            project_id: project_id.to_string(),
            auth: Auth::Emulator,
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    fn database_path(&self) -> String {
        format!("projects/{}/databases/(default)/documents", self.project_id)
    }

    fn document_name(&self, id: &str) -> String {
        format!("{}/{}/{}", self.database_path(), PLACES_COLLECTION, id)
    }

    async fn access_token(&self) -> Result<String, FirestoreError> {
        let (account, cached) = match &self.auth {
            Auth::Emulator => return Ok("owner".to_string()),
            Auth::ServiceAccount { account, cached } => (account, cached),
        };

        let now = Utc::now().timestamp();
        let mut cached = cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at - 60 > now {
                return Ok(token.value.clone());
            }
        }

        let token_uri = account.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI);
        let claims = Claims {
            iss: &account.client_email,
            scope: DATASTORE_SCOPE,
            aud: token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let key = EncodingKey::from_rsa_pem(account.private_key.as_bytes())?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &key)?;

        let response = self
            .client
            .post(token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let response = check_status(response).await?;
        let token: TokenResponse = response.json().await?;
        tracing::debug!(expires_in = token.expires_in, "obtained Firestore access token");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });
        Ok(token.access_token)
    }

    async fn post(&self, action: &str, body: &Value) -> Result<reqwest::Response, FirestoreError> {
        let url = format!("{}/{}:{}", self.base_url, self.database_path(), action);
        let token = self.access_token().await?;
        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(body)
            .send()
            .await?;
        check_status(response).await
    }

    /// All writes go into one commit so the batch applies atomically.
    /// The write limit is enforced by the server.
    async fn commit(&self, writes: Vec<Value>) -> Result<(), FirestoreError> {
        let count = writes.len();
        self.post("commit", &commit_body(writes)).await?;
        tracing::debug!(writes = count, "committed batch");
        Ok(())
    }

    async fn run_query(&self, query: &Value) -> Result<Vec<Document>, FirestoreError> {
        let items: Vec<RunQueryItem> = self.post("runQuery", query).await?.json().await?;
        Ok(items.into_iter().filter_map(|item| item.document).collect())
    }

    fn delete_write(&self, id: &str) -> Value {
        json!({ "delete": self.document_name(id) })
    }

    fn upsert_write(&self, id: &str, place: &Place) -> Result<Value, FirestoreError> {
        let fields = match serde_json::to_value(place)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let mask: Vec<&String> = fields.keys().collect();
        Ok(json!({
            "update": {
                "name": self.document_name(id),
                "fields": encode_fields(&fields),
            },
            "updateMask": { "fieldPaths": mask },
            "updateTransforms": [
                { "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" }
            ]
        }))
    }
}

fn commit_body(writes: Vec<Value>) -> Value {
    json!({ "writes": writes })
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, FirestoreError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(FirestoreError::Api { status, body })
}

fn place_from_document(doc: &Document) -> Result<Place, serde_json::Error> {
    let mut fields = decode_fields(&doc.fields);
    // Documents written without a createdAt still sort by creation.
    if !fields.contains_key("createdAt") {
        if let Some(created) = &doc.create_time {
            fields.insert("createdAt".into(), Value::String(created.clone()));
        }
    }
    let mut place: Place = serde_json::from_value(Value::Object(fields))?;
    place.id = doc.id().to_string();
    Ok(place)
}

#[async_trait]
impl PlaceStore for FirestoreClient {
    async fn upsert_places(&self, places: &[(String, Place)]) -> Result<(), FirestoreError> {
        let writes = places
            .iter()
            .map(|(id, place)| self.upsert_write(id, place))
            .collect::<Result<Vec<_>, _>>()?;
        self.commit(writes).await
    }

    async fn ids_owned_by(&self, uid: &str) -> Result<Vec<String>, FirestoreError> {
        let docs = self.run_query(&owner_query(uid)).await?;
        Ok(docs.iter().map(|doc| doc.id().to_string()).collect())
    }

    async fn delete_places(&self, ids: &[String]) -> Result<(), FirestoreError> {
        let writes = ids.iter().map(|id| self.delete_write(id)).collect();
        self.commit(writes).await
    }

    async fn query_places(&self, filter: &PlaceFilter) -> Result<Vec<Place>, FirestoreError> {
        let docs = self.run_query(&place_filter_query(filter)).await?;
        let mut places = Vec::with_capacity(docs.len());
        for doc in &docs {
            match place_from_document(doc) {
                Ok(place) => places.push(place),
                Err(err) => tracing::warn!(document = %doc.name, error = %err, "skipping unreadable place"),
            }
        }
        Ok(places)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::{Category, City, LatLng, Supply};

    fn place() -> Place {
        Place {
            id: String::new(),
            name: "Möllan Morning Café".into(),
            city: Some(City::Malmo),
            category: Category::Cafe,
            supply: Supply::BreakfastBrunch,
            description: "Fresh pastries and hot drinks.".into(),
            street_address: "Södra Förstadsgatan".into(),
            address_number: Some("90".into()),
            neighborhood: None,
            zip_code: None,
            location: LatLng { lat: 55.5912, lng: 13.0136 },
            is_approved: true,
            uid: "seed-script".into(),
            created_at: None,
            website: None,
            telephone: None,
        }
    }

    #[test]
    fn test_encode_value_types() {
        assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
        assert_eq!(encode_value(&json!(3)), json!({ "integerValue": "3" }));
        assert_eq!(encode_value(&json!(55.5912)), json!({ "doubleValue": 55.5912 }));
        assert_eq!(
            encode_value(&json!({ "lat": 1.5, "lng": -2.5 })),
            json!({ "mapValue": { "fields": {
                "lat": { "doubleValue": 1.5 },
                "lng": { "doubleValue": -2.5 }
            } } })
        );
        assert_eq!(
            encode_value(&json!(["a"])),
            json!({ "arrayValue": { "values": [{ "stringValue": "a" }] } })
        );
    }

    #[test]
    fn test_decode_document_fields() {
        let fields = json!({
            "name": { "stringValue": "Old Spot" },
            "category": { "stringValue": "Pub" },
            "supply": { "stringValue": "Dinner" },
            "isApproved": { "booleanValue": false },
            "location": { "mapValue": { "fields": {
                "lat": { "doubleValue": 55.6 },
                "lng": { "integerValue": "13" }
            } } },
            "createdAt": { "timestampValue": "2024-03-01T12:00:00.123456Z" },
            "tags": { "arrayValue": {} }
        });
        let doc = Document {
            name: "projects/p/databases/(default)/documents/places/abc123".into(),
            fields: fields.as_object().unwrap().clone(),
            create_time: None,
        };
        let place = place_from_document(&doc).unwrap();
        assert_eq!(place.id, "abc123");
        assert_eq!(place.category, Category::Pub);
        assert_eq!(place.location, LatLng { lat: 55.6, lng: 13.0 });
        assert!(place.created_at.is_some());
        assert_eq!(place.city, None);
    }

    #[test]
    fn test_create_time_fills_missing_created_at() {
        let mut doc = Document {
            name: "places/x".into(),
            fields: Map::new(),
            create_time: Some("2023-01-01T00:00:00Z".into()),
        };
        for (k, v) in encode_fields(serde_json::to_value(place()).unwrap().as_object().unwrap()) {
            doc.fields.insert(k, v);
        }
        let place = place_from_document(&doc).unwrap();
        assert_eq!(place.created_at.unwrap().to_rfc3339(), "2023-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_upsert_write_masks_present_fields_only() {
        let client = FirestoreClient::emulator("localhost:8080", "demo").unwrap();
        let write = client.upsert_write("seed-malmo-1-x", &place()).unwrap();

        assert_eq!(
            write["update"]["name"],
            json!("projects/demo/databases/(default)/documents/places/seed-malmo-1-x")
        );
        let mask: Vec<&str> = write["updateMask"]["fieldPaths"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert!(mask.contains(&"addressNumber"));
        assert!(mask.contains(&"location"));
        assert!(!mask.contains(&"neighborhood"));
        assert!(!mask.contains(&"createdAt"));
        assert!(!mask.contains(&"id"));
        assert_eq!(
            write["updateTransforms"][0],
            json!({ "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" })
        );
    }

    #[test]
    fn test_large_delete_is_one_commit() {
        let client = FirestoreClient::emulator("localhost:8080", "demo").unwrap();
        let ids: Vec<String> = (0..501).map(|i| format!("seed-doc-{}", i)).collect();
        let body = commit_body(ids.iter().map(|id| client.delete_write(id)).collect());

        let writes = body["writes"].as_array().unwrap();
        assert_eq!(writes.len(), 501);
        assert_eq!(
            writes[500]["delete"],
            json!("projects/demo/databases/(default)/documents/places/seed-doc-500")
        );
    }

    #[test]
    fn test_place_filter_query() {
        let filter = PlaceFilter::from_selection("City", "Category", "Supply").unwrap();
        let query = place_filter_query(&filter);
        assert_eq!(
            query["structuredQuery"]["where"]["fieldFilter"]["field"]["fieldPath"],
            json!("isApproved")
        );

        let filter = PlaceFilter::from_selection("Copenhagen", "Pub", "Supply").unwrap();
        let query = place_filter_query(&filter);
        let filters = query["structuredQuery"]["where"]["compositeFilter"]["filters"]
            .as_array()
            .unwrap();
        assert_eq!(filters.len(), 3);
        assert_eq!(
            filters[1]["fieldFilter"]["value"],
            json!({ "stringValue": "Copenhagen" })
        );

        let query = place_filter_query(&PlaceFilter::default());
        assert!(query["structuredQuery"].get("where").is_none());
    }

    #[test]
    fn test_owner_query_selects_names_only() {
        let query = owner_query("seed-script");
        assert_eq!(
            query["structuredQuery"]["where"]["fieldFilter"]["value"],
            json!({ "stringValue": "seed-script" })
        );
        assert_eq!(
            query["structuredQuery"]["select"]["fields"][0]["fieldPath"],
            json!("__name__")
        );
    }
}

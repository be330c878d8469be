use crate::place::LatLng;
use serde::{Deserialize, Serialize};

const EARTH_RADIUS_METRES: f64 = 6_371_000.0;

/// Great-circle distance between two points, in metres.
pub fn haversine_distance(a: LatLng, b: LatLng) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METRES * h.sqrt().asin()
}

pub fn distance_text(metres: u64) -> String {
    if metres < 1000 {
        format!("{} m", metres)
    } else {
        format!("{:.1} km", metres as f64 / 1000.0)
    }
}

/// Distance from the user to a place, rounded to whole metres, plus its label.
pub fn distance_from(user: LatLng, place: LatLng) -> (u64, String) {
    let metres = haversine_distance(user, place).round() as u64;
    (metres, distance_text(metres))
}

/// `address` block of a Nominatim reverse-geocoding response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReverseAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReverseGeocodeResult {
    pub address: Option<ReverseAddress>,
}

/// Picks the locality name used for the city filter, most specific first.
pub fn locality_from_reverse(result: &ReverseGeocodeResult) -> Option<&str> {
    let address = result.address.as_ref()?;
    address
        .city
        .as_deref()
        .or(address.town.as_deref())
        .or(address.village.as_deref())
        .or(address.municipality.as_deref())
        .or(address.county.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_haversine_known_distance() {
        // Malmö central station to Copenhagen central station, roughly 28 km.
        let malmo = LatLng { lat: 55.6090, lng: 13.0000 };
        let copenhagen = LatLng { lat: 55.6727, lng: 12.5648 };
        let d = haversine_distance(malmo, copenhagen);
        assert!((27_000.0..29_500.0).contains(&d), "got {}", d);
        assert_eq!(haversine_distance(malmo, malmo), 0.0);
    }

    #[test]
    fn test_distance_text() {
        assert_eq!(distance_text(0), "0 m");
        assert_eq!(distance_text(999), "999 m");
        assert_eq!(distance_text(1000), "1.0 km");
        assert_eq!(distance_text(12_345), "12.3 km");

        let here = LatLng { lat: -23.5505, lng: -46.6333 };
        assert_eq!(distance_from(here, here), (0, "0 m".to_string()));
    }

    #[test]
    fn test_locality_precedence() {
        let result: ReverseGeocodeResult = serde_json::from_value(json!({
            "address": { "village": "Lomma", "county": "Skåne län" }
        }))
        .unwrap();
        assert_eq!(locality_from_reverse(&result), Some("Lomma"));

        let result: ReverseGeocodeResult = serde_json::from_value(json!({
            "address": { "city": "Malmö", "town": "Other" }
        }))
        .unwrap();
        assert_eq!(locality_from_reverse(&result), Some("Malmö"));

        assert_eq!(locality_from_reverse(&ReverseGeocodeResult::default()), None);
    }
}

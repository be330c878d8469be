use crate::seeding::hash_string;
use crate::services::overpass::OsmElement;
use shared_types::{Category, City, LatLng, Place, SEED_UID};
use std::collections::BTreeMap;

/// Maps OSM `amenity`/`shop` tags onto the app's categories. Anything not
/// recognised is treated as a restaurant.
pub fn category_from_tags(tags: &BTreeMap<String, String>) -> Category {
    let amenity = tags.get("amenity").map(String::as_str);
    let shop = tags.get("shop").map(String::as_str);

    match (amenity, shop) {
        (Some("cafe"), _) => Category::Cafe,
        (Some("restaurant"), _) => Category::Restaurant,
        (Some("fast_food" | "food_court"), _) => Category::FastFood,
        (Some("pub" | "bar" | "biergarten"), _) => Category::Pub,
        (_, Some("kiosk")) => Category::KioskGrill,
        _ => Category::Restaurant,
    }
}

fn coordinates(el: &OsmElement) -> Option<LatLng> {
    match (el.lat, el.lon, &el.center) {
        (Some(lat), Some(lng), _) => Some(LatLng { lat, lng }),
        (_, _, Some(center)) => Some(LatLng {
            lat: center.lat,
            lng: center.lon,
        }),
        _ => None,
    }
}

fn first_tag(tags: &BTreeMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| tags.get(*k))
        .find(|v| !v.is_empty())
        .cloned()
}

fn description(tags: &BTreeMap<String, String>) -> String {
    if let Some(description) = first_tag(tags, &["description"]) {
        return description;
    }
    let cuisine = first_tag(tags, &["cuisine"])
        .map(|c| format!("Cuisine: {}. ", c.replace(';', ", ")))
        .unwrap_or_default();
    format!("{}Imported from OpenStreetMap.", cuisine)
}

/// Converts one Overpass element into a seed place. Elements without a name
/// or coordinates are skipped.
pub fn place_from_element(el: &OsmElement, city: City) -> Option<Place> {
    let tags = &el.tags;
    let name = first_tag(tags, &["name"])?;
    let location = coordinates(el)?;

    let category = category_from_tags(tags);
    let seed = hash_string(&format!("{}:{}:{}", el.kind, el.id, city));

    Some(Place {
        id: String::new(),
        name,
        city: Some(city),
        category,
        supply: category.pick_supply(seed),
        description: description(tags),
        street_address: first_tag(tags, &["addr:street", "addr:place", "addr:district"])
            .unwrap_or_default(),
        address_number: first_tag(tags, &["addr:housenumber"]),
        neighborhood: first_tag(tags, &["addr:suburb", "addr:neighbourhood", "suburb"]),
        zip_code: first_tag(tags, &["addr:postcode"]),
        location,
        is_approved: true,
        uid: SEED_UID.to_string(),
        created_at: None,
        website: first_tag(tags, &["website", "contact:website"]),
        telephone: first_tag(tags, &["phone", "contact:phone"]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::overpass::Center;
    use shared_types::Supply;

    fn tags(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node(id: i64, pairs: &[(&str, &str)]) -> OsmElement {
        OsmElement {
            kind: "node".into(),
            id,
            lat: Some(55.6),
            lon: Some(13.0),
            center: None,
            tags: tags(pairs),
        }
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(category_from_tags(&tags(&[("amenity", "cafe")])), Category::Cafe);
        assert_eq!(category_from_tags(&tags(&[("amenity", "food_court")])), Category::FastFood);
        assert_eq!(category_from_tags(&tags(&[("amenity", "biergarten")])), Category::Pub);
        assert_eq!(category_from_tags(&tags(&[("shop", "kiosk")])), Category::KioskGrill);
        assert_eq!(
            category_from_tags(&tags(&[("amenity", "bar"), ("shop", "kiosk")])),
            Category::Pub
        );
        assert_eq!(category_from_tags(&tags(&[("amenity", "ice_cream")])), Category::Restaurant);
        assert_eq!(category_from_tags(&tags(&[])), Category::Restaurant);
    }

    #[test]
    fn test_supply_follows_element_seed() {
        let el = node(42, &[("amenity", "cafe"), ("name", "Kaffebar")]);
        let place = place_from_element(&el, City::Malmo).unwrap();
        let seed = hash_string("node:42:Malmö");
        assert_eq!(place.supply, Category::Cafe.pick_supply(seed));
        assert!(Category::Cafe.supply_candidates().contains(&place.supply));
        assert_eq!(
            Category::Cafe.supply_candidates()[0],
            Supply::BreakfastBrunch
        );
    }

    #[test]
    fn test_full_element() {
        let el = node(
            7,
            &[
                ("amenity", "restaurant"),
                ("name", "Bistro"),
                ("addr:street", "Västergatan"),
                ("addr:housenumber", "6"),
                ("addr:neighbourhood", "Gamla Väster"),
                ("addr:postcode", "211 21"),
                ("cuisine", "swedish;seafood"),
                ("contact:website", "https://bistro.example"),
                ("phone", "+46 40 123"),
            ],
        );
        let place = place_from_element(&el, City::Malmo).unwrap();
        assert_eq!(place.category, Category::Restaurant);
        assert_eq!(place.street_address, "Västergatan");
        assert_eq!(place.address_number.as_deref(), Some("6"));
        assert_eq!(place.neighborhood.as_deref(), Some("Gamla Väster"));
        assert_eq!(place.zip_code.as_deref(), Some("211 21"));
        assert_eq!(
            place.description,
            "Cuisine: swedish, seafood. Imported from OpenStreetMap."
        );
        assert_eq!(place.website.as_deref(), Some("https://bistro.example"));
        assert_eq!(place.telephone.as_deref(), Some("+46 40 123"));
        assert!(place.is_approved);
        assert_eq!(place.uid, SEED_UID);
    }

    #[test]
    fn test_defaults_for_sparse_tags() {
        let el = node(8, &[("amenity", "pub"), ("name", "Corner"), ("description", "Old pub.")]);
        let place = place_from_element(&el, City::Copenhagen).unwrap();
        assert_eq!(place.description, "Old pub.");
        assert_eq!(place.street_address, "");
        assert_eq!(place.address_number, None);
        assert_eq!(place.website, None);

        let el = node(9, &[("amenity", "pub"), ("name", "Plain")]);
        let place = place_from_element(&el, City::Copenhagen).unwrap();
        assert_eq!(place.description, "Imported from OpenStreetMap.");
    }

    #[test]
    fn test_way_uses_center() {
        let el = OsmElement {
            kind: "way".into(),
            id: 3,
            lat: None,
            lon: None,
            center: Some(Center { lat: -23.55, lon: -46.63 }),
            tags: tags(&[("amenity", "fast_food"), ("name", "Lanchonete")]),
        };
        let place = place_from_element(&el, City::SaoPaulo).unwrap();
        assert_eq!(place.location, LatLng { lat: -23.55, lng: -46.63 });
    }

    #[test]
    fn test_malformed_elements_are_skipped() {
        assert!(place_from_element(&node(1, &[("amenity", "cafe")]), City::Malmo).is_none());

        let mut el = node(2, &[("amenity", "cafe"), ("name", "Nowhere")]);
        el.lat = None;
        assert!(place_from_element(&el, City::Malmo).is_none());
    }
}

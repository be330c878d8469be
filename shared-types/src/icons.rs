use crate::place::Category;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const USER_ICON: &str = "/images/hangry-face-map.png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerIcon {
    pub url: String,
    pub size: (u32, u32),
    pub anchor: (u32, u32),
}

// Keyed by icon URL. The key space is one entry per category plus the user
// marker, so nothing is ever evicted.
static ICON_CACHE: Lazy<Mutex<HashMap<String, Arc<MarkerIcon>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

pub fn icon_for_category(category: Category) -> &'static str {
    match category {
        Category::Cafe => "/images/map-icons/cafe.png",
        Category::Pub => "/images/map-icons/pub.png",
        Category::Restaurant => "/images/map-icons/restaurant.png",
        Category::FastFood => "/images/map-icons/fast-food.png",
        Category::KioskGrill => "/images/map-icons/kiosk.png",
        Category::FoodTruck => "/images/map-icons/food-truck.png",
    }
}

/// Returns the shared 32x32 bottom-anchored icon for `url`, building it once.
pub fn marker_icon(url: &str) -> Arc<MarkerIcon> {
    let mut cache = ICON_CACHE.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    cache
        .entry(url.to_string())
        .or_insert_with(|| {
            Arc::new(MarkerIcon {
                url: url.to_string(),
                size: (32, 32),
                anchor: (16, 32),
            })
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_icon_is_memoized() {
        let first = marker_icon(icon_for_category(Category::Pub));
        let second = marker_icon(icon_for_category(Category::Pub));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.anchor, (16, 32));

        let user = marker_icon(USER_ICON);
        assert!(!Arc::ptr_eq(&first, &user));
    }
}

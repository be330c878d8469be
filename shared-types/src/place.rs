use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Owner id carried by every document written by the seeding script.
pub const SEED_UID: &str = "seed-script";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: {value:?}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

// Enumerations are stored as their display strings, so serde renames and
// as_str() must stay in sync.
macro_rules! display_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

display_enum!(City, "city", {
    SaoPaulo => "Sao Paulo",
    Malmo => "Malmö",
    Copenhagen => "Copenhagen",
});

display_enum!(Category, "category", {
    Cafe => "Café",
    Pub => "Pub",
    Restaurant => "Restaurant",
    FastFood => "Fast Food",
    KioskGrill => "Kiosk/grill",
    FoodTruck => "Food Truck",
});

display_enum!(Supply, "supply", {
    GeneralMenu => "General Menu",
    Lunch => "Lunch",
    AfterWork => "After Work",
    Dinner => "Dinner",
    BreakfastBrunch => "Breakfast/Brunch",
});

impl Category {
    /// Plausible supply tags for places of this category, in pick order.
    pub fn supply_candidates(&self) -> [Supply; 3] {
        use Supply::*;
        match self {
            Category::Cafe => [BreakfastBrunch, Lunch, GeneralMenu],
            Category::Pub => [AfterWork, Dinner, GeneralMenu],
            Category::FastFood | Category::Restaurant => [Lunch, Dinner, GeneralMenu],
            Category::KioskGrill | Category::FoodTruck => [GeneralMenu, Lunch, Dinner],
        }
    }

    /// Deterministically picks a supply tag using `seed`.
    pub fn pick_supply(&self, seed: u32) -> Supply {
        let candidates = self.supply_candidates();
        candidates[seed as usize % candidates.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// One document of the `places` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    /// Document id; not part of the stored fields.
    #[serde(default, skip_serializing)]
    pub id: String,
    pub name: String,
    // Older documents were written before `city` existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<City>,
    pub category: Category,
    pub supply: Supply,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub street_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    pub location: LatLng,
    #[serde(default)]
    pub is_approved: bool,
    #[serde(default)]
    pub uid: String,
    /// Assigned by the server on write; never sent by clients.
    #[serde(default, skip_serializing)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telephone: Option<String>,
}

impl Place {
    pub fn is_seeded(&self) -> bool {
        self.uid == SEED_UID
    }
}

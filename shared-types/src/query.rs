// Filter selection -> document query constraints.
// Only equality filters are emitted so any combination stays a valid
// Firestore query without a composite `in` clause.

use crate::place::{Category, City, ParseEnumError, Place, Supply};
use serde::{Deserialize, Serialize};

pub const CITY_PLACEHOLDER: &str = "City";
pub const CATEGORY_PLACEHOLDER: &str = "Category";
pub const SUPPLY_PLACEHOLDER: &str = "Supply";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    String(String),
}

/// `field == value`
#[derive(Debug, Clone, PartialEq)]
pub struct EqualityConstraint {
    pub field: &'static str,
    pub value: FieldValue,
}

impl EqualityConstraint {
    fn new(field: &'static str, value: FieldValue) -> Self {
        Self { field, value }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFilter {
    pub approved_only: bool,
    pub city: Option<City>,
    pub category: Option<Category>,
    pub supply: Option<Supply>,
}

fn parse_selection<T>(value: &str, placeholder: &str) -> Result<Option<T>, ParseEnumError>
where
    T: std::str::FromStr<Err = ParseEnumError>,
{
    let value = value.trim();
    if value == placeholder {
        return Ok(None);
    }
    value.parse().map(Some)
}

impl PlaceFilter {
    /// Builds the guest map filter from the three select values.
    /// Placeholders ("City", "Category", "Supply") and an empty city mean "any".
    /// Guests only ever see approved places.
    pub fn from_selection(city: &str, category: &str, supply: &str) -> Result<Self, ParseEnumError> {
        Ok(Self {
            approved_only: true,
            city: match city.trim() {
                "" => None,
                city => parse_selection(city, CITY_PLACEHOLDER)?,
            },
            category: parse_selection(category, CATEGORY_PLACEHOLDER)?,
            supply: parse_selection(supply, SUPPLY_PLACEHOLDER)?,
        })
    }

    pub fn constraints(&self) -> Vec<EqualityConstraint> {
        let mut constraints = Vec::with_capacity(4);
        if self.approved_only {
            constraints.push(EqualityConstraint::new("isApproved", FieldValue::Bool(true)));
        }
        if let Some(city) = self.city {
            constraints.push(EqualityConstraint::new(
                "city",
                FieldValue::String(city.as_str().to_string()),
            ));
        }
        if let Some(category) = self.category {
            constraints.push(EqualityConstraint::new(
                "category",
                FieldValue::String(category.as_str().to_string()),
            ));
        }
        if let Some(supply) = self.supply {
            constraints.push(EqualityConstraint::new(
                "supply",
                FieldValue::String(supply.as_str().to_string()),
            ));
        }
        constraints
    }

    /// In-memory evaluation of the same constraints.
    pub fn matches(&self, place: &Place) -> bool {
        (!self.approved_only || place.is_approved)
            && self.city.map_or(true, |city| place.city == Some(city))
            && self.category.map_or(true, |category| place.category == category)
            && self.supply.map_or(true, |supply| place.supply == supply)
    }
}

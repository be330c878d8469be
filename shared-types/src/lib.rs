pub mod geo;
pub mod icons;
pub mod listing;
pub mod place;
pub mod query;

pub use place::{Category, City, LatLng, ParseEnumError, Place, Supply, SEED_UID};
pub use query::{EqualityConstraint, FieldValue, PlaceFilter};

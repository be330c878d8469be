pub mod firestore;
pub mod overpass;
pub mod store;

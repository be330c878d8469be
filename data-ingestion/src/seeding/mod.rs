pub mod ids;
pub mod shuffle;

pub use ids::{document_id, hash_string, slugify};
pub use shuffle::shuffle_deterministic;

use crate::services::firestore::FirestoreError;
use async_trait::async_trait;
use shared_types::{Place, PlaceFilter};

/// Persistence seam for the `places` collection.
#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// Merge-writes every `(document id, place)` pair in one atomic batch.
    /// Fields absent from a place are left untouched on existing documents;
    /// `createdAt` is stamped by the store.
    async fn upsert_places(&self, places: &[(String, Place)]) -> Result<(), FirestoreError>;

    /// Ids of every document owned by `uid`.
    async fn ids_owned_by(&self, uid: &str) -> Result<Vec<String>, FirestoreError>;

    /// Deletes the given documents in one atomic batch.
    async fn delete_places(&self, ids: &[String]) -> Result<(), FirestoreError>;

    /// Places matching `filter`, with `id` filled in.
    async fn query_places(&self, filter: &PlaceFilter) -> Result<Vec<Place>, FirestoreError>;
}

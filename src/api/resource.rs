use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::Record;

/// A remote collection supporting the four CRUD calls.
///
/// Implementations are cheap to clone so a call can be moved onto a spawned
/// task while the view keeps its own handle.
#[async_trait]
pub trait RemoteResource: Clone + Send + Sync + 'static {
    type Record: Record;
    /// Payload for creating a record
    type Draft: Send + 'static;
    /// Payload for replacing fields of an existing record
    type Changes: Send + 'static;

    async fn list(&self) -> Result<Vec<Self::Record>, ApiError>;

    async fn create(&self, draft: Self::Draft) -> Result<Self::Record, ApiError>;

    async fn update(&self, id: u64, changes: Self::Changes) -> Result<Self::Record, ApiError>;

    async fn remove(&self, id: u64) -> Result<(), ApiError>;
}

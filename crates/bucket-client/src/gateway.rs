//! The contract every array store implementation fulfils.

use async_trait::async_trait;

use bucket_model::{ArrayId, ArrayRecord, Page, SortOutcome};

use crate::error::Result;

/// Create/read/update/delete/list/sort calls against the array store.
///
/// Every call is an await point. Implementations never retry; a failed call
/// is reported once and the caller decides what happens next.
#[async_trait]
pub trait RemoteArrayGateway: Send + Sync {
    /// Fetch one listing page (1-based).
    async fn list(&self, page: u32) -> Result<Page>;

    /// Fetch one array. A missing id is [`GatewayError::NotFound`].
    ///
    /// [`GatewayError::NotFound`]: crate::GatewayError::NotFound
    async fn read(&self, id: ArrayId) -> Result<ArrayRecord>;

    /// Store a new, unsorted array and return the record with its new id.
    async fn create(&self, data: &[i64]) -> Result<ArrayRecord>;

    /// Replace the data and sort flag of an existing array.
    async fn update(&self, id: ArrayId, data: &[i64], is_sorted: bool) -> Result<()>;

    async fn delete(&self, id: ArrayId) -> Result<()>;

    /// Sort a stored array in place and return the sorted data.
    async fn sort(&self, id: ArrayId) -> Result<SortOutcome>;
}

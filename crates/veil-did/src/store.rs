//! # DID Repository Seam
//!
//! Persistence for DID records is an external collaborator. The core
//! re-resolves what it needs on every operation rather than caching
//! records across requests; any caching layer belongs above this seam.

use veil_core::StoreError;

use crate::record::{DidRecord, DidStatus};

/// Storage collaborator for DID records.
///
/// Implementations must be `Send + Sync`. All methods are async because
/// they are the suspension points of the DID lifecycle — everything else
/// in this crate is synchronous computation.
#[allow(async_fn_in_trait)]
pub trait DidRepository: Send + Sync {
    /// Look up a record by its DID string.
    async fn find_by_identifier(&self, identifier: &str)
        -> Result<Option<DidRecord>, StoreError>;

    /// Persist a new record.
    async fn save(&self, record: &DidRecord) -> Result<(), StoreError>;

    /// Flip the lifecycle status of an existing record.
    async fn set_status(&self, identifier: &str, status: DidStatus) -> Result<(), StoreError>;
}

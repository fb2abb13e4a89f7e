//! # Shared Storage Errors
//!
//! The repository traits in `veil-did` and `veil-service` are seams to an
//! external persistence layer. They all fail with [`StoreError`] so the
//! orchestration layer can map storage faults uniformly, regardless of
//! which backend a deployment plugs in.

use thiserror::Error;

/// Failure from a repository collaborator.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backing store rejected or failed the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be serialized or deserialized.
    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

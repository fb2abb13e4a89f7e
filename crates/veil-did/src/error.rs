//! # DID Error Types
//!
//! Structured errors for DID creation, resolution, and key-material
//! handling. Input problems are separated from lifecycle problems so the
//! orchestration layer can map them onto its fault taxonomy without
//! string-matching.

use thiserror::Error;

use veil_core::StoreError;
use veil_crypto::CryptoError;

/// Errors from DID operations in the Veil Stack.
#[derive(Error, Debug)]
pub enum DidError {
    /// The caller supplied an invalid method name, malformed domain, or
    /// otherwise unusable input. Raised before any key generation or I/O.
    #[error("invalid DID input: {0}")]
    InputValidation(String),

    /// No record exists for the requested identifier.
    #[error("DID not found: {0}")]
    NotFound(String),

    /// The DID exists but has been deactivated and may not sign.
    #[error("DID is deactivated: {0}")]
    Deactivated(String),

    /// A cryptographic operation failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The DID repository failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// DID Document serialization failed.
    #[error("DID document serialization failed: {0}")]
    Document(#[from] serde_json::Error),
}

//! # Service Fault Taxonomy
//!
//! The issuance-time faults. These are raised immediately, fail-fast,
//! before any persistence or signing — in contrast to verification-time
//! outcomes, which travel as [`VerificationResult`](veil_vc::VerificationResult)
//! values so that one bad credential cannot abort a batch.

use thiserror::Error;

use veil_core::StoreError;
use veil_crypto::CryptoError;
use veil_did::DidError;
use veil_vc::VcError;

/// Faults from guarded credential operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Null, empty, or oversized arguments — rejected before any crypto
    /// or I/O.
    #[error("input validation failed: {0}")]
    InputValidation(String),

    /// The issuer or holder DID does not exist.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// The issuer DID exists but is deactivated.
    #[error("entity inactive: {0}")]
    EntityInactive(String),

    /// The issuer or holder DID belongs to a different tenant than the
    /// caller. Never bypassed, under any context-reuse scenario.
    #[error("cross-tenant violation: {0}")]
    CrossTenantViolation(String),

    /// The tenant's operation budget for the current window is spent.
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// The credential or DID repository failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The credential codec failed.
    #[error(transparent)]
    Codec(#[from] VcError),

    /// A cryptographic operation failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl From<DidError> for ServiceError {
    fn from(err: DidError) -> Self {
        match err {
            DidError::InputValidation(msg) => Self::InputValidation(msg),
            DidError::NotFound(did) => Self::EntityNotFound(did),
            DidError::Deactivated(did) => Self::EntityInactive(did),
            DidError::Crypto(e) => Self::Crypto(e),
            DidError::Store(e) => Self::Store(e),
            DidError::Document(e) => Self::Store(StoreError::Serialization(e)),
        }
    }
}

//! # Credential Codec Errors
//!
//! Faults from the JWT/SD-JWT codecs and the presentation engine. These
//! are *engineering* errors — a caller holding a malformed compact string
//! or requesting an impossible derivation. "This credential does not
//! verify" is never an error; that outcome travels as a
//! [`VerificationResult`](crate::VerificationResult) value.

use thiserror::Error;

use veil_crypto::CryptoError;

/// Errors from credential encoding, decoding, and derivation.
#[derive(Error, Debug)]
pub enum VcError {
    /// A segment was not valid base64url.
    #[error("base64url decode error: {0}")]
    Base64(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The compact string does not have the expected segment structure.
    #[error("malformed compact serialization: {0}")]
    MalformedCompact(String),

    /// The JWT header carries an unsupported `alg` or `typ`.
    #[error("unsupported JWT header: {0}")]
    UnsupportedHeader(String),

    /// The payload's `_sd_alg` is missing or names an unsupported digest
    /// algorithm. Such credentials are rejected rather than guessed at.
    #[error("unsupported selective-disclosure digest algorithm: {0}")]
    UnsupportedDigestAlgorithm(String),

    /// A disclosure's digest does not appear in the payload's `_sd`
    /// array — the disclosure is tampered or belongs to another
    /// credential.
    #[error("disclosure for claim {0:?} is not committed by the credential")]
    DisclosureNotCommitted(String),

    /// A disclosure string could not be decoded into `[salt, name, value]`.
    #[error("invalid disclosure: {0}")]
    InvalidDisclosure(String),

    /// A claim requested for selective disclosure is absent from the
    /// claim set.
    #[error("selective claim {0:?} is not present in the claim set")]
    UnknownSelectiveClaim(String),

    /// The presentation holder does not match the credential subject.
    #[error("presentation holder {actual:?} does not match credential subject {expected:?}")]
    HolderMismatch {
        /// The `sub` claim of the credential.
        expected: String,
        /// The holder DID requesting the presentation.
        actual: String,
    },

    /// A cryptographic operation failed.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

//! # SHA-256 Digest Computation
//!
//! SHA-256 helpers backing the selective-disclosure digest scheme and
//! public-key fingerprints. Digest *encoding* (base64url for disclosure
//! digests, hex for fingerprints) belongs to the call sites; this module
//! only produces raw bytes plus the one hex convenience.

use sha2::{Digest, Sha256};

use crate::ed25519::{bytes_to_hex, VerifyingKey};

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute the SHA-256 digest of `data` as a lowercase hex string.
pub fn sha256_hex(data: &[u8]) -> String {
    bytes_to_hex(&sha256(data))
}

/// Fingerprint of an Ed25519 public key: lowercase-hex SHA-256 of the raw
/// 32 key bytes.
///
/// Used as a stable lookup handle for DID records — the fingerprint
/// identifies the key without carrying the key itself in indexes.
pub fn key_fingerprint(key: &VerifyingKey) -> String {
    sha256_hex(key.as_bytes())
}

//! # DID Records
//!
//! The persisted form of a DID: identifier, owning tenant, public key,
//! fingerprint, wrapped private key, serialized document, and lifecycle
//! status. Records are soft-lifecycle only — the status flip is the sole
//! mutation, and deactivated records are kept forever.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use veil_core::TenantId;
use veil_crypto::VerifyingKey;

/// Lifecycle status of a DID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DidStatus {
    /// Usable as an issuer or holder.
    Active,
    /// Retired. May still be referenced by old credentials but can never
    /// issue new ones.
    Deactivated,
}

/// A stored DID and its key material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidRecord {
    /// The DID string, e.g. `did:key:z6Mk…` or `did:web:example.com`.
    pub identifier: String,

    /// The tenant owning this DID.
    pub tenant: TenantId,

    /// The Ed25519 public key (32 bytes, hex in JSON).
    pub public_key: VerifyingKey,

    /// SHA-256 fingerprint of the public key, for lookup indexes.
    pub key_fingerprint: String,

    /// The private seed, encrypted by the key-wrapping collaborator.
    /// Opaque to this crate.
    pub encrypted_private_key: Vec<u8>,

    /// The serialized DID Document.
    pub document: String,

    /// Lifecycle status.
    pub status: DidStatus,

    /// When the DID was created.
    pub created_at: DateTime<Utc>,
}

impl DidRecord {
    /// Whether this DID may act as an issuer right now.
    pub fn is_active(&self) -> bool {
        self.status == DidStatus::Active
    }
}

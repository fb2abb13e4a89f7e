//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the domain identifiers in the Veil Stack. These
//! prevent accidental identifier confusion — you cannot pass a `TenantId`
//! where a `CredentialId` is expected.
//!
//! DID identifiers are deliberately *not* wrapped here: a DID string
//! (`did:key:…`, `did:web:…`) is a wire-format value owned by `veil-did`,
//! and records reference each other only through those opaque strings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a tenant (an isolated customer of the platform).
///
/// Every DID and credential record is owned by exactly one tenant, and
/// cross-tenant access is rejected at the orchestration layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub Uuid);

/// Unique identifier for an issued credential record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CredentialId(pub Uuid);

impl TenantId {
    /// Generate a new random tenant identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TenantId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl CredentialId {
    /// Generate a new random credential identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tenant_ids_are_unique() {
        assert_ne!(TenantId::new(), TenantId::new());
    }

    #[test]
    fn credential_ids_are_unique() {
        assert_ne!(CredentialId::new(), CredentialId::new());
    }

    #[test]
    fn tenant_id_serde_roundtrip() {
        let id = TenantId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: TenantId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn tenant_id_display_matches_uuid() {
        let id = TenantId::new();
        assert_eq!(format!("{id}"), id.as_uuid().to_string());
    }
}

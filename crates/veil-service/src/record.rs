//! # Credential Records
//!
//! The persisted form of an issued credential. DID and credential are
//! independent entities joined only by opaque identifier strings — a
//! record never embeds a DID record, and vice versa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use veil_core::{CredentialId, TenantId};

/// Lifecycle status of an issued credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStatus {
    /// In force.
    Active,
    /// Withdrawn by the issuer. The record is kept; only the status flips.
    Revoked,
}

/// A stored credential.
///
/// Immutable after creation except for status flips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Record identifier.
    pub id: CredentialId,

    /// The tenant owning this credential.
    pub tenant: TenantId,

    /// The issuer's DID string.
    pub issuer_did: String,

    /// The holder's DID string.
    pub holder_did: String,

    /// Credential type tag, e.g. `DegreeCredential`.
    pub credential_type: String,

    /// The compact credential string (JWT or SD-JWT).
    pub credential: String,

    /// Lifecycle status.
    pub status: CredentialStatus,

    /// Expiry carried in the credential, if any.
    pub expires_at: Option<DateTime<Utc>>,

    /// When the credential was issued.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CredentialStatus::Active).unwrap(),
            r#""active""#
        );
        assert_eq!(
            serde_json::to_string(&CredentialStatus::Revoked).unwrap(),
            r#""revoked""#
        );
    }

    #[test]
    fn record_serde_roundtrip() {
        let record = CredentialRecord {
            id: CredentialId::new(),
            tenant: TenantId::new(),
            issuer_did: "did:key:zIssuer".to_string(),
            holder_did: "did:key:zHolder".to_string(),
            credential_type: "DegreeCredential".to_string(),
            credential: "h.p.s".to_string(),
            status: CredentialStatus::Active,
            expires_at: None,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: CredentialRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}

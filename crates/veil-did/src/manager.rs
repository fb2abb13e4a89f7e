//! # Key & DID Manager
//!
//! Owns the DID key-material lifecycle: key generation, identifier and
//! document construction, at-rest wrapping of the private seed, and
//! resolution of identifiers back to records.
//!
//! ## Security Invariants
//!
//! - The raw seed exists unwrapped only inside `create_did` and
//!   `issuer_signing_key`, and both zeroize their working copy before
//!   returning.
//! - A record is persisted only after key generation, wrapping, and
//!   document construction have all succeeded — there is no partially
//!   visible DID.
//! - `issuer_signing_key` refuses deactivated records before touching the
//!   wrapped blob.

use std::sync::Arc;

use veil_core::{Clock, TenantId};
use veil_crypto::{key_fingerprint, zeroize_seed, KeyWrap, SigningKey};

use crate::document::DidDocument;
use crate::error::DidError;
use crate::method::DidMethod;
use crate::record::{DidRecord, DidStatus};
use crate::store::DidRepository;

/// Creates, resolves, and deactivates DIDs.
pub struct DidManager<R> {
    repo: R,
    key_wrap: Arc<dyn KeyWrap>,
    clock: Arc<dyn Clock>,
}

impl<R: DidRepository> DidManager<R> {
    /// Assemble a manager from its collaborators.
    pub fn new(repo: R, key_wrap: Arc<dyn KeyWrap>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            key_wrap,
            clock,
        }
    }

    /// Create a fresh DID for `tenant` using the given method.
    ///
    /// Generates an Ed25519 key pair, builds the identifier and DID
    /// Document, wraps the private seed through the key-wrapping
    /// collaborator, and persists the record. Method-input problems fail
    /// before any key is generated.
    pub async fn create_did(
        &self,
        tenant: TenantId,
        method: DidMethod,
    ) -> Result<DidRecord, DidError> {
        method.validate()?;

        let signing_key = SigningKey::generate(&mut rand_core::OsRng);
        let public_key = signing_key.verifying_key();
        let identifier = method.identifier(&public_key)?;

        let document = DidDocument::for_key(&identifier, &public_key);
        let document_json = serde_json::to_string(&document)?;

        let mut seed = signing_key.seed_bytes();
        let wrapped = self.key_wrap.wrap_key(&seed);
        zeroize_seed(&mut seed);
        let encrypted_private_key = wrapped?;

        let record = DidRecord {
            identifier: identifier.clone(),
            tenant,
            key_fingerprint: key_fingerprint(&public_key),
            public_key,
            encrypted_private_key,
            document: document_json,
            status: DidStatus::Active,
            created_at: self.clock.now_utc(),
        };

        self.repo.save(&record).await?;
        tracing::info!(did = %identifier, method = %method, %tenant, "created DID");

        Ok(record)
    }

    /// Resolve an identifier to its record.
    pub async fn resolve_did(&self, identifier: &str) -> Result<DidRecord, DidError> {
        self.repo
            .find_by_identifier(identifier)
            .await?
            .ok_or_else(|| DidError::NotFound(identifier.to_string()))
    }

    /// Deactivate a DID. Idempotent on already-deactivated records.
    pub async fn deactivate_did(&self, identifier: &str) -> Result<(), DidError> {
        // Resolve first so an unknown identifier reports NotFound rather
        // than silently succeeding.
        let record = self.resolve_did(identifier).await?;
        if record.status == DidStatus::Deactivated {
            return Ok(());
        }
        self.repo
            .set_status(identifier, DidStatus::Deactivated)
            .await?;
        tracing::info!(did = %identifier, "deactivated DID");
        Ok(())
    }

    /// Recover the signing key of an active issuer DID.
    ///
    /// The unwrapped seed is zeroized before this returns; the caller
    /// receives only the reconstructed [`SigningKey`].
    pub fn issuer_signing_key(&self, record: &DidRecord) -> Result<SigningKey, DidError> {
        if !record.is_active() {
            return Err(DidError::Deactivated(record.identifier.clone()));
        }

        let mut seed = self.key_wrap.unwrap_key(&record.encrypted_private_key)?;
        let result = SigningKey::from_seed_slice(&seed);
        zeroize_seed(&mut seed);
        result.map_err(DidError::from)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use parking_lot::RwLock;
    use veil_core::{StoreError, SystemClock};
    use veil_crypto::PlaintextKeyWrap;

    use super::*;
    use crate::method::did_key_public_key;

    /// Hash-map-backed repository for manager tests.
    #[derive(Default)]
    struct TestRepo {
        records: RwLock<HashMap<String, DidRecord>>,
    }

    impl DidRepository for TestRepo {
        async fn find_by_identifier(
            &self,
            identifier: &str,
        ) -> Result<Option<DidRecord>, StoreError> {
            Ok(self.records.read().get(identifier).cloned())
        }

        async fn save(&self, record: &DidRecord) -> Result<(), StoreError> {
            self.records
                .write()
                .insert(record.identifier.clone(), record.clone());
            Ok(())
        }

        async fn set_status(
            &self,
            identifier: &str,
            status: DidStatus,
        ) -> Result<(), StoreError> {
            let mut records = self.records.write();
            let record = records
                .get_mut(identifier)
                .ok_or_else(|| StoreError::Backend(format!("no record {identifier}")))?;
            record.status = status;
            Ok(())
        }
    }

    fn manager() -> DidManager<TestRepo> {
        DidManager::new(
            TestRepo::default(),
            Arc::new(PlaintextKeyWrap),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn create_did_key_resolves_back() {
        let mgr = manager();
        let tenant = TenantId::new();

        let record = mgr.create_did(tenant, DidMethod::Key).await.unwrap();
        assert!(record.identifier.starts_with("did:key:z"));
        assert_eq!(record.tenant, tenant);
        assert_eq!(record.status, DidStatus::Active);

        let resolved = mgr.resolve_did(&record.identifier).await.unwrap();
        assert_eq!(resolved, record);
    }

    #[tokio::test]
    async fn created_did_key_identifier_embeds_the_public_key() {
        let mgr = manager();
        let record = mgr.create_did(TenantId::new(), DidMethod::Key).await.unwrap();
        assert_eq!(
            did_key_public_key(&record.identifier).unwrap(),
            record.public_key
        );
    }

    #[tokio::test]
    async fn created_document_matches_record_key() {
        let mgr = manager();
        let record = mgr
            .create_did(
                TenantId::new(),
                DidMethod::Web {
                    domain: "issuer.example.com".to_string(),
                    path_segments: vec![],
                },
            )
            .await
            .unwrap();

        assert_eq!(record.identifier, "did:web:issuer.example.com");
        let doc: DidDocument = serde_json::from_str(&record.document).unwrap();
        assert_eq!(doc.id, record.identifier);
        assert_eq!(doc.primary_public_key().unwrap(), record.public_key);
    }

    #[tokio::test]
    async fn create_rejects_malformed_domain_before_keygen() {
        let mgr = manager();
        let err = mgr
            .create_did(
                TenantId::new(),
                DidMethod::Web {
                    domain: "https://bad".to_string(),
                    path_segments: vec![],
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DidError::InputValidation(_)));
        assert!(mgr.repo.records.read().is_empty());
    }

    #[tokio::test]
    async fn resolve_unknown_is_not_found() {
        let mgr = manager();
        let err = mgr.resolve_did("did:key:zUnknown").await.unwrap_err();
        assert!(matches!(err, DidError::NotFound(_)));
    }

    #[tokio::test]
    async fn signing_key_roundtrips_through_wrap() {
        let mgr = manager();
        let record = mgr.create_did(TenantId::new(), DidMethod::Key).await.unwrap();

        let sk = mgr.issuer_signing_key(&record).unwrap();
        assert_eq!(sk.verifying_key(), record.public_key);
    }

    #[tokio::test]
    async fn deactivated_did_cannot_sign() {
        let mgr = manager();
        let record = mgr.create_did(TenantId::new(), DidMethod::Key).await.unwrap();

        mgr.deactivate_did(&record.identifier).await.unwrap();
        let resolved = mgr.resolve_did(&record.identifier).await.unwrap();
        assert_eq!(resolved.status, DidStatus::Deactivated);

        let err = mgr.issuer_signing_key(&resolved).unwrap_err();
        assert!(matches!(err, DidError::Deactivated(_)));
    }

    #[tokio::test]
    async fn deactivate_is_idempotent() {
        let mgr = manager();
        let record = mgr.create_did(TenantId::new(), DidMethod::Key).await.unwrap();
        mgr.deactivate_did(&record.identifier).await.unwrap();
        mgr.deactivate_did(&record.identifier).await.unwrap();
    }

    #[tokio::test]
    async fn deactivate_unknown_is_not_found() {
        let mgr = manager();
        let err = mgr.deactivate_did("did:key:zNope").await.unwrap_err();
        assert!(matches!(err, DidError::NotFound(_)));
    }
}

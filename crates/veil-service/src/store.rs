//! # Credential Repository Seam and In-Memory Stores
//!
//! Persistence is an external collaborator behind a trait. The in-memory
//! implementations here back tests and single-process embeddings: full
//! functionality, no durability.

use std::collections::HashMap;

use parking_lot::RwLock;

use veil_core::StoreError;
use veil_did::{DidRecord, DidRepository, DidStatus};

use crate::record::CredentialRecord;

/// Storage collaborator for issued credentials.
///
/// Implementations must be `Send + Sync`. Methods are async because they
/// are the suspension points of the issuance/verification flows.
#[allow(async_fn_in_trait)]
pub trait CredentialRepository: Send + Sync {
    /// Persist a newly issued credential.
    async fn save(&self, record: &CredentialRecord) -> Result<(), StoreError>;

    /// All credentials binding the given issuer and holder DIDs.
    async fn find_by_issuer_and_holder(
        &self,
        issuer_did: &str,
        holder_did: &str,
    ) -> Result<Vec<CredentialRecord>, StoreError>;
}

/// In-memory DID store.
#[derive(Debug, Default)]
pub struct MemoryDidStore {
    records: RwLock<HashMap<String, DidRecord>>,
}

impl MemoryDidStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored DIDs.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl DidRepository for MemoryDidStore {
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

    async fn set_status(&self, identifier: &str, status: DidStatus) -> Result<(), StoreError> {
        let mut records = self.records.write();
        let record = records
            .get_mut(identifier)
            .ok_or_else(|| StoreError::Backend(format!("no DID record for {identifier}")))?;
        record.status = status;
        Ok(())
    }
}

/// In-memory credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    records: RwLock<Vec<CredentialRecord>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl CredentialRepository for MemoryCredentialStore {
    async fn save(&self, record: &CredentialRecord) -> Result<(), StoreError> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn find_by_issuer_and_holder(
        &self,
        issuer_did: &str,
        holder_did: &str,
    ) -> Result<Vec<CredentialRecord>, StoreError> {
        Ok(self
            .records
            .read()
            .iter()
            .filter(|r| r.issuer_did == issuer_did && r.holder_did == holder_did)
            .cloned()
            .collect())
    }
}

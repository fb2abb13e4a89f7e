//! # Credential Orchestration
//!
//! The guarded issuance, verification, and presentation flows. Every
//! precondition is checked fail-fast and in a fixed order before any
//! signature is computed or record written:
//!
//! 1. claims present and within the serialized-size cap,
//! 2. issuer DID resolvable and active,
//! 3. holder DID resolvable,
//! 4. both DIDs owned by the caller's tenant,
//! 5. rate limit for `(tenant, operation)`.
//!
//! Verification-time outcomes are values, not errors: a bad credential
//! produces a [`VerificationResult`], and only empty input or
//! infrastructure failure surfaces as [`ServiceError`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use veil_core::{Clock, CredentialId, TenantContext, TenantId};
use veil_crypto::VerifyingKey;
use veil_did::{DidError, DidManager, DidRecord, DidRepository};
use veil_vc::sd::{selective_payload, serialize_compact};
use veil_vc::{
    create_presentation as derive_presentation, jwt, peek_issuer, verify_credential,
    verify_presentation as check_presentation, Disclosure, Presentation,
    SelectiveDisclosureBundle, VcError, VerificationResult,
};

use crate::error::ServiceError;
use crate::policy::IssuancePolicy;
use crate::rate_limit::{Operation, RateLimiter};
use crate::record::{CredentialRecord, CredentialStatus};
use crate::store::CredentialRepository;

/// Inputs to credential issuance.
#[derive(Debug, Clone)]
pub struct IssueRequest {
    /// DID of the issuing party. Must be active and tenant-owned.
    pub issuer_did: String,
    /// DID of the credential holder. Must be tenant-owned.
    pub holder_did: String,
    /// Credential type tag, e.g. `DegreeCredential`.
    pub credential_type: String,
    /// The claim set. Must be non-empty.
    pub claims: Map<String, Value>,
    /// Claim names to make selectively disclosable. Empty for a plain JWT.
    pub selective_claims: Vec<String>,
    /// Optional expiry.
    pub expires_at: Option<DateTime<Utc>>,
}

/// The outcome of issuance: the persisted record plus the full bundle
/// (compact string and every disclosure) for the holder.
#[derive(Debug, Clone)]
pub struct IssuedCredential {
    /// The record as persisted.
    pub record: CredentialRecord,
    /// The compact credential and its disclosure set.
    pub bundle: SelectiveDisclosureBundle,
}

/// The orchestration facade over the DID manager, codecs, repositories,
/// and rate limiter.
pub struct CredentialService<D, C> {
    dids: DidManager<D>,
    credentials: C,
    tenants: Arc<dyn TenantContext>,
    clock: Arc<dyn Clock>,
    limiter: Arc<RateLimiter>,
    policy: IssuancePolicy,
}

impl<D: DidRepository, C: CredentialRepository> CredentialService<D, C> {
    /// Assemble a service from its collaborators.
    pub fn new(
        dids: DidManager<D>,
        credentials: C,
        tenants: Arc<dyn TenantContext>,
        clock: Arc<dyn Clock>,
        limiter: Arc<RateLimiter>,
        policy: IssuancePolicy,
    ) -> Self {
        Self {
            dids,
            credentials,
            tenants,
            clock,
            limiter,
            policy,
        }
    }

    /// The DID manager this service issues through.
    pub fn did_manager(&self) -> &DidManager<D> {
        &self.dids
    }

    /// Issue a credential.
    ///
    /// Runs the fail-fast precondition chain, signs (routing through the
    /// selective-disclosure codec when `selective_claims` is non-empty),
    /// and persists the record only after signing succeeds.
    pub async fn issue_credential(
        &self,
        request: IssueRequest,
    ) -> Result<IssuedCredential, ServiceError> {
        if request.claims.is_empty() {
            return Err(ServiceError::InputValidation(
                "claim set must not be empty".to_string(),
            ));
        }

        let serialized_len = serde_json::to_vec(&request.claims)
            .map_err(|e| {
                ServiceError::InputValidation(format!("claims are not serializable: {e}"))
            })?
            .len();
        if serialized_len > self.policy.max_claims_bytes {
            return Err(ServiceError::InputValidation(format!(
                "serialized claims are {serialized_len} bytes, cap is {} bytes",
                self.policy.max_claims_bytes
            )));
        }

        let issuer = self.dids.resolve_did(&request.issuer_did).await?;
        if !issuer.is_active() {
            return Err(ServiceError::EntityInactive(issuer.identifier));
        }
        let holder = self.dids.resolve_did(&request.holder_did).await?;
        if !holder.is_active() {
            return Err(ServiceError::EntityInactive(holder.identifier));
        }

        let tenant = self.tenants.current_tenant();
        self.require_tenant_owned(&issuer, tenant, "issuer")?;
        self.require_tenant_owned(&holder, tenant, "holder")?;

        self.acquire_budget(tenant, Operation::Issue)?;

        let issued_at = self.clock.now_utc();
        let iat = issued_at.timestamp();
        let exp = request.expires_at.map(|t| t.timestamp());

        let signing_key = self.dids.issuer_signing_key(&issuer)?;

        let bundle = if request.selective_claims.is_empty() {
            let payload = jwt::credential_payload(
                &issuer.identifier,
                &holder.identifier,
                &request.credential_type,
                &request.claims,
                iat,
                exp,
            );
            SelectiveDisclosureBundle::plain(jwt::sign_jwt(&payload, &signing_key)?)
        } else {
            let (payload, disclosures) = selective_payload(
                &issuer.identifier,
                &holder.identifier,
                &request.credential_type,
                &request.claims,
                &request.selective_claims,
                iat,
                exp,
            )
            .map_err(|e| match e {
                VcError::UnknownSelectiveClaim(_) => {
                    ServiceError::InputValidation(e.to_string())
                }
                other => ServiceError::Codec(other),
            })?;
            let token = jwt::sign_jwt(&payload, &signing_key)?;
            SelectiveDisclosureBundle {
                compact: serialize_compact(&token, &disclosures),
                disclosures,
            }
        };

        let record = CredentialRecord {
            id: CredentialId::new(),
            tenant,
            issuer_did: issuer.identifier,
            holder_did: holder.identifier,
            credential_type: request.credential_type,
            credential: bundle.compact.clone(),
            status: CredentialStatus::Active,
            expires_at: request.expires_at,
            created_at: issued_at,
        };
        self.credentials.save(&record).await?;

        tracing::info!(
            credential = %record.id,
            issuer = %record.issuer_did,
            holder = %record.holder_did,
            selective = bundle.disclosures.len(),
            "issued credential"
        );

        Ok(IssuedCredential { record, bundle })
    }

    /// Verify a compact credential (plain JWT or SD-JWT).
    ///
    /// Pre-resolves the issuer DID, then runs the pure verification state
    /// machine. Bad credentials come back as a non-valid
    /// [`VerificationResult`]; only empty input or infrastructure failure
    /// is an error.
    pub async fn verify_credential(
        &self,
        compact: &str,
    ) -> Result<VerificationResult, ServiceError> {
        if compact.trim().is_empty() {
            return Err(ServiceError::InputValidation(
                "credential must not be empty".to_string(),
            ));
        }

        let tenant = self.tenants.current_tenant();
        self.acquire_budget(tenant, Operation::Verify)?;

        let prefetched = self.prefetch_issuer_key(compact).await?;
        let result = verify_credential(
            compact,
            issuer_resolver(prefetched),
            self.clock.now_utc(),
        );

        tracing::debug!(status = %result.status, issuer = ?result.issuer_did, "verified credential");
        Ok(result)
    }

    /// Derive a claim-reduced presentation from an issued bundle.
    ///
    /// Pure computation over the bundle — no I/O, no re-signing — but
    /// still rate-limited per tenant.
    pub fn create_presentation(
        &self,
        bundle: &SelectiveDisclosureBundle,
        claim_names: &[String],
        holder_did: &str,
    ) -> Result<Presentation, ServiceError> {
        let tenant = self.tenants.current_tenant();
        self.acquire_budget(tenant, Operation::Present)?;

        let presentation = derive_presentation(bundle, claim_names, holder_did).map_err(|e| {
            match e {
                VcError::HolderMismatch { .. } => ServiceError::InputValidation(e.to_string()),
                other => ServiceError::Codec(other),
            }
        })?;

        tracing::info!(
            holder = %holder_did,
            disclosed = presentation.disclosed_claim_names.len(),
            withheld = bundle.disclosures.len() - presentation.selected_disclosures.len(),
            "derived presentation"
        );
        Ok(presentation)
    }

    /// Verify a presentation: the JWT plus the disclosures it carries.
    pub async fn verify_presentation(
        &self,
        presentation_jwt: &str,
        selected_disclosures: &[Disclosure],
    ) -> Result<VerificationResult, ServiceError> {
        if presentation_jwt.trim().is_empty() {
            return Err(ServiceError::InputValidation(
                "presentation must not be empty".to_string(),
            ));
        }

        let tenant = self.tenants.current_tenant();
        self.acquire_budget(tenant, Operation::Verify)?;

        let prefetched = self.prefetch_issuer_key(presentation_jwt).await?;
        Ok(check_presentation(
            presentation_jwt,
            selected_disclosures,
            issuer_resolver(prefetched),
            self.clock.now_utc(),
        ))
    }

    /// All credentials binding an issuer and holder pair.
    pub async fn credentials_for(
        &self,
        issuer_did: &str,
        holder_did: &str,
    ) -> Result<Vec<CredentialRecord>, ServiceError> {
        Ok(self
            .credentials
            .find_by_issuer_and_holder(issuer_did, holder_did)
            .await?)
    }

    fn require_tenant_owned(
        &self,
        record: &DidRecord,
        tenant: TenantId,
        role: &str,
    ) -> Result<(), ServiceError> {
        if record.tenant != tenant {
            return Err(ServiceError::CrossTenantViolation(format!(
                "{role} DID {} is not owned by tenant {tenant}",
                record.identifier
            )));
        }
        Ok(())
    }

    fn acquire_budget(&self, tenant: TenantId, operation: Operation) -> Result<(), ServiceError> {
        if !self.limiter.is_allowed(tenant, operation) {
            tracing::warn!(%tenant, %operation, "rate limit exceeded");
            return Err(ServiceError::RateLimited(format!(
                "{operation} budget exhausted for tenant {tenant}"
            )));
        }
        self.limiter.record_operation(tenant, operation);
        Ok(())
    }

    /// Resolve the credential's `iss` DID ahead of the pure verifier.
    ///
    /// Unknown or deactivated issuers become resolver messages (and thus
    /// `IssuerNotFound` results); only infrastructure failures propagate
    /// as errors.
    async fn prefetch_issuer_key(
        &self,
        compact: &str,
    ) -> Result<Result<(String, VerifyingKey), String>, ServiceError> {
        let Some(issuer) = peek_issuer(compact) else {
            // The pure verifier will classify the credential as malformed
            // before ever consulting the resolver.
            return Ok(Err("credential could not be parsed".to_string()));
        };

        match self.dids.resolve_did(&issuer).await {
            Ok(record) if record.is_active() => Ok(Ok((issuer, record.public_key))),
            Ok(record) => Ok(Err(format!("DID {} is deactivated", record.identifier))),
            Err(DidError::NotFound(did)) => Ok(Err(format!("no DID record for {did}"))),
            Err(e) => Err(e.into()),
        }
    }
}

/// Turn a prefetched issuer key into the verifier's resolver closure.
fn issuer_resolver(
    prefetched: Result<(String, VerifyingKey), String>,
) -> impl Fn(&str) -> Result<VerifyingKey, String> {
    move |did: &str| match &prefetched {
        Ok((issuer, key)) if issuer == did => Ok(key.clone()),
        Ok((issuer, _)) => Err(format!("resolved {issuer}, credential names {did}")),
        Err(reason) => Err(reason.clone()),
    }
}

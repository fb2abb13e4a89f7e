//! # Credential Verification
//!
//! The verification state machine. Terminal states only — verification is
//! a pure function of the compact string, the issuer-key resolver, and
//! the current instant. Every outcome, including every flavor of "this
//! credential is bad", is reported through [`VerificationResult`]; the
//! function itself never fails. This lets a caller verify a batch of
//! credentials without one bad credential aborting the rest.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use veil_crypto::VerifyingKey;

use crate::jwt::{decode_jwt, DecodedJwt};
use crate::sd::{disclosed_claims, split_compact, Disclosure};
use crate::VcError;

/// Terminal verification states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationStatus {
    /// The credential verified end to end.
    Valid,
    /// The compact string does not have the required structure.
    MalformedJwt,
    /// The `iss` claim could not be resolved to an active DID.
    IssuerNotFound,
    /// The signature (or a disclosure committed under it) does not check
    /// out against the issuer's key.
    SignatureInvalid,
    /// The credential carries an `exp` at or before the current instant.
    Expired,
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            VerificationStatus::Valid => "valid",
            VerificationStatus::MalformedJwt => "malformed_jwt",
            VerificationStatus::IssuerNotFound => "issuer_not_found",
            VerificationStatus::SignatureInvalid => "signature_invalid",
            VerificationStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// The full outcome of verifying a credential or presentation.
///
/// Always returned as a value, never thrown, for credential-content
/// problems. Every non-`Valid` status carries at least one human-readable
/// message in `validation_errors`.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    /// Shorthand for `status == Valid`.
    pub is_valid: bool,
    /// The terminal state reached.
    pub status: VerificationStatus,
    /// The issuer DID, when the payload was parseable.
    pub issuer_did: Option<String>,
    /// The holder DID (`sub`), when the payload was parseable.
    pub holder_did: Option<String>,
    /// Expiry, when the payload carries one.
    pub expires_at: Option<DateTime<Utc>>,
    /// Plain fields plus reconstructed selective claims.
    pub disclosed_claims: Map<String, Value>,
    /// Human-readable findings for every non-valid outcome.
    pub validation_errors: Vec<String>,
}

impl VerificationResult {
    fn valid(
        issuer_did: String,
        holder_did: Option<String>,
        expires_at: Option<DateTime<Utc>>,
        disclosed_claims: Map<String, Value>,
    ) -> Self {
        Self {
            is_valid: true,
            status: VerificationStatus::Valid,
            issuer_did: Some(issuer_did),
            holder_did,
            expires_at,
            disclosed_claims,
            validation_errors: Vec::new(),
        }
    }

    fn failure(status: VerificationStatus, error: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            status,
            issuer_did: None,
            holder_did: None,
            expires_at: None,
            disclosed_claims: Map::new(),
            validation_errors: vec![error.into()],
        }
    }

    fn with_parties(
        mut self,
        issuer_did: Option<String>,
        holder_did: Option<String>,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.issuer_did = issuer_did;
        self.holder_did = holder_did;
        self.expires_at = expires_at;
        self
    }
}

/// Extract the `iss` claim from a compact credential without verifying
/// anything.
///
/// The orchestration layer uses this to know which DID to resolve before
/// invoking the pure verifier; a string this function cannot parse will
/// fail verification as `MalformedJwt` anyway.
pub fn peek_issuer(compact: &str) -> Option<String> {
    let (jwt_segment, _) = split_compact(compact);
    let decoded = decode_jwt(jwt_segment).ok()?;
    decoded
        .payload
        .get("iss")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Verify a compact credential (plain JWT or SD-JWT).
///
/// `resolve_issuer` maps an issuer DID to its Ed25519 verification key,
/// or an explanatory message when the DID is unknown or inactive. The
/// closure is synchronous: any I/O needed to answer it happens before
/// this call.
pub fn verify_credential<F>(
    compact: &str,
    resolve_issuer: F,
    now: DateTime<Utc>,
) -> VerificationResult
where
    F: Fn(&str) -> Result<VerifyingKey, String>,
{
    let (jwt_segment, disclosure_segments) = split_compact(compact);

    let decoded = match decode_jwt(jwt_segment) {
        Ok(decoded) => decoded,
        Err(e) => {
            return VerificationResult::failure(
                VerificationStatus::MalformedJwt,
                format!("credential JWT is malformed: {e}"),
            );
        }
    };

    if !decoded.header.is_supported() {
        return VerificationResult::failure(
            VerificationStatus::MalformedJwt,
            format!(
                "unsupported JWT header: typ={:?} alg={:?}",
                decoded.header.typ, decoded.header.alg
            ),
        );
    }

    let mut disclosures = Vec::with_capacity(disclosure_segments.len());
    for segment in &disclosure_segments {
        match Disclosure::from_encoded(segment) {
            Ok(d) => disclosures.push(d),
            Err(e) => {
                return VerificationResult::failure(
                    VerificationStatus::MalformedJwt,
                    format!("undecodable disclosure segment: {e}"),
                );
            }
        }
    }

    let issuer_did = decoded
        .payload
        .get("iss")
        .and_then(Value::as_str)
        .map(str::to_string);
    let holder_did = decoded
        .payload
        .get("sub")
        .and_then(Value::as_str)
        .map(str::to_string);
    let expires_at = decoded
        .payload
        .get("exp")
        .and_then(Value::as_i64)
        .and_then(|secs| DateTime::from_timestamp(secs, 0));

    let Some(issuer) = issuer_did.clone() else {
        return VerificationResult::failure(
            VerificationStatus::MalformedJwt,
            "payload has no iss claim",
        )
        .with_parties(None, holder_did, expires_at);
    };

    let key = match resolve_issuer(&issuer) {
        Ok(key) => key,
        Err(reason) => {
            return VerificationResult::failure(
                VerificationStatus::IssuerNotFound,
                format!("issuer {issuer} could not be resolved: {reason}"),
            )
            .with_parties(Some(issuer), holder_did, expires_at);
        }
    };

    if let Err(e) = verify_signature(&decoded, &key) {
        return VerificationResult::failure(
            VerificationStatus::SignatureInvalid,
            format!("signature verification failed: {e}"),
        )
        .with_parties(Some(issuer), holder_did, expires_at);
    }

    if let Some(expiry) = expires_at {
        if expiry <= now {
            return VerificationResult::failure(
                VerificationStatus::Expired,
                format!("credential expired at {expiry}"),
            )
            .with_parties(Some(issuer), holder_did, expires_at);
        }
    }

    match disclosed_claims(&decoded.payload, &disclosures) {
        Ok(claims) => VerificationResult::valid(issuer, holder_did, expires_at, claims),
        Err(e @ VcError::DisclosureNotCommitted(_)) => VerificationResult::failure(
            VerificationStatus::SignatureInvalid,
            format!("disclosure is not covered by the issuer signature: {e}"),
        )
        .with_parties(Some(issuer), holder_did, expires_at),
        Err(e) => VerificationResult::failure(
            VerificationStatus::MalformedJwt,
            format!("selective-disclosure payload is unusable: {e}"),
        )
        .with_parties(Some(issuer), holder_did, expires_at),
    }
}

fn verify_signature(decoded: &DecodedJwt, key: &VerifyingKey) -> Result<(), VcError> {
    key.verify(decoded.signing_input.as_bytes(), &decoded.signature)
        .map_err(VcError::from)
}

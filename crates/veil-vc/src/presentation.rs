//! # Presentation Engine
//!
//! Derives holder-controlled, claim-reduced presentations from an issued
//! SD-JWT credential. No re-signing happens anywhere in this module: the
//! issuer signature covers only the JWT segment, which is carried over
//! untouched, so any subset of the issued disclosures remains verifiable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use veil_crypto::VerifyingKey;

use crate::error::VcError;
use crate::jwt::decode_jwt;
use crate::sd::{serialize_compact, split_compact, Disclosure, SelectiveDisclosureBundle};
use crate::verify::{verify_credential, VerificationResult};

/// A derived presentation: the claim-reduced compact string plus the
/// disclosures it carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    /// `<jwt>` + selected disclosures + trailing `~` (or the bare JWT
    /// when nothing is disclosed).
    pub presentation_jwt: String,
    /// The disclosures included in the presentation.
    pub selected_disclosures: Vec<Disclosure>,
    /// The claim names the presentation reveals.
    pub disclosed_claim_names: Vec<String>,
}

/// Derive a presentation disclosing only `claim_names` from an issued
/// credential bundle.
///
/// `holder_did` must match the credential's `sub` claim — a holder cannot
/// derive presentations from someone else's credential. Requested names
/// with no matching disclosure are simply not disclosed; revealing a
/// subset is the entire point.
pub fn create_presentation(
    bundle: &SelectiveDisclosureBundle,
    claim_names: &[String],
    holder_did: &str,
) -> Result<Presentation, VcError> {
    let jwt_segment = bundle.jwt_segment();
    let decoded = decode_jwt(jwt_segment)?;

    let subject = decoded
        .payload
        .get("sub")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if subject != holder_did {
        return Err(VcError::HolderMismatch {
            expected: subject.to_string(),
            actual: holder_did.to_string(),
        });
    }

    let selected: Vec<Disclosure> = bundle
        .disclosures
        .iter()
        .filter(|d| claim_names.iter().any(|name| name == d.claim_name()))
        .cloned()
        .collect();

    let disclosed_claim_names = selected
        .iter()
        .map(|d| d.claim_name().to_string())
        .collect();

    Ok(Presentation {
        presentation_jwt: serialize_compact(jwt_segment, &selected),
        selected_disclosures: selected,
        disclosed_claim_names,
    })
}

/// Verify a presentation.
///
/// When `selected_disclosures` is non-empty it is taken as the disclosure
/// set (re-joined with the presentation's JWT segment); otherwise the
/// disclosures embedded in `presentation_jwt` are used. Carrying fewer
/// disclosures than were issued is not an error — only a disclosure that
/// fails digest matching is.
pub fn verify_presentation<F>(
    presentation_jwt: &str,
    selected_disclosures: &[Disclosure],
    resolve_issuer: F,
    now: DateTime<Utc>,
) -> VerificationResult
where
    F: Fn(&str) -> Result<VerifyingKey, String>,
{
    if selected_disclosures.is_empty() {
        return verify_credential(presentation_jwt, resolve_issuer, now);
    }

    let (jwt_segment, _) = split_compact(presentation_jwt);
    let compact = serialize_compact(jwt_segment, selected_disclosures);
    verify_credential(&compact, resolve_issuer, now)
}

#[cfg(test)]
mod tests {
    use rand_core::OsRng;
    use serde_json::{json, Map};

    use veil_crypto::SigningKey;

    use super::*;
    use crate::sd::selective_payload;
    use crate::verify::VerificationStatus;
    use crate::jwt::sign_jwt;

    const ISSUER: &str = "did:key:zIssuer";
    const HOLDER: &str = "did:key:zHolder";

    fn issue_bundle(key: &SigningKey, selective: &[&str]) -> SelectiveDisclosureBundle {
        let mut claims = Map::new();
        claims.insert("degree".to_string(), json!("BSc"));
        claims.insert("university".to_string(), json!("X"));
        claims.insert("graduation_year".to_string(), json!(2021));

        let selective: Vec<String> = selective.iter().map(|s| s.to_string()).collect();
        let (payload, disclosures) = selective_payload(
            ISSUER,
            HOLDER,
            "DegreeCredential",
            &claims,
            &selective,
            1_700_000_000,
            None,
        )
        .unwrap();
        let jwt = sign_jwt(&payload, key).unwrap();
        SelectiveDisclosureBundle {
            compact: serialize_compact(&jwt, &disclosures),
            disclosures,
        }
    }

    fn resolver(key: VerifyingKey) -> impl Fn(&str) -> Result<VerifyingKey, String> {
        move |did: &str| {
            if did == ISSUER {
                Ok(key.clone())
            } else {
                Err(format!("unknown DID {did}"))
            }
        }
    }

    #[test]
    fn subset_presentation_verifies() {
        let key = SigningKey::generate(&mut OsRng);
        let bundle = issue_bundle(&key, &["university", "graduation_year"]);

        let presentation =
            create_presentation(&bundle, &["university".to_string()], HOLDER).unwrap();
        assert_eq!(presentation.disclosed_claim_names, vec!["university"]);
        assert_eq!(presentation.selected_disclosures.len(), 1);

        let result = verify_presentation(
            &presentation.presentation_jwt,
            &presentation.selected_disclosures,
            resolver(key.verifying_key()),
            Utc::now(),
        );
        assert!(result.is_valid, "{:?}", result.validation_errors);
        assert_eq!(result.disclosed_claims["university"], "X");
        assert_eq!(result.disclosed_claims["degree"], "BSc");
        assert!(result.disclosed_claims.get("graduation_year").is_none());
    }

    #[test]
    fn presentation_jwt_segment_is_untouched() {
        let key = SigningKey::generate(&mut OsRng);
        let bundle = issue_bundle(&key, &["university"]);

        let presentation =
            create_presentation(&bundle, &["university".to_string()], HOLDER).unwrap();
        let (original_jwt, _) = split_compact(&bundle.compact);
        let (presented_jwt, _) = split_compact(&presentation.presentation_jwt);
        assert_eq!(original_jwt, presented_jwt);
    }

    #[test]
    fn empty_selection_discloses_nothing() {
        let key = SigningKey::generate(&mut OsRng);
        let bundle = issue_bundle(&key, &["university"]);

        let presentation = create_presentation(&bundle, &[], HOLDER).unwrap();
        assert!(presentation.selected_disclosures.is_empty());

        let result = verify_presentation(
            &presentation.presentation_jwt,
            &[],
            resolver(key.verifying_key()),
            Utc::now(),
        );
        assert!(result.is_valid);
        assert!(result.disclosed_claims.get("university").is_none());
        assert_eq!(result.disclosed_claims["degree"], "BSc");
    }

    #[test]
    fn unknown_claim_names_are_not_disclosed() {
        let key = SigningKey::generate(&mut OsRng);
        let bundle = issue_bundle(&key, &["university"]);

        let presentation =
            create_presentation(&bundle, &["salary".to_string()], HOLDER).unwrap();
        assert!(presentation.disclosed_claim_names.is_empty());
    }

    #[test]
    fn wrong_holder_is_rejected() {
        let key = SigningKey::generate(&mut OsRng);
        let bundle = issue_bundle(&key, &["university"]);

        let err = create_presentation(&bundle, &[], "did:key:zMallory").unwrap_err();
        assert!(matches!(err, VcError::HolderMismatch { .. }));
    }

    #[test]
    fn smuggled_foreign_disclosure_fails_verification() {
        let key = SigningKey::generate(&mut OsRng);
        let bundle = issue_bundle(&key, &["university"]);
        let presentation =
            create_presentation(&bundle, &["university".to_string()], HOLDER).unwrap();

        let forged = Disclosure::new("university", json!("Forged U")).unwrap();
        let result = verify_presentation(
            &presentation.presentation_jwt,
            &[forged],
            resolver(key.verifying_key()),
            Utc::now(),
        );
        assert_eq!(result.status, VerificationStatus::SignatureInvalid);
    }

    #[test]
    fn plain_credential_presentation_passes_through() {
        let key = SigningKey::generate(&mut OsRng);
        let mut claims = Map::new();
        claims.insert("degree".to_string(), json!("BSc"));
        let payload = crate::jwt::credential_payload(
            ISSUER,
            HOLDER,
            "DegreeCredential",
            &claims,
            1_700_000_000,
            None,
        );
        let bundle =
            SelectiveDisclosureBundle::plain(sign_jwt(&payload, &key).unwrap());

        let presentation = create_presentation(&bundle, &[], HOLDER).unwrap();
        let result = verify_presentation(
            &presentation.presentation_jwt,
            &[],
            resolver(key.verifying_key()),
            Utc::now(),
        );
        assert!(result.is_valid);
        assert_eq!(result.disclosed_claims["degree"], "BSc");
    }
}

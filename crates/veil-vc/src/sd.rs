//! # SD-JWT Selective-Disclosure Codec
//!
//! Transforms a claim set plus a selectively-disclosable subset into a
//! digest-bearing JWT payload with detachable disclosure tokens, and
//! reconstructs disclosed claims from a (payload, disclosure-set) pair.
//!
//! ## Scheme
//!
//! For each selectively-disclosable claim `k = v`:
//!
//! 1. draw a random 128-bit salt,
//! 2. encode the JSON array `[salt, k, v]` as base64url — the
//!    *disclosure*,
//! 3. commit `base64url(SHA-256(utf8(disclosure)))` into the payload's
//!    `_sd` array, and drop `k` from the plain payload.
//!
//! The payload also carries `_sd_alg: "sha-256"`. Unselected claims stay
//! as plain top-level fields and are always visible.
//!
//! ## Security Invariants
//!
//! - A disclosure whose recomputed digest is absent from `_sd` is
//!   **rejected** as tampered or foreign — never silently ignored.
//! - Digest membership is checked in constant time.
//! - A payload with an `_sd` array but a missing or non-`sha-256`
//!   `_sd_alg` is rejected outright; this engine does not guess digest
//!   algorithms.

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use subtle::{Choice, ConstantTimeEq};

use veil_crypto::sha256;

use crate::error::VcError;
use crate::jwt::{b64url_decode, b64url_encode, RESERVED_CLAIMS};

/// The digest algorithm tag this engine emits and accepts.
pub const SD_ALG_SHA256: &str = "sha-256";

/// Payload claim holding the disclosure digests.
pub const SD_DIGESTS_CLAIM: &str = "_sd";

/// Payload claim naming the digest algorithm.
pub const SD_ALG_CLAIM: &str = "_sd_alg";

/// Salt length in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// A single detachable disclosure: base64url of `[salt, name, value]`.
///
/// The encoded string is the unit of exchange — digests are computed over
/// it byte-for-byte, so it is kept verbatim rather than re-serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct Disclosure {
    encoded: String,
    salt: String,
    claim_name: String,
    claim_value: Value,
}

impl Disclosure {
    /// Create a disclosure for `name = value` with a fresh random salt.
    pub fn new(name: &str, value: Value) -> Result<Self, VcError> {
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = b64url_encode(&salt_bytes);

        let array = json!([salt, name, value]);
        let encoded = b64url_encode(&serde_json::to_vec(&array)?);

        Ok(Self {
            encoded,
            salt,
            claim_name: name.to_string(),
            claim_value: value,
        })
    }

    /// Parse a disclosure from its encoded form.
    pub fn from_encoded(encoded: &str) -> Result<Self, VcError> {
        let bytes = b64url_decode(encoded)
            .map_err(|e| VcError::InvalidDisclosure(format!("not base64url: {e}")))?;
        let array: Value = serde_json::from_slice(&bytes)
            .map_err(|e| VcError::InvalidDisclosure(format!("not JSON: {e}")))?;

        let items = array
            .as_array()
            .filter(|a| a.len() == 3)
            .ok_or_else(|| {
                VcError::InvalidDisclosure(
                    "expected a three-element [salt, name, value] array".to_string(),
                )
            })?;

        let salt = items[0]
            .as_str()
            .ok_or_else(|| VcError::InvalidDisclosure("salt must be a string".to_string()))?;
        let claim_name = items[1]
            .as_str()
            .ok_or_else(|| VcError::InvalidDisclosure("claim name must be a string".to_string()))?;

        Ok(Self {
            encoded: encoded.to_string(),
            salt: salt.to_string(),
            claim_name: claim_name.to_string(),
            claim_value: items[2].clone(),
        })
    }

    /// The encoded form carried on the wire.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The disclosed claim name.
    pub fn claim_name(&self) -> &str {
        &self.claim_name
    }

    /// The disclosed claim value.
    pub fn claim_value(&self) -> &Value {
        &self.claim_value
    }

    /// The salt drawn at issuance.
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// The digest committed into the payload's `_sd` array:
    /// `base64url(SHA-256(utf8(encoded)))`.
    pub fn digest(&self) -> String {
        b64url_encode(&sha256(self.encoded.as_bytes()))
    }
}

impl Serialize for Disclosure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encoded)
    }
}

impl<'de> Deserialize<'de> for Disclosure {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::from_encoded(&encoded).map_err(serde::de::Error::custom)
    }
}

/// The compact SD-JWT plus the full disclosure set generated at issuance.
///
/// The bundle is what gets persisted alongside the credential record;
/// presentations carry only a subset of `disclosures`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectiveDisclosureBundle {
    /// The compact serialization (JWT, or JWT plus `~`-joined disclosures).
    pub compact: String,
    /// Every disclosure generated at issuance.
    pub disclosures: Vec<Disclosure>,
}

impl SelectiveDisclosureBundle {
    /// Bundle a plain (no selective claims) credential JWT.
    pub fn plain(jwt: String) -> Self {
        Self {
            compact: jwt,
            disclosures: Vec::new(),
        }
    }

    /// The JWT segment of the compact string, without any disclosures.
    pub fn jwt_segment(&self) -> &str {
        self.compact.split('~').next().unwrap_or(&self.compact)
    }
}

/// Build the payload of an SD-JWT credential.
///
/// Claims named in `selective` are replaced by `_sd` digests; the rest
/// stay as plain top-level payload fields. Returns the payload together
/// with the generated disclosures, in claim order.
pub fn selective_payload(
    issuer_did: &str,
    holder_did: &str,
    credential_type: &str,
    claims: &Map<String, Value>,
    selective: &[String],
    issued_at: i64,
    expires_at: Option<i64>,
) -> Result<(Value, Vec<Disclosure>), VcError> {
    for name in selective {
        if !claims.contains_key(name) {
            return Err(VcError::UnknownSelectiveClaim(name.clone()));
        }
    }

    let mut payload = Map::new();
    payload.insert("iss".to_string(), json!(issuer_did));
    payload.insert("sub".to_string(), json!(holder_did));
    payload.insert("iat".to_string(), json!(issued_at));
    if let Some(exp) = expires_at {
        payload.insert("exp".to_string(), json!(exp));
    }
    payload.insert("vct".to_string(), json!(credential_type));

    let mut disclosures = Vec::with_capacity(selective.len());
    let mut digests = Vec::with_capacity(selective.len());

    for (name, value) in claims {
        if selective.contains(name) {
            let disclosure = Disclosure::new(name, value.clone())?;
            digests.push(json!(disclosure.digest()));
            disclosures.push(disclosure);
        } else {
            payload.insert(name.clone(), value.clone());
        }
    }

    payload.insert(SD_DIGESTS_CLAIM.to_string(), Value::Array(digests));
    payload.insert(SD_ALG_CLAIM.to_string(), json!(SD_ALG_SHA256));

    Ok((Value::Object(payload), disclosures))
}

/// Join a JWT and disclosures into the compact SD-JWT form:
/// `<jwt>` + (`~` + disclosure)* + trailing `~`.
///
/// With no disclosures the JWT passes through untouched (a plain
/// credential has no tildes at all).
pub fn serialize_compact(jwt: &str, disclosures: &[Disclosure]) -> String {
    if disclosures.is_empty() {
        return jwt.to_string();
    }
    let mut compact = String::from(jwt);
    for disclosure in disclosures {
        compact.push('~');
        compact.push_str(disclosure.encoded());
    }
    compact.push('~');
    compact
}

/// Split a compact string into its JWT segment and candidate disclosure
/// segments. Empty segments (including the trailing `~`) are dropped.
pub fn split_compact(compact: &str) -> (&str, Vec<&str>) {
    let mut parts = compact.split('~');
    let jwt = parts.next().unwrap_or(compact);
    let disclosures = parts.filter(|s| !s.is_empty()).collect();
    (jwt, disclosures)
}

/// Reconstruct the disclosed-claims map from a verified payload and a set
/// of presented disclosures.
///
/// Every presented disclosure must recompute to a digest present in the
/// payload's `_sd` array; one that does not is rejected as tampered or
/// foreign. Plain payload fields (for SD payloads: top-level fields
/// outside the reserved set; for plain payloads: the members of
/// `vc.credentialSubject`) are copied into the same map.
pub fn disclosed_claims(
    payload: &Map<String, Value>,
    disclosures: &[Disclosure],
) -> Result<Map<String, Value>, VcError> {
    let committed = committed_digests(payload)?;

    if !disclosures.is_empty() && committed.is_empty() {
        return Err(VcError::DisclosureNotCommitted(
            disclosures[0].claim_name().to_string(),
        ));
    }

    let mut claims = Map::new();

    // Plain fields from the vc envelope, when present.
    if let Some(subject) = payload
        .get("vc")
        .and_then(|vc| vc.get("credentialSubject"))
        .and_then(Value::as_object)
    {
        for (name, value) in subject {
            claims.insert(name.clone(), value.clone());
        }
    }

    // Plain top-level fields outside the reserved set.
    for (name, value) in payload {
        if !RESERVED_CLAIMS.contains(&name.as_str()) {
            claims.insert(name.clone(), value.clone());
        }
    }

    for disclosure in disclosures {
        if !digest_is_committed(&disclosure.digest(), &committed) {
            return Err(VcError::DisclosureNotCommitted(
                disclosure.claim_name().to_string(),
            ));
        }
        claims.insert(
            disclosure.claim_name().to_string(),
            disclosure.claim_value().clone(),
        );
    }

    Ok(claims)
}

/// Extract the `_sd` digest list, enforcing the `_sd_alg` policy.
fn committed_digests(payload: &Map<String, Value>) -> Result<Vec<String>, VcError> {
    let Some(sd) = payload.get(SD_DIGESTS_CLAIM) else {
        return Ok(Vec::new());
    };

    let digests = sd
        .as_array()
        .ok_or_else(|| VcError::MalformedCompact("_sd must be an array".to_string()))?
        .iter()
        .map(|d| {
            d.as_str()
                .map(str::to_string)
                .ok_or_else(|| VcError::MalformedCompact("_sd entries must be strings".to_string()))
        })
        .collect::<Result<Vec<String>, VcError>>()?;

    match payload.get(SD_ALG_CLAIM).and_then(Value::as_str) {
        Some(SD_ALG_SHA256) => Ok(digests),
        Some(other) => Err(VcError::UnsupportedDigestAlgorithm(other.to_string())),
        None => Err(VcError::UnsupportedDigestAlgorithm(
            "missing _sd_alg".to_string(),
        )),
    }
}

/// Constant-time membership test of a digest against the committed set.
fn digest_is_committed(digest: &str, committed: &[String]) -> bool {
    let mut found = Choice::from(0u8);
    for candidate in committed {
        if candidate.len() == digest.len() {
            found |= candidate.as_bytes().ct_eq(digest.as_bytes());
        }
    }
    found.into()
}

//! # Compact JWT Credential Codec
//!
//! Encodes and decodes the `vc+jwt` compact form:
//! `base64url(header) . base64url(payload) . base64url(signature)`.
//!
//! The Ed25519 signature covers the ASCII bytes of
//! `"<header-b64>.<payload-b64>"` — the signing input is the encoded
//! text, never the decoded JSON, so verification is byte-exact regardless
//! of JSON formatting differences between implementations.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use veil_crypto::{Ed25519Signature, SigningKey};

use crate::error::VcError;

/// The `typ` header value for credential JWTs.
pub const CREDENTIAL_JWT_TYP: &str = "vc+jwt";

/// The only signature algorithm this engine speaks.
pub const EDDSA_ALG: &str = "EdDSA";

/// JSON-LD context for the embedded `vc` object.
pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";

/// The base credential type tag.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// Registered JWT claim names plus this engine's bookkeeping claims.
/// These never count as disclosed subject claims.
pub const RESERVED_CLAIMS: [&str; 12] = [
    "iss", "sub", "iat", "exp", "nbf", "jti", "aud", "cnf", "vc", "vct", "_sd", "_sd_alg",
];

/// The protected JWT header.
///
/// Field order matters for byte-exact serialization: `typ` then `alg`,
/// matching the canonical header `{"typ":"vc+jwt","alg":"EdDSA"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtHeader {
    /// Token type, always `vc+jwt` for credentials.
    pub typ: String,
    /// Signature algorithm, always `EdDSA`.
    pub alg: String,
}

impl JwtHeader {
    /// The header every credential JWT carries.
    pub fn credential() -> Self {
        Self {
            typ: CREDENTIAL_JWT_TYP.to_string(),
            alg: EDDSA_ALG.to_string(),
        }
    }

    /// Whether this engine can verify a token with this header.
    pub fn is_supported(&self) -> bool {
        self.typ == CREDENTIAL_JWT_TYP && self.alg == EDDSA_ALG
    }
}

/// Encode bytes as unpadded base64url.
pub fn b64url_encode(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}

/// Decode an unpadded base64url string.
pub fn b64url_decode(s: &str) -> Result<Vec<u8>, VcError> {
    Base64UrlUnpadded::decode_vec(s).map_err(|e| VcError::Base64(e.to_string()))
}

/// Serialize a value to JSON and base64url-encode it as a JWT segment.
pub fn encode_json_segment<T: Serialize>(value: &T) -> Result<String, VcError> {
    let bytes = serde_json::to_vec(value)?;
    Ok(b64url_encode(&bytes))
}

/// Sign a payload into a compact credential JWT.
pub fn sign_jwt(payload: &Value, key: &SigningKey) -> Result<String, VcError> {
    let header_b64 = encode_json_segment(&JwtHeader::credential())?;
    let payload_b64 = encode_json_segment(payload)?;
    let signing_input = format!("{header_b64}.{payload_b64}");
    let signature = key.sign(signing_input.as_bytes());
    Ok(format!(
        "{signing_input}.{}",
        b64url_encode(signature.as_bytes())
    ))
}

/// A decoded (but not yet verified) compact JWT.
#[derive(Debug, Clone)]
pub struct DecodedJwt {
    /// The protected header.
    pub header: JwtHeader,
    /// The payload claims.
    pub payload: Map<String, Value>,
    /// The exact ASCII signing input, `"<header-b64>.<payload-b64>"`.
    pub signing_input: String,
    /// The detached signature.
    pub signature: Ed25519Signature,
}

/// Split and decode a compact JWT.
///
/// The string must consist of exactly three dot-separated segments; each
/// segment must decode as base64url, the first two as JSON.
pub fn decode_jwt(compact: &str) -> Result<DecodedJwt, VcError> {
    let segments: Vec<&str> = compact.split('.').collect();
    if segments.len() != 3 {
        return Err(VcError::MalformedCompact(format!(
            "expected 3 dot-separated segments, found {}",
            segments.len()
        )));
    }

    let header_bytes = b64url_decode(segments[0])?;
    let header: JwtHeader = serde_json::from_slice(&header_bytes)?;

    let payload_bytes = b64url_decode(segments[1])?;
    let payload_value: Value = serde_json::from_slice(&payload_bytes)?;
    let payload = payload_value
        .as_object()
        .cloned()
        .ok_or_else(|| VcError::MalformedCompact("payload is not a JSON object".to_string()))?;

    let signature_bytes = b64url_decode(segments[2])?;
    let signature = Ed25519Signature::from_slice(&signature_bytes)?;

    Ok(DecodedJwt {
        header,
        payload,
        signing_input: format!("{}.{}", segments[0], segments[1]),
        signature,
    })
}

/// Build the payload of a plain (fully visible) credential JWT.
///
/// Claims live under `vc.credentialSubject`; the envelope carries the
/// standard `iss`/`sub`/`iat` (and optional `exp`) claims.
pub fn credential_payload(
    issuer_did: &str,
    holder_did: &str,
    credential_type: &str,
    claims: &Map<String, Value>,
    issued_at: i64,
    expires_at: Option<i64>,
) -> Value {
    let mut payload = Map::new();
    payload.insert("iss".to_string(), json!(issuer_did));
    payload.insert("sub".to_string(), json!(holder_did));
    payload.insert("iat".to_string(), json!(issued_at));
    if let Some(exp) = expires_at {
        payload.insert("exp".to_string(), json!(exp));
    }
    payload.insert(
        "vc".to_string(),
        json!({
            "@context": [CREDENTIALS_CONTEXT],
            "type": [VERIFIABLE_CREDENTIAL_TYPE, credential_type],
            "credentialSubject": claims,
        }),
    );
    Value::Object(payload)
}

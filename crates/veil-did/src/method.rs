//! # DID Methods
//!
//! The two supported DID methods as a tagged variant, with identifier
//! construction and parsing for each. Dispatch happens on the method tag
//! parsed from the DID string prefix — there is no method-object
//! hierarchy.
//!
//! ## Identifier rules
//!
//! - `did:key` — `did:key:z<base58btc(0xed 0x01 ‖ pubkey)>`; the two-byte
//!   multicodec prefix marks the key type (Ed25519), and the multibase
//!   `z` marks base58btc.
//! - `did:web` — `did:web:<domain>[:<segment>]*`; colons separate path
//!   segments, and no key material appears in the identifier.

use multibase::Base;
use serde::{Deserialize, Serialize};

use veil_crypto::VerifyingKey;

use crate::error::DidError;

/// Multicodec prefix for an Ed25519 public key.
const ED25519_CODEC: [u8; 2] = [0xed, 0x01];

/// A DID method together with its method-specific creation inputs.
///
/// `Key` needs nothing beyond a fresh key pair; `Web` carries the hosting
/// domain and optional path segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DidMethod {
    /// Self-contained method: the public key is the identifier.
    Key,
    /// Web-hosted method: the identifier names where the document lives.
    Web {
        /// Host domain, e.g. `credentials.example.com`.
        domain: String,
        /// Optional path below the domain, one segment per element.
        path_segments: Vec<String>,
    },
}

impl DidMethod {
    /// Method name as it appears in the identifier (`key` or `web`).
    pub fn name(&self) -> &'static str {
        match self {
            DidMethod::Key => "key",
            DidMethod::Web { .. } => "web",
        }
    }

    /// Parse the method tag (and any method-specific parts) out of a DID
    /// string.
    pub fn parse(did: &str) -> Result<Self, DidError> {
        let rest = did
            .strip_prefix("did:")
            .ok_or_else(|| DidError::InputValidation(format!("not a DID: {did:?}")))?;

        if let Some(key_part) = rest.strip_prefix("key:") {
            if !key_part.starts_with('z') || key_part.len() < 2 {
                return Err(DidError::InputValidation(
                    "did:key identifier must be a multibase base58btc string".to_string(),
                ));
            }
            return Ok(DidMethod::Key);
        }

        if let Some(web_part) = rest.strip_prefix("web:") {
            let mut parts = web_part.split(':');
            let domain = parts.next().unwrap_or_default().to_string();
            validate_domain(&domain)?;
            let path_segments: Vec<String> = parts.map(str::to_string).collect();
            if path_segments.iter().any(|s| s.is_empty()) {
                return Err(DidError::InputValidation(format!(
                    "did:web identifier has an empty path segment: {did:?}"
                )));
            }
            return Ok(DidMethod::Web {
                domain,
                path_segments,
            });
        }

        let method = rest.split(':').next().unwrap_or(rest);
        Err(DidError::InputValidation(format!(
            "unsupported DID method: {method:?}"
        )))
    }

    /// Check the method-specific inputs without generating any keys.
    ///
    /// `create_did` calls this first so a malformed domain fails before
    /// the expense of key generation and wrapping.
    pub fn validate(&self) -> Result<(), DidError> {
        match self {
            DidMethod::Key => Ok(()),
            DidMethod::Web {
                domain,
                path_segments,
            } => {
                validate_domain(domain)?;
                for segment in path_segments {
                    if segment.is_empty() || segment.contains([':', '/', '?', '#']) {
                        return Err(DidError::InputValidation(format!(
                            "invalid did:web path segment: {segment:?}"
                        )));
                    }
                }
                Ok(())
            }
        }
    }

    /// Build the identifier string for this method and public key.
    ///
    /// For `did:web` the key plays no part in the identifier; it appears
    /// only in the DID Document.
    pub fn identifier(&self, public_key: &VerifyingKey) -> Result<String, DidError> {
        match self {
            DidMethod::Key => Ok(did_key_identifier(public_key)),
            DidMethod::Web {
                domain,
                path_segments,
            } => did_web_identifier(domain, path_segments),
        }
    }
}

impl std::fmt::Display for DidMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Construct a `did:key` identifier from an Ed25519 public key.
pub fn did_key_identifier(public_key: &VerifyingKey) -> String {
    let mut multi_bytes = Vec::with_capacity(2 + 32);
    multi_bytes.extend_from_slice(&ED25519_CODEC);
    multi_bytes.extend_from_slice(public_key.as_bytes());
    let multikey = multibase::encode(Base::Base58Btc, &multi_bytes);
    format!("did:key:{multikey}")
}

/// Construct a `did:web` identifier from a domain and path segments.
pub fn did_web_identifier(domain: &str, path_segments: &[String]) -> Result<String, DidError> {
    validate_domain(domain)?;
    let mut identifier = format!("did:web:{domain}");
    for segment in path_segments {
        if segment.is_empty() || segment.contains([':', '/', '?', '#']) {
            return Err(DidError::InputValidation(format!(
                "invalid did:web path segment: {segment:?}"
            )));
        }
        identifier.push(':');
        identifier.push_str(segment);
    }
    Ok(identifier)
}

/// Extract the Ed25519 public key embedded in a `did:key` identifier.
pub fn did_key_public_key(did: &str) -> Result<VerifyingKey, DidError> {
    let multikey = did
        .strip_prefix("did:key:")
        .ok_or_else(|| DidError::InputValidation(format!("not a did:key identifier: {did:?}")))?;

    let (base, key_bytes) = multibase::decode(multikey)
        .map_err(|e| DidError::InputValidation(format!("invalid multibase key: {e}")))?;
    if base != Base::Base58Btc {
        return Err(DidError::InputValidation(
            "did:key identifier must use base58btc encoding".to_string(),
        ));
    }
    if key_bytes.len() != 2 + 32 {
        return Err(DidError::InputValidation(format!(
            "did:key payload must be 34 bytes, got {}",
            key_bytes.len()
        )));
    }
    if key_bytes[0..2] != ED25519_CODEC {
        return Err(DidError::InputValidation(
            "did:key identifier does not carry an Ed25519 key".to_string(),
        ));
    }

    let mut raw = [0u8; 32];
    raw.copy_from_slice(&key_bytes[2..]);
    VerifyingKey::from_bytes(raw).map_err(DidError::from)
}

/// Validate a `did:web` host domain.
///
/// Accepts registrable domains and `localhost`; rejects anything that
/// smells like a URL (scheme, slash, port, whitespace) so malformed input
/// fails before key generation.
fn validate_domain(domain: &str) -> Result<(), DidError> {
    if domain.is_empty() {
        return Err(DidError::InputValidation(
            "did:web domain must not be empty".to_string(),
        ));
    }
    if domain.contains(['/', ':', '?', '#', '@']) || domain.contains("//") {
        return Err(DidError::InputValidation(format!(
            "did:web domain must be a bare host name: {domain:?}"
        )));
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(DidError::InputValidation(format!(
            "did:web domain contains whitespace: {domain:?}"
        )));
    }
    let valid_chars = domain
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if !valid_chars {
        return Err(DidError::InputValidation(format!(
            "did:web domain contains invalid characters: {domain:?}"
        )));
    }
    if !domain.contains('.') && domain != "localhost" {
        return Err(DidError::InputValidation(format!(
            "did:web domain must be fully qualified: {domain:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;
    use veil_crypto::SigningKey;

    fn fresh_key() -> VerifyingKey {
        SigningKey::generate(&mut OsRng).verifying_key()
    }

    #[test]
    fn did_key_identifier_shape() {
        let did = did_key_identifier(&fresh_key());
        assert!(did.starts_with("did:key:z"));
        // base58btc alphabet excludes 0, O, I, l.
        let multikey = &did["did:key:z".len()..];
        assert!(!multikey.contains(['0', 'O', 'I', 'l']));
    }

    #[test]
    fn did_key_roundtrips_public_key() {
        let vk = fresh_key();
        let did = did_key_identifier(&vk);
        assert_eq!(did_key_public_key(&did).unwrap(), vk);
    }

    #[test]
    fn did_key_embeds_multicodec_prefix() {
        let vk = fresh_key();
        let did = did_key_identifier(&vk);
        let (_, bytes) = multibase::decode(&did["did:key:".len()..]).unwrap();
        assert_eq!(&bytes[0..2], &[0xed, 0x01]);
        assert_eq!(&bytes[2..], vk.as_bytes());
    }

    #[test]
    fn did_key_public_key_rejects_wrong_codec() {
        let mut bytes = vec![0xec, 0x01];
        bytes.extend_from_slice(fresh_key().as_bytes());
        let did = format!("did:key:{}", multibase::encode(Base::Base58Btc, &bytes));
        assert!(matches!(
            did_key_public_key(&did),
            Err(DidError::InputValidation(_))
        ));
    }

    #[test]
    fn did_web_identifier_plain_domain() {
        let did = did_web_identifier("credentials.example.com", &[]).unwrap();
        assert_eq!(did, "did:web:credentials.example.com");
    }

    #[test]
    fn did_web_identifier_with_path() {
        let segments = vec!["issuers".to_string(), "acme".to_string()];
        let did = did_web_identifier("example.com", &segments).unwrap();
        assert_eq!(did, "did:web:example.com:issuers:acme");
    }

    #[test]
    fn did_web_rejects_url_like_domains() {
        for bad in ["", "https://example.com", "example.com/path", "exa mple.com", "example"] {
            assert!(
                matches!(
                    did_web_identifier(bad, &[]),
                    Err(DidError::InputValidation(_))
                ),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn did_web_accepts_localhost() {
        assert!(did_web_identifier("localhost", &[]).is_ok());
    }

    #[test]
    fn parse_dispatches_on_prefix() {
        let key_did = did_key_identifier(&fresh_key());
        assert_eq!(DidMethod::parse(&key_did).unwrap(), DidMethod::Key);

        let parsed = DidMethod::parse("did:web:example.com:issuers:acme").unwrap();
        assert_eq!(
            parsed,
            DidMethod::Web {
                domain: "example.com".to_string(),
                path_segments: vec!["issuers".to_string(), "acme".to_string()],
            }
        );
    }

    #[test]
    fn parse_rejects_unknown_method() {
        let err = DidMethod::parse("did:ion:EiClkZMDxPKqC9c").unwrap_err();
        assert!(matches!(err, DidError::InputValidation(_)));
        assert!(format!("{err}").contains("ion"));
    }

    #[test]
    fn parse_rejects_non_did() {
        assert!(DidMethod::parse("urn:uuid:1234").is_err());
    }

    #[test]
    fn method_display() {
        assert_eq!(DidMethod::Key.to_string(), "key");
        let web = DidMethod::Web {
            domain: "example.com".to_string(),
            path_segments: vec![],
        };
        assert_eq!(web.to_string(), "web");
    }
}

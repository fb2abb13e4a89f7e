//! # DID Documents
//!
//! The W3C-shaped JSON document describing a DID's verification methods.
//! The shape is fixed: one `Ed25519VerificationKey2020` verification
//! method with a `publicKeyMultibase` key, referenced from
//! `authentication`.

use multibase::Base;
use serde::{Deserialize, Serialize};

use veil_crypto::VerifyingKey;

/// The JSON-LD context every document carries.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Verification method type for Ed25519 keys.
pub const ED25519_VERIFICATION_KEY_2020: &str = "Ed25519VerificationKey2020";

/// A W3C DID Document.
///
/// Field names follow the DID Core vocabulary via serde renames; the Rust
/// side stays snake_case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidDocument {
    /// JSON-LD context URIs.
    #[serde(rename = "@context")]
    pub context: Vec<String>,

    /// The DID this document describes.
    pub id: String,

    /// Public keys usable to verify signatures from this DID.
    #[serde(rename = "verificationMethod")]
    pub verification_method: Vec<VerificationMethod>,

    /// Verification-method references authorized for authentication.
    pub authentication: Vec<String>,
}

/// A single verification method entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationMethod {
    /// DID URL of this key, e.g. `did:web:example.com#keys-1`.
    pub id: String,

    /// Key type tag.
    #[serde(rename = "type")]
    pub method_type: String,

    /// The DID controlling this key.
    pub controller: String,

    /// The public key, multibase-encoded (base58btc, `z` prefix).
    #[serde(rename = "publicKeyMultibase")]
    pub public_key_multibase: String,
}

impl DidDocument {
    /// Build the document for a DID and its Ed25519 public key.
    ///
    /// The single verification method is always `<did>#keys-1`.
    pub fn for_key(did: &str, public_key: &VerifyingKey) -> Self {
        let key_id = format!("{did}#keys-1");
        Self {
            context: vec![DID_CONTEXT.to_string()],
            id: did.to_string(),
            verification_method: vec![VerificationMethod {
                id: key_id.clone(),
                method_type: ED25519_VERIFICATION_KEY_2020.to_string(),
                controller: did.to_string(),
                public_key_multibase: multibase_public_key(public_key),
            }],
            authentication: vec![key_id],
        }
    }

    /// The document's primary verification key, decoded.
    pub fn primary_public_key(&self) -> Option<VerifyingKey> {
        let vm = self.verification_method.first()?;
        let (_, bytes) = multibase::decode(&vm.public_key_multibase).ok()?;
        let raw: [u8; 32] = bytes.try_into().ok()?;
        VerifyingKey::from_bytes(raw).ok()
    }
}

/// Encode a public key for the `publicKeyMultibase` field: base58btc over
/// the raw 32 key bytes, `z` prefix.
pub fn multibase_public_key(public_key: &VerifyingKey) -> String {
    multibase::encode(Base::Base58Btc, public_key.as_bytes())
}

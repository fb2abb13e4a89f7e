//! # Ed25519 Signing and Verification
//!
//! Newtype wrappers over `ed25519-dalek` used for credential JWT signatures
//! and DID verification methods.
//!
//! ## Security Invariants
//!
//! - [`SigningKey`] does not implement `Serialize` and its `Debug` output
//!   is redacted — private key material never reaches logs, responses,
//!   or persisted artifacts except through the [`KeyWrap`](crate::KeyWrap)
//!   collaborator.
//! - Seed bytes exposed via [`SigningKey::seed_bytes`] are for immediate
//!   wrapping only; callers zeroize their copy after use.
//! - Verification requires a well-formed 32-byte public key and a 64-byte
//!   signature; length errors are rejected at construction, not at verify
//!   time.
//!
//! ## Serde
//!
//! Public keys serialize/deserialize as lowercase hex strings. Signatures
//! move through the workspace as raw bytes and are encoded at the JWT
//! layer, so they carry no serde of their own.

use ed25519_dalek::{Signer, Verifier};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

use crate::error::CryptoError;

/// An Ed25519 public key (32 bytes) for signature verification.
///
/// Serializes as a hex-encoded string for JSON interoperability.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct VerifyingKey(pub [u8; 32]);

/// An Ed25519 signature (64 bytes).
#[derive(Clone, PartialEq, Eq)]
pub struct Ed25519Signature(pub [u8; 64]);

/// An Ed25519 key pair for signing operations.
///
/// Does not implement `Serialize` — private keys must not be accidentally
/// serialized into logs, responses, or artifacts. At-rest protection goes
/// through [`KeyWrap`](crate::KeyWrap) on the raw seed instead.
pub struct SigningKey {
    inner: ed25519_dalek::SigningKey,
}

// ---------------------------------------------------------------------------
// VerifyingKey impls
// ---------------------------------------------------------------------------

impl VerifyingKey {
    /// Create a public key from raw 32 bytes, validating it is a point on
    /// the curve.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, CryptoError> {
        ed25519_dalek::VerifyingKey::from_bytes(&bytes)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Return the raw 32-byte public key.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the public key as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Parse a public key from a 64-character hex string.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let bytes = hex_to_bytes(hex.trim())?;
        let arr: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            CryptoError::InvalidPublicKey(format!("expected 32 bytes, got {}", b.len()))
        })?;
        Self::from_bytes(arr)
    }

    /// Verify an Ed25519 signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &Ed25519Signature) -> Result<(), CryptoError> {
        let vk = ed25519_dalek::VerifyingKey::from_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        vk.verify(message, &sig)
            .map_err(|e| CryptoError::VerificationFailed(e.to_string()))
    }
}

impl Serialize for VerifyingKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for VerifyingKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VerifyingKey({}…)", hex_prefix(&self.0))
    }
}

impl std::fmt::Display for VerifyingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Signature impls
// ---------------------------------------------------------------------------

impl Ed25519Signature {
    /// Create a signature from raw 64 bytes.
    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }

    /// Create a signature from a byte slice, checking the length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 64] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength(bytes.len()))?;
        Ok(Self(arr))
    }

    /// Return the raw 64-byte signature.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl std::fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ed25519Signature({}…)", hex_prefix(&self.0))
    }
}

// ---------------------------------------------------------------------------
// SigningKey impls
// ---------------------------------------------------------------------------

impl SigningKey {
    /// Generate a new key pair from a cryptographically secure RNG.
    pub fn generate<R: rand_core::CryptoRngCore>(csprng: &mut R) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::generate(csprng),
        }
    }

    /// Reconstruct a key pair from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            inner: ed25519_dalek::SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a key pair from a seed slice, checking the length.
    pub fn from_seed_slice(seed: &[u8]) -> Result<Self, CryptoError> {
        let arr: [u8; 32] = seed.try_into().map_err(|_| {
            CryptoError::InvalidSigningKey(format!("expected 32-byte seed, got {}", seed.len()))
        })?;
        Ok(Self::from_seed(&arr))
    }

    /// Return a copy of the raw 32-byte seed for wrapping at rest.
    ///
    /// The caller owns the copy and must zeroize it once wrapped.
    pub fn seed_bytes(&self) -> [u8; 32] {
        self.inner.to_bytes()
    }

    /// Sign a message, producing a 64-byte Ed25519 signature.
    pub fn sign(&self, message: &[u8]) -> Ed25519Signature {
        Ed25519Signature(self.inner.sign(message).to_bytes())
    }

    /// Return the corresponding public key.
    pub fn verifying_key(&self) -> VerifyingKey {
        VerifyingKey(self.inner.verifying_key().to_bytes())
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show only the public half.
        write!(f, "SigningKey(pub {}…)", hex_prefix(&self.inner.verifying_key().to_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Hex helpers
// ---------------------------------------------------------------------------

/// Render bytes as a lowercase hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a lowercase/uppercase hex string into bytes.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CryptoError> {
    if hex.len() % 2 != 0 {
        return Err(CryptoError::HexDecode(format!(
            "odd-length hex string ({} chars)",
            hex.len()
        )));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| CryptoError::HexDecode(format!("at offset {i}: {e}")))
        })
        .collect()
}

fn hex_prefix(bytes: &[u8]) -> String {
    bytes_to_hex(&bytes[..4.min(bytes.len())])
}

/// Zeroize a seed buffer after wrapping.
///
/// Thin convenience over the `zeroize` crate so call sites in other crates
/// do not need a direct dependency for this one operation.
pub fn zeroize_seed(seed: &mut [u8]) {
    seed.zeroize();
}

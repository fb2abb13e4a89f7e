//! # veil-crypto — Cryptographic Primitives for the Veil Stack
//!
//! This crate provides the cryptographic building blocks used throughout
//! the workspace:
//!
//! - **Ed25519** signing and verification for credential JWTs and DID
//!   verification methods.
//! - **SHA-256 digest computation** for selective-disclosure digests and
//!   public-key fingerprints.
//! - **Key wrapping** ([`KeyWrap`]) — the abstraction over the external
//!   encryption service that protects Ed25519 seeds at rest.
//!
//! ## Security Invariants
//!
//! - [`SigningKey`] does not implement `Serialize` and redacts its `Debug`
//!   output — private key material cannot leak into logs or responses.
//! - Seed bytes handed out for wrapping are zeroized by the caller after
//!   use; the wrapper type itself zeroizes on drop.
//! - All pure operations here are synchronous and free of shared mutable
//!   state; they are safe to run concurrently across requests.

pub mod digest;
pub mod ed25519;
pub mod error;
pub mod keywrap;

// Re-export primary types.
pub use digest::{key_fingerprint, sha256, sha256_hex};
pub use ed25519::{bytes_to_hex, hex_to_bytes, zeroize_seed, Ed25519Signature, SigningKey, VerifyingKey};
pub use error::CryptoError;
pub use keywrap::{KeyWrap, PlaintextKeyWrap};

//! # veil-did — Decentralized Identifiers for the Veil Stack
//!
//! Implements the self-describing DID methods used by the credential
//! engine:
//!
//! - **`did:key`** — the identifier embeds the Ed25519 public key as a
//!   multicodec-prefixed, base58btc-multibase string.
//! - **`did:web`** — the identifier names a domain (plus optional path
//!   segments); the key lives only in the hosted DID Document.
//!
//! Ledger-anchored methods are deliberately unsupported.
//!
//! The [`DidManager`] owns the key-material lifecycle: it generates
//! Ed25519 key pairs, hands seeds to the key-wrapping collaborator before
//! anything is persisted, builds the W3C-shaped [`DidDocument`], and
//! resolves identifiers back to [`DidRecord`]s through the
//! [`DidRepository`] seam.
//!
//! ## Security Invariants
//!
//! - A DID record never stores a raw seed — only the opaque blob returned
//!   by [`KeyWrap`](veil_crypto::KeyWrap).
//! - A deactivated DID can never sign: [`DidManager::issuer_signing_key`]
//!   refuses before touching the wrapped blob.
//! - Records follow a soft lifecycle — status flips are the only mutation,
//!   and nothing is ever deleted.

pub mod document;
pub mod error;
pub mod manager;
pub mod method;
pub mod record;
pub mod store;

// Re-export primary types.
pub use document::{DidDocument, VerificationMethod};
pub use error::DidError;
pub use manager::DidManager;
pub use method::DidMethod;
pub use record::{DidRecord, DidStatus};
pub use store::DidRepository;

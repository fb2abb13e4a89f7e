//! # veil-vc — Credential Cryptographic Engine
//!
//! The signing, disclosure, and verification core of the Veil Stack:
//!
//! - **JWT codec** ([`jwt`]) — compact `vc+jwt` credentials signed with
//!   Ed25519 (`EdDSA`).
//! - **SD-JWT codec** ([`sd`]) — the selective-disclosure digest scheme:
//!   salted disclosures, `_sd` digest arrays, and reconstruction of
//!   disclosed claims.
//! - **Verifier** ([`verify`]) — the terminal-state verification machine
//!   producing a [`VerificationResult`] value instead of throwing for bad
//!   credentials.
//! - **Presentation engine** ([`presentation`]) — holder-side derivation
//!   of claim-reduced presentations without re-signing.
//!
//! ## Concurrency
//!
//! Everything in this crate is a synchronous, side-effect-free function of
//! its inputs (apart from salt generation, which draws from the OS CSPRNG).
//! Nothing here suspends, blocks, or shares mutable state; resolution and
//! persistence live above in `veil-service`.

pub mod error;
pub mod jwt;
pub mod presentation;
pub mod sd;
pub mod verify;

// Re-export primary types.
pub use error::VcError;
pub use jwt::{DecodedJwt, JwtHeader};
pub use presentation::{create_presentation, verify_presentation, Presentation};
pub use sd::{Disclosure, SelectiveDisclosureBundle};
pub use verify::{peek_issuer, verify_credential, VerificationResult, VerificationStatus};

//! # veil-core — Foundational Types for the Veil Stack
//!
//! This crate is the bedrock of the Veil Stack. It defines the type-system
//! primitives shared by every other crate in the workspace; it depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `TenantId`, `CredentialId` —
//!    newtypes over `Uuid`. No bare strings or bare UUIDs for identifiers.
//!
//! 2. **Injected time.** All expiry and rate-limit-window arithmetic flows
//!    through the [`Clock`] trait, never `Utc::now()` called inline. Tests
//!    drive a [`ManualClock`]; production uses [`SystemClock`].
//!
//! 3. **Explicit tenant context.** The caller's tenant is read from a
//!    [`TenantContext`] collaborator passed by dependency — never from
//!    ambient/global state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `veil-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod identity;
pub mod store;
pub mod temporal;
pub mod tenant;

// Re-export primary types for ergonomic imports.
pub use identity::{CredentialId, TenantId};
pub use store::StoreError;
pub use temporal::{Clock, ManualClock, SystemClock};
pub use tenant::{StaticTenantContext, TenantContext};

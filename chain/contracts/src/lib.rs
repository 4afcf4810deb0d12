//! Permissioned Custody Vault
//!
//! This crate implements the contract layer for role-gated custody of four
//! asset classes: native currency, fungible tokens, non-fungible tokens,
//! and semi-fungible tokens. Custody is pooled, with no per-depositor
//! accounting, and release is gated on an administratively granted
//! controller role.
//!
//! # Modules
//! - `errors`: Contract-specific error taxonomy
//! - `events`: Audit events emitted by every successful state mutation
//! - `security`: Shared security primitives (role registry, pause gate, reentrancy latch)
//! - `assets`: Asset collaborator interfaces and transfer failure type
//! - `vault`: Deposit/withdraw handlers and the admin surface
//! - `testing`: In-memory reference collaborators
//!
//! # Version
//! v0.1.0

pub mod assets;
pub mod errors;
pub mod events;
pub mod security;
pub mod testing;
pub mod vault;

/// Vault ABI version — frozen after release
pub const VAULT_ABI_VERSION: &str = "1.0.0";

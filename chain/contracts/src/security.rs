//! Shared security primitives for the vault
//!
//! Provides the role registry, pause gate, and reentrancy latch used by
//! every custody operation.

use std::collections::HashSet;
use types::ids::AccountId;

/// Reentrancy latch preventing nested calls into guarded operations.
///
/// An operation enters the latch before touching any external collaborator
/// and exits on completion. A nested entry attempt while the latch is held
/// fails, so a hostile destination cannot recursively drain balance before
/// the first call's balance check catches up.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    entered: bool,
}

impl ReentrancyGuard {
    /// Create a new open latch.
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter the latch. Returns `false` if already held (reentrancy attempt).
    pub fn enter(&mut self) -> bool {
        if self.entered {
            return false;
        }
        self.entered = true;
        true
    }

    /// Exit the latch.
    pub fn exit(&mut self) {
        self.entered = false;
    }

    /// Check if the latch is currently held.
    pub fn is_entered(&self) -> bool {
        self.entered
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Role registry: one administering authority, plus the set of identities
/// authorized to withdraw (controllers).
///
/// Membership is a plain boolean per identity, neither ordered nor counted.
/// The authority given at construction starts as a controller. All
/// mutations are authority-gated and idempotent: granting an existing
/// member or revoking a non-member is a no-op, not an error.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    authority: AccountId,
    controllers: HashSet<AccountId>,
}

impl RoleRegistry {
    /// Create a registry with the given authority as sole initial controller.
    pub fn new(authority: AccountId) -> Self {
        let mut controllers = HashSet::new();
        controllers.insert(authority);
        Self {
            authority,
            controllers,
        }
    }

    /// Check if a caller is the authority.
    pub fn is_authority(&self, caller: &AccountId) -> bool {
        *caller == self.authority
    }

    /// Check if an identity holds the controller role.
    pub fn is_controller(&self, identity: &AccountId) -> bool {
        self.controllers.contains(identity)
    }

    /// Grant the controller role to `target`. Authority-only.
    /// Returns `false` if the caller is not the authority.
    pub fn grant(&mut self, caller: &AccountId, target: AccountId) -> bool {
        if !self.is_authority(caller) {
            return false;
        }
        self.controllers.insert(target);
        true
    }

    /// Revoke the controller role from `target`. Authority-only.
    /// Returns `false` if the caller is not the authority.
    pub fn revoke(&mut self, caller: &AccountId, target: &AccountId) -> bool {
        if !self.is_authority(caller) {
            return false;
        }
        self.controllers.remove(target);
        true
    }

    /// Move the administrative authority to a new identity.
    ///
    /// The controller set is untouched: the new authority does not gain
    /// withdrawal rights by the transfer, and the old one does not lose
    /// whatever membership it held.
    pub fn transfer_authority(&mut self, caller: &AccountId, new_authority: AccountId) -> bool {
        if !self.is_authority(caller) {
            return false;
        }
        self.authority = new_authority;
        true
    }

    /// Get the current authority.
    pub fn authority(&self) -> &AccountId {
        &self.authority
    }
}

/// Vault-wide pause flag.
///
/// When set, deposit entry points must be rejected. Withdrawals stay open
/// so held assets can always be recovered mid-incident.
#[derive(Debug, Clone)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Create a new unpaused guard.
    pub fn new() -> Self {
        Self { paused: false }
    }

    /// Set the flag unconditionally. Redundant identical values permitted.
    pub fn set(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Check if currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for PauseGuard {
    fn default() -> Self {
        Self::new()
    }
}

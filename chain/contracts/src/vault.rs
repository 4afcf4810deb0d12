//! Vault — permissioned custody of four asset classes
//!
//! Holds pooled value (native currency, fungible, non-fungible, and
//! semi-fungible tokens) on behalf of an administering authority and
//! releases it only to controllers. No per-depositor accounting: custody
//! is pooled, and withdrawal authorization depends solely on role
//! membership, never on deposit provenance.
//!
//! Operation discipline:
//! 1. Role / pause / amount preconditions
//! 2. Reentrancy latch around every collaborator interaction
//! 3. Live balance observation at decision time (never cached)
//! 4. Collaborator transfer, failure propagated with no partial state
//! 5. Audit event append

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use types::ids::{AccountId, TokenId};

use crate::assets::{
    FungibleToken, NativeLedger, NativeReceiver, NonFungibleToken, ReceiptAck, SemiFungibleToken,
    TransferFailure, NATIVE_ASSET,
};
use crate::errors::VaultError;
use crate::events::{
    AuthorityTransferred, ControllerGranted, ControllerRevoked, FungibleDeposited,
    FungibleWithdrawn, NativeDeposited, NativeWithdrawn, NonFungibleDeposited,
    NonFungibleWithdrawn, PauseSet, SemiFungibleDeposited, SemiFungibleWithdrawn, VaultEvent,
};
use crate::security::{PauseGuard, ReentrancyGuard, RoleRegistry};

/// Construction-time configuration for a vault.
///
/// Singleton state is injected here rather than read from ambient globals;
/// after construction only authority-originated calls mutate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Identity administering roles and pause state. Starts as the sole
    /// controller.
    pub authority: AccountId,
    /// The vault's own identity in the external asset ledgers, i.e. the
    /// holder whose live balances constitute custodied value.
    pub identity: AccountId,
}

/// Core custody vault.
///
/// Balances are never stored here: every decision queries the injected
/// asset collaborator live. The vault owns only the role registry, the
/// pause flag, the reentrancy latch, and the append-only event log.
#[derive(Debug)]
pub struct Vault {
    identity: AccountId,
    roles: RoleRegistry,
    pause: PauseGuard,
    reentrancy: ReentrancyGuard,
    events: Vec<VaultEvent>,
}

impl Vault {
    /// Create a new vault from its configuration.
    pub fn new(config: VaultConfig) -> Self {
        Self {
            identity: config.identity,
            roles: RoleRegistry::new(config.authority),
            pause: PauseGuard::new(),
            reentrancy: ReentrancyGuard::new(),
            events: Vec::new(),
        }
    }

    // ───────────────────────── Role Registry ─────────────────────────

    /// Grant the controller role to `target`. Authority-only, idempotent.
    pub fn grant_controller(
        &mut self,
        caller: &AccountId,
        target: &AccountId,
    ) -> Result<VaultEvent, VaultError> {
        if !self.roles.grant(caller, *target) {
            return Err(VaultError::Unauthorized);
        }
        info!(%caller, %target, "controller granted");

        let event = VaultEvent::ControllerGranted(ControllerGranted {
            authority: *caller,
            controller: *target,
        });
        self.record(event.clone());
        Ok(event)
    }

    /// Revoke the controller role from `target`. Authority-only; revoking
    /// a non-member is a no-op, not an error.
    pub fn revoke_controller(
        &mut self,
        caller: &AccountId,
        target: &AccountId,
    ) -> Result<VaultEvent, VaultError> {
        if !self.roles.revoke(caller, target) {
            return Err(VaultError::Unauthorized);
        }
        info!(%caller, %target, "controller revoked");

        let event = VaultEvent::ControllerRevoked(ControllerRevoked {
            authority: *caller,
            controller: *target,
        });
        self.record(event.clone());
        Ok(event)
    }

    /// Move the administrative authority to a new identity.
    pub fn transfer_authority(
        &mut self,
        caller: &AccountId,
        new_authority: &AccountId,
    ) -> Result<VaultEvent, VaultError> {
        if !self.roles.transfer_authority(caller, *new_authority) {
            return Err(VaultError::Unauthorized);
        }
        info!(previous = %caller, new = %new_authority, "authority transferred");

        let event = VaultEvent::AuthorityTransferred(AuthorityTransferred {
            previous: *caller,
            new_authority: *new_authority,
        });
        self.record(event.clone());
        Ok(event)
    }

    /// Check if an identity holds the controller role.
    pub fn is_controller(&self, identity: &AccountId) -> bool {
        self.roles.is_controller(identity)
    }

    /// Get the current authority.
    pub fn authority(&self) -> &AccountId {
        self.roles.authority()
    }

    /// The vault's own identity in the external asset ledgers.
    pub fn identity(&self) -> &AccountId {
        &self.identity
    }

    // ───────────────────────── Pause Gate ─────────────────────────

    /// Set the pause flag. Authority-only; unconditional, so redundant
    /// identical values are permitted. Gates deposits only; withdrawals
    /// stay open so held assets remain recoverable mid-incident.
    pub fn set_paused(
        &mut self,
        caller: &AccountId,
        paused: bool,
    ) -> Result<VaultEvent, VaultError> {
        if !self.roles.is_authority(caller) {
            return Err(VaultError::Unauthorized);
        }
        self.pause.set(paused);
        info!(%caller, paused, "pause flag set");

        let event = VaultEvent::PauseSet(PauseSet {
            authority: *caller,
            paused,
        });
        self.record(event.clone());
        Ok(event)
    }

    /// Check if the vault is paused.
    pub fn is_paused(&self) -> bool {
        self.pause.is_paused()
    }

    // ───────────────────────── Deposits ─────────────────────────

    /// Deposit native currency carried with the call. Open to any caller.
    ///
    /// The value-carrying call itself fixes the amount, so zero is
    /// permitted here; a negative value is malformed.
    pub fn deposit_native(
        &mut self,
        ledger: &mut dyn NativeLedger,
        from: &AccountId,
        amount: Decimal,
    ) -> Result<VaultEvent, VaultError> {
        self.check_not_paused()?;
        if amount < Decimal::ZERO {
            return Err(VaultError::ZeroAmount);
        }
        self.enter()?;

        if let Err(failure) = ledger.transfer(from, &self.identity, amount) {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%from, %amount, "native deposit");
        let event = VaultEvent::NativeDeposited(NativeDeposited {
            from: *from,
            amount,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    /// Deposit fungible tokens, pulled from the caller via an authorization
    /// previously granted to the vault. Open to any caller.
    pub fn deposit_fungible(
        &mut self,
        token: &mut dyn FungibleToken,
        from: &AccountId,
        amount: Decimal,
    ) -> Result<VaultEvent, VaultError> {
        self.check_not_paused()?;
        Self::require_positive(amount)?;
        self.enter()?;

        if let Err(failure) = token.transfer_from(&self.identity, from, &self.identity, amount) {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%from, asset = %token.asset_id(), %amount, "fungible deposit");
        let event = VaultEvent::FungibleDeposited(FungibleDeposited {
            from: *from,
            asset: token.asset_id().clone(),
            amount,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    /// Deposit one unique token. Open to any caller; no amount parameter,
    /// always exactly one indivisible unit.
    pub fn deposit_non_fungible(
        &mut self,
        token: &mut dyn NonFungibleToken,
        from: &AccountId,
        token_id: &TokenId,
    ) -> Result<VaultEvent, VaultError> {
        self.check_not_paused()?;
        self.enter()?;

        if let Err(failure) = token.transfer_from(&self.identity, from, &self.identity, token_id) {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%from, asset = %token.asset_id(), %token_id, "non-fungible deposit");
        let event = VaultEvent::NonFungibleDeposited(NonFungibleDeposited {
            from: *from,
            asset: token.asset_id().clone(),
            token_id: *token_id,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    /// Deposit semi-fungible units of one id. Open to any caller.
    pub fn deposit_semi_fungible(
        &mut self,
        token: &mut dyn SemiFungibleToken,
        from: &AccountId,
        token_id: &TokenId,
        amount: Decimal,
    ) -> Result<VaultEvent, VaultError> {
        self.check_not_paused()?;
        Self::require_positive(amount)?;
        self.enter()?;

        if let Err(failure) =
            token.transfer_from(&self.identity, from, &self.identity, token_id, amount)
        {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%from, asset = %token.asset_id(), %token_id, %amount, "semi-fungible deposit");
        let event = VaultEvent::SemiFungibleDeposited(SemiFungibleDeposited {
            from: *from,
            asset: token.asset_id().clone(),
            token_id: *token_id,
            amount,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    // ───────────────────────── Withdrawals ─────────────────────────

    /// Release native currency to `to`. Controller-only.
    ///
    /// The destination's receipt logic runs while the reentrancy latch is
    /// held and before value moves: a rejecting destination fails the call
    /// with no transfer, and a re-entering destination trips the latch.
    pub fn withdraw_native(
        &mut self,
        ledger: &mut dyn NativeLedger,
        receiver: &mut dyn NativeReceiver,
        caller: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<VaultEvent, VaultError> {
        self.require_controller(caller)?;
        Self::require_positive(amount)?;
        self.enter()?;

        let available = ledger.balance_of(&self.identity);
        if available < amount {
            self.reentrancy.exit();
            return Err(VaultError::NotEnoughBalance {
                asset: NATIVE_ASSET.to_string(),
                requested: amount.to_string(),
                available: available.to_string(),
            });
        }

        if !receiver.on_native_received(self, ledger, amount) {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(TransferFailure::Rejected));
        }

        if let Err(failure) = ledger.transfer(&self.identity, to, amount) {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%caller, %to, %amount, "native withdrawal");
        let event = VaultEvent::NativeWithdrawn(NativeWithdrawn {
            by: *caller,
            to: *to,
            amount,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    /// Release fungible tokens to `to`. Controller-only.
    pub fn withdraw_fungible(
        &mut self,
        token: &mut dyn FungibleToken,
        caller: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<VaultEvent, VaultError> {
        self.require_controller(caller)?;
        Self::require_positive(amount)?;
        self.enter()?;

        let available = token.balance_of(&self.identity);
        if available < amount {
            self.reentrancy.exit();
            return Err(VaultError::NotEnoughBalance {
                asset: token.asset_id().to_string(),
                requested: amount.to_string(),
                available: available.to_string(),
            });
        }

        if let Err(failure) = token.transfer(&self.identity, to, amount) {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%caller, %to, asset = %token.asset_id(), %amount, "fungible withdrawal");
        let event = VaultEvent::FungibleWithdrawn(FungibleWithdrawn {
            by: *caller,
            to: *to,
            asset: token.asset_id().clone(),
            amount,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    /// Release one unique token to `to`. Controller-only. Fails
    /// `NotExistToken` when the vault is not the unit's current owner.
    pub fn withdraw_non_fungible(
        &mut self,
        token: &mut dyn NonFungibleToken,
        caller: &AccountId,
        to: &AccountId,
        token_id: &TokenId,
    ) -> Result<VaultEvent, VaultError> {
        self.require_controller(caller)?;
        self.enter()?;

        let held = token
            .owner_of(token_id)
            .is_some_and(|owner| owner == self.identity);
        if !held {
            self.reentrancy.exit();
            return Err(VaultError::NotExistToken {
                asset: token.asset_id().to_string(),
                token_id: *token_id,
            });
        }

        if let Err(failure) = token.transfer_from(&self.identity, &self.identity, to, token_id) {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%caller, %to, asset = %token.asset_id(), %token_id, "non-fungible withdrawal");
        let event = VaultEvent::NonFungibleWithdrawn(NonFungibleWithdrawn {
            by: *caller,
            to: *to,
            asset: token.asset_id().clone(),
            token_id: *token_id,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    /// Release semi-fungible units of one id to `to`. Controller-only.
    pub fn withdraw_semi_fungible(
        &mut self,
        token: &mut dyn SemiFungibleToken,
        caller: &AccountId,
        to: &AccountId,
        token_id: &TokenId,
        amount: Decimal,
    ) -> Result<VaultEvent, VaultError> {
        self.require_controller(caller)?;
        Self::require_positive(amount)?;
        self.enter()?;

        let available = token.balance_of(&self.identity, token_id);
        if available < amount {
            self.reentrancy.exit();
            return Err(VaultError::NotEnoughBalance {
                asset: token.asset_id().to_string(),
                requested: amount.to_string(),
                available: available.to_string(),
            });
        }

        if let Err(failure) =
            token.transfer_from(&self.identity, &self.identity, to, token_id, amount)
        {
            self.reentrancy.exit();
            return Err(VaultError::TransferFailed(failure));
        }

        debug!(%caller, %to, asset = %token.asset_id(), %token_id, %amount, "semi-fungible withdrawal");
        let event = VaultEvent::SemiFungibleWithdrawn(SemiFungibleWithdrawn {
            by: *caller,
            to: *to,
            asset: token.asset_id().clone(),
            token_id: *token_id,
            amount,
        });
        self.record(event.clone());
        self.reentrancy.exit();
        Ok(event)
    }

    // ───────────────────────── Receipt Acknowledgments ─────────────────────────

    /// Acknowledge an inbound unique-token transfer. Pure: validates
    /// nothing, unconditionally accepts.
    pub fn on_non_fungible_received(
        &self,
        _operator: &AccountId,
        _from: &AccountId,
        _token_id: &TokenId,
    ) -> ReceiptAck {
        ReceiptAck::Accepted
    }

    /// Acknowledge an inbound semi-fungible transfer. Pure, unconditional.
    pub fn on_semi_fungible_received(
        &self,
        _operator: &AccountId,
        _from: &AccountId,
        _token_id: &TokenId,
        _amount: Decimal,
    ) -> ReceiptAck {
        ReceiptAck::Accepted
    }

    /// Acknowledge an inbound semi-fungible batch transfer. Pure,
    /// unconditional.
    pub fn on_semi_fungible_batch_received(
        &self,
        _operator: &AccountId,
        _from: &AccountId,
        _token_ids: &[TokenId],
        _amounts: &[Decimal],
    ) -> ReceiptAck {
        ReceiptAck::Accepted
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[VaultEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<VaultEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal Guards ─────────────────────────

    fn check_not_paused(&self) -> Result<(), VaultError> {
        if self.pause.is_paused() {
            return Err(VaultError::VaultPaused);
        }
        Ok(())
    }

    fn require_controller(&self, caller: &AccountId) -> Result<(), VaultError> {
        if !self.roles.is_controller(caller) {
            return Err(VaultError::Unauthorized);
        }
        Ok(())
    }

    fn require_positive(amount: Decimal) -> Result<(), VaultError> {
        if amount <= Decimal::ZERO {
            return Err(VaultError::ZeroAmount);
        }
        Ok(())
    }

    fn enter(&mut self) -> Result<(), VaultError> {
        if !self.reentrancy.enter() {
            warn!("reentrant call rejected");
            return Err(VaultError::Reentrant);
        }
        Ok(())
    }

    fn record(&mut self, event: VaultEvent) {
        self.events.push(event);
    }
}

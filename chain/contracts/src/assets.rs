//! Asset collaborator interfaces
//!
//! The vault keeps no balance state of its own. Each asset class is an
//! external collaborator, injected per call, and held balance is whatever
//! the collaborator reports for the vault's identity at decision time.
//! Collaborator transfer primitives must themselves fail on insufficiency
//! or missing authorization, so every movement is checked twice.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::ids::{AccountId, AssetId, TokenId};

use crate::vault::Vault;

/// Asset label used for the native currency in error reporting, which has
/// no collaborator-supplied reference of its own.
pub const NATIVE_ASSET: &str = "native";

/// Failure reported by a collaborator's transfer primitive.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferFailure {
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: String,
        available: String,
    },

    #[error("transfer not authorized for operator")]
    NotAuthorized,

    #[error("unit {token_id} not held by the source account")]
    UnitNotHeld { token_id: TokenId },

    #[error("recipient rejected the transfer")]
    Rejected,

    #[error("arithmetic overflow in balance update")]
    Overflow,
}

/// Outcome reported by an inbound-transfer acknowledgment hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReceiptAck {
    Accepted,
    Rejected,
}

/// Native currency ledger.
pub trait NativeLedger {
    /// Live balance held by `holder`.
    fn balance_of(&self, holder: &AccountId) -> Decimal;

    /// Move `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;
}

/// Receipt logic run by a native-transfer destination while the transfer is
/// in flight. The vault and ledger handles let destination code call back
/// into the vault mid-transfer, the hazard the reentrancy latch exists for.
pub trait NativeReceiver {
    /// Returns `false` to reject the transfer.
    fn on_native_received(
        &mut self,
        vault: &mut Vault,
        ledger: &mut dyn NativeLedger,
        amount: Decimal,
    ) -> bool;
}

/// Destination with no receipt logic of its own; accepts any transfer.
pub struct PlainReceiver;

impl NativeReceiver for PlainReceiver {
    fn on_native_received(
        &mut self,
        _vault: &mut Vault,
        _ledger: &mut dyn NativeLedger,
        _amount: Decimal,
    ) -> bool {
        true
    }
}

/// Fungible token contract: interchangeable units in continuous quantity.
pub trait FungibleToken {
    /// Reference identifying this token contract.
    fn asset_id(&self) -> &AssetId;

    /// Live balance held by `holder`.
    fn balance_of(&self, holder: &AccountId) -> Decimal;

    /// Pull `amount` from `from` to `to` using an authorization previously
    /// granted by `from` to `operator`.
    fn transfer_from(
        &mut self,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;

    /// Owner-initiated transfer of `amount` from `from` to `to`.
    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;
}

/// Non-fungible token contract: unique, indivisible units.
pub trait NonFungibleToken {
    /// Reference identifying this collection.
    fn asset_id(&self) -> &AssetId;

    /// Current owner of a unit, if it exists.
    fn owner_of(&self, token_id: &TokenId) -> Option<AccountId>;

    /// Move one unit from `from` to `to`. `operator` must be the owner or
    /// hold an authorization for the unit.
    fn transfer_from(
        &mut self,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        token_id: &TokenId,
    ) -> Result<(), TransferFailure>;
}

/// Semi-fungible token contract: interchangeable units per id.
pub trait SemiFungibleToken {
    /// Reference identifying this collection.
    fn asset_id(&self) -> &AssetId;

    /// Live balance of `token_id` units held by `holder`.
    fn balance_of(&self, holder: &AccountId, token_id: &TokenId) -> Decimal;

    /// Move `amount` units of `token_id` from `from` to `to`. `operator`
    /// must be the owner or an approved operator for `from`.
    fn transfer_from(
        &mut self,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        token_id: &TokenId,
        amount: Decimal,
    ) -> Result<(), TransferFailure>;
}

//! Contract events — the vault's audit trail
//!
//! Events are immutable records emitted by every successful state-mutating
//! operation. They carry the acting caller, the counterpart identity where
//! relevant, the asset reference, the unit identifier where the class has
//! one, and the amount. No other persisted history is kept.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::ids::{AccountId, AssetId, TokenId};

/// Native currency placed into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeDeposited {
    pub from: AccountId,
    pub amount: Decimal,
}

/// Native currency released to a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeWithdrawn {
    pub by: AccountId,
    pub to: AccountId,
    pub amount: Decimal,
}

/// Fungible tokens pulled into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleDeposited {
    pub from: AccountId,
    pub asset: AssetId,
    pub amount: Decimal,
}

/// Fungible tokens released to a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FungibleWithdrawn {
    pub by: AccountId,
    pub to: AccountId,
    pub asset: AssetId,
    pub amount: Decimal,
}

/// A unique token placed into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonFungibleDeposited {
    pub from: AccountId,
    pub asset: AssetId,
    pub token_id: TokenId,
}

/// A unique token released to a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonFungibleWithdrawn {
    pub by: AccountId,
    pub to: AccountId,
    pub asset: AssetId,
    pub token_id: TokenId,
}

/// Semi-fungible units placed into custody
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemiFungibleDeposited {
    pub from: AccountId,
    pub asset: AssetId,
    pub token_id: TokenId,
    pub amount: Decimal,
}

/// Semi-fungible units released to a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemiFungibleWithdrawn {
    pub by: AccountId,
    pub to: AccountId,
    pub asset: AssetId,
    pub token_id: TokenId,
    pub amount: Decimal,
}

/// Controller role granted to an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerGranted {
    pub authority: AccountId,
    pub controller: AccountId,
}

/// Controller role revoked from an identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerRevoked {
    pub authority: AccountId,
    pub controller: AccountId,
}

/// Pause flag set by the authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauseSet {
    pub authority: AccountId,
    pub paused: bool,
}

/// Administrative authority moved to a new identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityTransferred {
    pub previous: AccountId,
    pub new_authority: AccountId,
}

/// Enum wrapper for all vault events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VaultEvent {
    NativeDeposited(NativeDeposited),
    NativeWithdrawn(NativeWithdrawn),
    FungibleDeposited(FungibleDeposited),
    FungibleWithdrawn(FungibleWithdrawn),
    NonFungibleDeposited(NonFungibleDeposited),
    NonFungibleWithdrawn(NonFungibleWithdrawn),
    SemiFungibleDeposited(SemiFungibleDeposited),
    SemiFungibleWithdrawn(SemiFungibleWithdrawn),
    ControllerGranted(ControllerGranted),
    ControllerRevoked(ControllerRevoked),
    PauseSet(PauseSet),
    AuthorityTransferred(AuthorityTransferred),
}

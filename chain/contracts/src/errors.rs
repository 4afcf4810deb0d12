//! Contract-specific error types
//!
//! Every rejected precondition surfaces a distinct, named condition so
//! calling infrastructure and audit tooling can distinguish cause. Errors
//! are terminal for the call: no retries, no partial commits.

use thiserror::Error;
use types::ids::TokenId;

use crate::assets::TransferFailure;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VaultError {
    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Vault is paused")]
    VaultPaused,

    #[error("Amount must be positive")]
    ZeroAmount,

    #[error("Not enough balance for {asset}: requested {requested}, available {available}")]
    NotEnoughBalance {
        asset: String,
        requested: String,
        available: String,
    },

    #[error("Vault does not hold token {token_id} of {asset}")]
    NotExistToken { asset: String, token_id: TokenId },

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferFailure),

    #[error("Reentrant call rejected")]
    Reentrant,
}

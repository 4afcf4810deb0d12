//! In-memory reference collaborators
//!
//! Minimal implementations of the asset collaborator traits, backed by
//! plain maps with checked arithmetic. Used by this crate's own tests and
//! available to embedding services for integration testing. Each enforces
//! the same discipline expected of a production collaborator: transfers
//! fail on insufficient balance or missing authorization, never partially
//! apply, and never wrap silently.

use rust_decimal::Decimal;
use std::collections::HashMap;
use types::ids::{AccountId, AssetId, TokenId};

use crate::assets::{
    FungibleToken, NativeLedger, NonFungibleToken, SemiFungibleToken, TransferFailure,
};

/// Native currency ledger backed by a balance map.
#[derive(Debug, Default)]
pub struct InMemoryNative {
    balances: HashMap<AccountId, Decimal>,
}

impl InMemoryNative {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air. Test funding only.
    pub fn mint(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }
}

impl NativeLedger for InMemoryNative {
    fn balance_of(&self, holder: &AccountId) -> Decimal {
        self.balances.get(holder).copied().unwrap_or(Decimal::ZERO)
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        move_between(&mut self.balances, from, to, amount)
    }
}

/// Fungible token contract backed by balance and allowance maps.
#[derive(Debug)]
pub struct InMemoryFungible {
    asset: AssetId,
    balances: HashMap<AccountId, Decimal>,
    /// (owner, spender) -> remaining authorized amount
    allowances: HashMap<(AccountId, AccountId), Decimal>,
}

impl InMemoryFungible {
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    /// Credit an account out of thin air. Test funding only.
    pub fn mint(&mut self, account: AccountId, amount: Decimal) {
        *self.balances.entry(account).or_insert(Decimal::ZERO) += amount;
    }

    /// Authorize `spender` to pull up to `amount` from `owner`.
    pub fn approve(&mut self, owner: AccountId, spender: AccountId, amount: Decimal) {
        self.allowances.insert((owner, spender), amount);
    }

    /// Remaining authorization from `owner` to `spender`.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Decimal {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }
}

impl FungibleToken for InMemoryFungible {
    fn asset_id(&self) -> &AssetId {
        &self.asset
    }

    fn balance_of(&self, holder: &AccountId) -> Decimal {
        self.balances.get(holder).copied().unwrap_or(Decimal::ZERO)
    }

    fn transfer_from(
        &mut self,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        let key = (*from, *operator);
        let allowed = self.allowances.get(&key).copied().unwrap_or(Decimal::ZERO);
        if allowed < amount {
            return Err(TransferFailure::NotAuthorized);
        }
        move_between(&mut self.balances, from, to, amount)?;
        self.allowances.insert(key, allowed - amount);
        Ok(())
    }

    fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        move_between(&mut self.balances, from, to, amount)
    }
}

/// Non-fungible token collection backed by owner and approval maps.
#[derive(Debug)]
pub struct InMemoryNonFungible {
    asset: AssetId,
    owners: HashMap<TokenId, AccountId>,
    /// Per-unit authorization, consumed on transfer
    approvals: HashMap<TokenId, AccountId>,
}

impl InMemoryNonFungible {
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            owners: HashMap::new(),
            approvals: HashMap::new(),
        }
    }

    /// Bring a unit into existence under `owner`. Test funding only.
    pub fn mint(&mut self, owner: AccountId, token_id: TokenId) {
        self.owners.insert(token_id, owner);
    }

    /// Authorize `operator` to move one unit. Caller must be the owner.
    pub fn approve(
        &mut self,
        caller: &AccountId,
        token_id: &TokenId,
        operator: AccountId,
    ) -> Result<(), TransferFailure> {
        if self.owners.get(token_id) != Some(caller) {
            return Err(TransferFailure::NotAuthorized);
        }
        self.approvals.insert(*token_id, operator);
        Ok(())
    }
}

impl NonFungibleToken for InMemoryNonFungible {
    fn asset_id(&self) -> &AssetId {
        &self.asset
    }

    fn owner_of(&self, token_id: &TokenId) -> Option<AccountId> {
        self.owners.get(token_id).copied()
    }

    fn transfer_from(
        &mut self,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        token_id: &TokenId,
    ) -> Result<(), TransferFailure> {
        if self.owners.get(token_id) != Some(from) {
            return Err(TransferFailure::UnitNotHeld {
                token_id: *token_id,
            });
        }
        if operator != from && self.approvals.get(token_id) != Some(operator) {
            return Err(TransferFailure::NotAuthorized);
        }
        self.owners.insert(*token_id, *to);
        self.approvals.remove(token_id);
        Ok(())
    }
}

/// Semi-fungible token collection: per-id balances with operator approvals.
#[derive(Debug)]
pub struct InMemorySemiFungible {
    asset: AssetId,
    balances: HashMap<(AccountId, TokenId), Decimal>,
    /// (owner, operator) -> approved for all ids
    operators: HashMap<(AccountId, AccountId), bool>,
}

impl InMemorySemiFungible {
    pub fn new(asset: AssetId) -> Self {
        Self {
            asset,
            balances: HashMap::new(),
            operators: HashMap::new(),
        }
    }

    /// Credit units of one id out of thin air. Test funding only.
    pub fn mint(&mut self, owner: AccountId, token_id: TokenId, amount: Decimal) {
        *self
            .balances
            .entry((owner, token_id))
            .or_insert(Decimal::ZERO) += amount;
    }

    /// Authorize (or deauthorize) `operator` for all of `owner`'s ids.
    pub fn set_approval(&mut self, owner: AccountId, operator: AccountId, approved: bool) {
        self.operators.insert((owner, operator), approved);
    }
}

impl SemiFungibleToken for InMemorySemiFungible {
    fn asset_id(&self) -> &AssetId {
        &self.asset
    }

    fn balance_of(&self, holder: &AccountId, token_id: &TokenId) -> Decimal {
        self.balances
            .get(&(*holder, *token_id))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    fn transfer_from(
        &mut self,
        operator: &AccountId,
        from: &AccountId,
        to: &AccountId,
        token_id: &TokenId,
        amount: Decimal,
    ) -> Result<(), TransferFailure> {
        if operator != from
            && !self
                .operators
                .get(&(*from, *operator))
                .copied()
                .unwrap_or(false)
        {
            return Err(TransferFailure::NotAuthorized);
        }

        let available = self.balance_of(from, token_id);
        if available < amount {
            return Err(TransferFailure::InsufficientFunds {
                requested: amount.to_string(),
                available: available.to_string(),
            });
        }
        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to, token_id)
            .checked_add(amount)
            .ok_or(TransferFailure::Overflow)?;
        self.balances.insert((*from, *token_id), available - amount);
        self.balances.insert((*to, *token_id), credited);
        Ok(())
    }
}

/// Move `amount` within a balance map, checking sufficiency and overflow.
/// Self-transfer is a no-op once the balance check passes.
fn move_between(
    balances: &mut HashMap<AccountId, Decimal>,
    from: &AccountId,
    to: &AccountId,
    amount: Decimal,
) -> Result<(), TransferFailure> {
    let from_balance = balances.get(from).copied().unwrap_or(Decimal::ZERO);
    if from_balance < amount {
        return Err(TransferFailure::InsufficientFunds {
            requested: amount.to_string(),
            available: from_balance.to_string(),
        });
    }
    if from == to {
        return Ok(());
    }

    let credited = balances
        .get(to)
        .copied()
        .unwrap_or(Decimal::ZERO)
        .checked_add(amount)
        .ok_or(TransferFailure::Overflow)?;
    balances.insert(*from, from_balance - amount);
    balances.insert(*to, credited);
    Ok(())
}

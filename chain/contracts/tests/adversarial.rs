//! Adversarial custody tests
//!
//! Exercises the vault the way a hostile caller would:
//! - Reentrancy through a malicious native-transfer destination
//! - Privilege escalation on every restricted entry point
//! - Role grant/revoke idempotence
//! - Pause coverage (deposits gated, withdrawals open)
//! - Draining beyond held balance
//! - Fuzz testing (proptest)

use contracts::assets::{
    FungibleToken, NativeLedger, NativeReceiver, NonFungibleToken, PlainReceiver,
    SemiFungibleToken, TransferFailure,
};
use contracts::errors::VaultError;
use contracts::events::VaultEvent;
use contracts::testing::{
    InMemoryFungible, InMemoryNative, InMemoryNonFungible, InMemorySemiFungible,
};
use contracts::vault::{Vault, VaultConfig};
use contracts::VAULT_ABI_VERSION;
use rust_decimal::Decimal;
use types::ids::{AccountId, AssetId, TokenId};

// ═══════════════════════════════════════════════════════════════════
// Reentrancy
// ═══════════════════════════════════════════════════════════════════

/// Destination that re-invokes native withdrawal from inside its own
/// receipt callback, trying to drain before the outer call completes.
struct ReenteringReceiver {
    controller: AccountId,
    inner_errors: Vec<VaultError>,
}

impl NativeReceiver for ReenteringReceiver {
    fn on_native_received(
        &mut self,
        vault: &mut Vault,
        ledger: &mut dyn NativeLedger,
        amount: Decimal,
    ) -> bool {
        let drain_to = self.controller;
        match vault.withdraw_native(ledger, &mut PlainReceiver, &self.controller, &drain_to, amount)
        {
            Ok(_) => {}
            Err(err) => self.inner_errors.push(err),
        }
        true
    }
}

/// Destination whose receipt logic refuses the transfer.
struct RejectingReceiver;

impl NativeReceiver for RejectingReceiver {
    fn on_native_received(
        &mut self,
        _vault: &mut Vault,
        _ledger: &mut dyn NativeLedger,
        _amount: Decimal,
    ) -> bool {
        false
    }
}

#[test]
fn test_reentrant_native_withdrawal_blocked() {
    let (mut vault, authority) = setup();
    let mut native = InMemoryNative::new();
    native.mint(*vault.identity(), Decimal::from(100));

    let dest = AccountId::new();
    let mut attacker = ReenteringReceiver {
        controller: authority,
        inner_errors: Vec::new(),
    };

    vault
        .withdraw_native(&mut native, &mut attacker, &authority, &dest, Decimal::from(60))
        .unwrap();

    // The nested call tripped the latch; only the outer withdrawal moved value
    assert_eq!(attacker.inner_errors, vec![VaultError::Reentrant]);
    assert_eq!(native.balance_of(vault.identity()), Decimal::from(40));
    assert_eq!(native.balance_of(&dest), Decimal::from(60));
}

#[test]
fn test_reentrant_deposit_during_withdrawal_blocked() {
    struct DepositingReceiver {
        depositor: AccountId,
        inner_errors: Vec<VaultError>,
    }

    impl NativeReceiver for DepositingReceiver {
        fn on_native_received(
            &mut self,
            vault: &mut Vault,
            ledger: &mut dyn NativeLedger,
            amount: Decimal,
        ) -> bool {
            if let Err(err) = vault.deposit_native(ledger, &self.depositor, amount) {
                self.inner_errors.push(err);
            }
            true
        }
    }

    let (mut vault, authority) = setup();
    let mut native = InMemoryNative::new();
    native.mint(*vault.identity(), Decimal::from(10));
    let depositor = AccountId::new();
    native.mint(depositor, Decimal::from(10));

    let mut receiver = DepositingReceiver {
        depositor,
        inner_errors: Vec::new(),
    };
    vault
        .withdraw_native(&mut native, &mut receiver, &authority, &depositor, Decimal::from(3))
        .unwrap();

    assert_eq!(receiver.inner_errors, vec![VaultError::Reentrant]);
}

#[test]
fn test_rejecting_destination_fails_without_moving_value() {
    let (mut vault, authority) = setup();
    let mut native = InMemoryNative::new();
    native.mint(*vault.identity(), Decimal::from(50));

    let dest = AccountId::new();
    let result = vault.withdraw_native(
        &mut native,
        &mut RejectingReceiver,
        &authority,
        &dest,
        Decimal::from(10),
    );

    assert_eq!(
        result,
        Err(VaultError::TransferFailed(TransferFailure::Rejected))
    );
    assert_eq!(native.balance_of(vault.identity()), Decimal::from(50));
    assert_eq!(native.balance_of(&dest), Decimal::ZERO);
    assert!(vault.events().is_empty());
}

#[test]
fn test_latch_released_after_failed_withdrawal() {
    let (mut vault, authority) = setup();
    let mut native = InMemoryNative::new();
    native.mint(*vault.identity(), Decimal::from(5));

    let dest = AccountId::new();

    // Over-balance attempt fails mid-operation, with the latch held
    let result = vault.withdraw_native(
        &mut native,
        &mut PlainReceiver,
        &authority,
        &dest,
        Decimal::from(9),
    );
    assert!(matches!(result, Err(VaultError::NotEnoughBalance { .. })));

    // Latch was released; the next valid call goes through
    vault
        .withdraw_native(&mut native, &mut PlainReceiver, &authority, &dest, Decimal::from(5))
        .unwrap();
    assert_eq!(native.balance_of(&dest), Decimal::from(5));
}

#[test]
fn test_latch_released_after_failed_deposit() {
    let (mut vault, _) = setup();
    let depositor = AccountId::new();
    let mut token = InMemoryFungible::new(AssetId::new("GOLD"));
    token.mint(depositor, Decimal::from(3));

    // No authorization granted, so the pull fails inside the latch
    let result = vault.deposit_fungible(&mut token, &depositor, Decimal::from(3));
    assert!(matches!(result, Err(VaultError::TransferFailed(_))));

    token.approve(depositor, *vault.identity(), Decimal::from(3));
    vault
        .deposit_fungible(&mut token, &depositor, Decimal::from(3))
        .unwrap();
    assert_eq!(token.balance_of(vault.identity()), Decimal::from(3));
}

// ═══════════════════════════════════════════════════════════════════
// Privilege escalation
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_non_controller_cannot_withdraw_any_class() {
    let (mut vault, _) = setup();
    let outsider = AccountId::new();
    let id = TokenId::new(1);

    let mut native = InMemoryNative::new();
    native.mint(*vault.identity(), Decimal::from(10));
    let mut fungible = InMemoryFungible::new(AssetId::new("GOLD"));
    fungible.mint(*vault.identity(), Decimal::from(10));
    let mut nft = InMemoryNonFungible::new(AssetId::new("RELIC"));
    nft.mint(*vault.identity(), id);
    let mut semi = InMemorySemiFungible::new(AssetId::new("SHARDS"));
    semi.mint(*vault.identity(), id, Decimal::from(10));

    assert_eq!(
        vault.withdraw_native(&mut native, &mut PlainReceiver, &outsider, &outsider, Decimal::ONE),
        Err(VaultError::Unauthorized)
    );
    assert_eq!(
        vault.withdraw_fungible(&mut fungible, &outsider, &outsider, Decimal::ONE),
        Err(VaultError::Unauthorized)
    );
    assert_eq!(
        vault.withdraw_non_fungible(&mut nft, &outsider, &outsider, &id),
        Err(VaultError::Unauthorized)
    );
    assert_eq!(
        vault.withdraw_semi_fungible(&mut semi, &outsider, &outsider, &id, Decimal::ONE),
        Err(VaultError::Unauthorized)
    );

    // Nothing moved
    assert_eq!(native.balance_of(vault.identity()), Decimal::from(10));
    assert_eq!(fungible.balance_of(vault.identity()), Decimal::from(10));
    assert_eq!(nft.owner_of(&id), Some(*vault.identity()));
    assert_eq!(semi.balance_of(vault.identity(), &id), Decimal::from(10));
}

#[test]
fn test_revoked_controller_loses_access() {
    let (mut vault, authority) = setup();
    let controller = AccountId::new();
    vault.grant_controller(&authority, &controller).unwrap();

    let mut native = InMemoryNative::new();
    native.mint(*vault.identity(), Decimal::from(10));
    vault
        .withdraw_native(&mut native, &mut PlainReceiver, &controller, &controller, Decimal::ONE)
        .unwrap();

    vault.revoke_controller(&authority, &controller).unwrap();
    let result = vault.withdraw_native(
        &mut native,
        &mut PlainReceiver,
        &controller,
        &controller,
        Decimal::ONE,
    );
    assert_eq!(result, Err(VaultError::Unauthorized));
}

#[test]
fn test_non_authority_cannot_administer() {
    let (mut vault, authority) = setup();
    let intruder = AccountId::new();

    assert_eq!(
        vault.grant_controller(&intruder, &intruder),
        Err(VaultError::Unauthorized)
    );
    assert_eq!(
        vault.revoke_controller(&intruder, &authority),
        Err(VaultError::Unauthorized)
    );
    assert_eq!(vault.set_paused(&intruder, true), Err(VaultError::Unauthorized));
    assert_eq!(
        vault.transfer_authority(&intruder, &intruder),
        Err(VaultError::Unauthorized)
    );

    assert!(vault.is_controller(&authority));
    assert!(!vault.is_paused());
    assert_eq!(vault.authority(), &authority);
}

#[test]
fn test_controller_role_does_not_grant_administration() {
    let (mut vault, authority) = setup();
    let controller = AccountId::new();
    vault.grant_controller(&authority, &controller).unwrap();

    let crony = AccountId::new();
    assert_eq!(
        vault.grant_controller(&controller, &crony),
        Err(VaultError::Unauthorized)
    );
    assert_eq!(vault.set_paused(&controller, true), Err(VaultError::Unauthorized));
}

// ═══════════════════════════════════════════════════════════════════
// Role idempotence
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_double_grant_equals_single_grant() {
    let (mut vault, authority) = setup();
    let target = AccountId::new();

    vault.grant_controller(&authority, &target).unwrap();
    vault.grant_controller(&authority, &target).unwrap();
    assert!(vault.is_controller(&target));

    // One revocation fully removes the role
    vault.revoke_controller(&authority, &target).unwrap();
    assert!(!vault.is_controller(&target));
}

#[test]
fn test_revoke_non_member_is_noop() {
    let (mut vault, authority) = setup();
    let stranger = AccountId::new();

    vault.revoke_controller(&authority, &stranger).unwrap();
    assert!(!vault.is_controller(&stranger));
    assert!(vault.is_controller(&authority));
}

// ═══════════════════════════════════════════════════════════════════
// Pause coverage
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_pause_gates_deposits_only() {
    let (mut vault, authority) = setup();
    let depositor = AccountId::new();
    let mut native = InMemoryNative::new();
    native.mint(depositor, Decimal::from(10));
    native.mint(*vault.identity(), Decimal::from(10));

    vault.set_paused(&authority, true).unwrap();

    assert_eq!(
        vault.deposit_native(&mut native, &depositor, Decimal::ONE),
        Err(VaultError::VaultPaused)
    );

    // Recovery path stays open mid-incident
    vault
        .withdraw_native(&mut native, &mut PlainReceiver, &authority, &depositor, Decimal::from(10))
        .unwrap();
    assert_eq!(native.balance_of(vault.identity()), Decimal::ZERO);
}

#[test]
fn test_redundant_pause_values_permitted() {
    let (mut vault, authority) = setup();

    vault.set_paused(&authority, true).unwrap();
    vault.set_paused(&authority, true).unwrap();
    assert!(vault.is_paused());

    vault.set_paused(&authority, false).unwrap();
    vault.set_paused(&authority, false).unwrap();
    assert!(!vault.is_paused());
}

// ═══════════════════════════════════════════════════════════════════
// Concrete custody scenarios
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_native_custody_scenario() {
    // X is authority and sole initial controller
    let x = AccountId::new();
    let mut vault = Vault::new(VaultConfig {
        authority: x,
        identity: AccountId::new(),
    });
    let y = AccountId::new();
    let mut native = InMemoryNative::new();
    native.mint(x, Decimal::from(100));

    vault.deposit_native(&mut native, &x, Decimal::from(100)).unwrap();
    assert_eq!(native.balance_of(vault.identity()), Decimal::from(100));

    let event = vault
        .withdraw_native(&mut native, &mut PlainReceiver, &x, &y, Decimal::from(60))
        .unwrap();
    assert_eq!(native.balance_of(vault.identity()), Decimal::from(40));
    match event {
        VaultEvent::NativeWithdrawn(record) => {
            assert_eq!(record.by, x);
            assert_eq!(record.to, y);
            assert_eq!(record.amount, Decimal::from(60));
        }
        other => panic!("unexpected event {:?}", other),
    }

    let result = vault.withdraw_native(&mut native, &mut PlainReceiver, &x, &y, Decimal::from(50));
    assert!(matches!(result, Err(VaultError::NotEnoughBalance { .. })));
    assert_eq!(native.balance_of(vault.identity()), Decimal::from(40));
}

#[test]
fn test_fungible_custody_scenario() {
    // X grants the controller role to Z; Z drains the pooled balance
    let (mut vault, x) = setup();
    let z = AccountId::new();
    let w = AccountId::new();
    vault.grant_controller(&x, &z).unwrap();

    let mut token = InMemoryFungible::new(AssetId::new("T"));
    token.mint(*vault.identity(), Decimal::from(10));

    vault
        .withdraw_fungible(&mut token, &z, &w, Decimal::from(10))
        .unwrap();
    assert_eq!(token.balance_of(vault.identity()), Decimal::ZERO);
    assert_eq!(token.balance_of(&w), Decimal::from(10));

    let result = vault.withdraw_fungible(&mut token, &z, &w, Decimal::ONE);
    assert!(matches!(result, Err(VaultError::NotEnoughBalance { .. })));
}

#[test]
fn test_non_fungible_custody_scenario() {
    let (mut vault, authority) = setup();
    let a = AccountId::new();
    let b = AccountId::new();
    let id = TokenId::new(5);

    let mut collection = InMemoryNonFungible::new(AssetId::new("C"));
    collection.mint(a, id);
    collection.approve(&a, &id, *vault.identity()).unwrap();

    vault.deposit_non_fungible(&mut collection, &a, &id).unwrap();
    assert_eq!(collection.owner_of(&id), Some(*vault.identity()));

    vault
        .withdraw_non_fungible(&mut collection, &authority, &b, &id)
        .unwrap();
    assert_eq!(collection.owner_of(&id), Some(b));

    let result = vault.withdraw_non_fungible(&mut collection, &authority, &b, &id);
    assert!(matches!(result, Err(VaultError::NotExistToken { .. })));
}

#[test]
fn test_audit_trail_records_full_history() {
    let (mut vault, authority) = setup();
    let controller = AccountId::new();
    let mut native = InMemoryNative::new();
    native.mint(authority, Decimal::from(5));

    vault.grant_controller(&authority, &controller).unwrap();
    vault.deposit_native(&mut native, &authority, Decimal::from(5)).unwrap();
    vault
        .withdraw_native(&mut native, &mut PlainReceiver, &controller, &authority, Decimal::from(2))
        .unwrap();

    let events = vault.drain_events();
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], VaultEvent::ControllerGranted(_)));
    assert!(matches!(events[1], VaultEvent::NativeDeposited(_)));
    assert!(matches!(events[2], VaultEvent::NativeWithdrawn(_)));
}

// ═══════════════════════════════════════════════════════════════════
// Upgrade path (ABI freeze)
// ═══════════════════════════════════════════════════════════════════

#[test]
fn test_vault_abi_version_frozen() {
    assert_eq!(VAULT_ABI_VERSION, "1.0.0");
}

// ═══════════════════════════════════════════════════════════════════
// Fuzz tests (proptest)
// ═══════════════════════════════════════════════════════════════════

mod fuzz {
    use super::*;
    use proptest::prelude::*;

    /// Strategy for positive amounts in a reasonable range
    fn amount() -> impl Strategy<Value = Decimal> {
        (1u64..=1_000_000_000u64).prop_map(Decimal::from)
    }

    proptest! {
        /// Invariant: after N deposits, the vault's live balance equals
        /// the sum deposited; custody is conserved.
        #[test]
        fn fuzz_deposit_conservation(amounts in prop::collection::vec(amount(), 1..20)) {
            let (mut vault, _) = setup();
            let depositor = AccountId::new();
            let mut native = InMemoryNative::new();
            let mut expected_total = Decimal::ZERO;

            for amount in &amounts {
                native.mint(depositor, *amount);
                vault.deposit_native(&mut native, &depositor, *amount).unwrap();
                expected_total += *amount;
            }

            prop_assert_eq!(native.balance_of(vault.identity()), expected_total);
        }

        /// Invariant: deposit then withdrawal of the same amount leaves
        /// the vault empty and the destination fully credited.
        #[test]
        fn fuzz_deposit_withdraw_round_trip(amount in amount()) {
            let (mut vault, authority) = setup();
            let dest = AccountId::new();
            let mut native = InMemoryNative::new();
            native.mint(authority, amount);

            vault.deposit_native(&mut native, &authority, amount).unwrap();
            vault
                .withdraw_native(&mut native, &mut PlainReceiver, &authority, &dest, amount)
                .unwrap();

            prop_assert_eq!(native.balance_of(vault.identity()), Decimal::ZERO);
            prop_assert_eq!(native.balance_of(&dest), amount);
        }

        /// Invariant: withdrawing more than held always fails and moves
        /// nothing.
        #[test]
        fn fuzz_cannot_drain_beyond_balance(
            held in amount(),
            extra in 1u64..1_000u64,
        ) {
            let (mut vault, authority) = setup();
            let dest = AccountId::new();
            let mut native = InMemoryNative::new();
            native.mint(*vault.identity(), held);

            let overdraw = held + Decimal::from(extra);
            let result = vault.withdraw_native(
                &mut native, &mut PlainReceiver, &authority, &dest, overdraw,
            );

            prop_assert!(
                matches!(result, Err(VaultError::NotEnoughBalance { .. })),
                "expected NotEnoughBalance error"
            );
            prop_assert_eq!(native.balance_of(vault.identity()), held);
            prop_assert_eq!(native.balance_of(&dest), Decimal::ZERO);
        }

        /// Invariant: any number of repeated grants equals one grant, and
        /// a single revoke fully removes the role.
        #[test]
        fn fuzz_grant_idempotence(repeats in 1usize..10) {
            let (mut vault, authority) = setup();
            let target = AccountId::new();

            for _ in 0..repeats {
                vault.grant_controller(&authority, &target).unwrap();
            }
            prop_assert!(vault.is_controller(&target));

            vault.revoke_controller(&authority, &target).unwrap();
            prop_assert!(!vault.is_controller(&target));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn setup() -> (Vault, AccountId) {
    let authority = AccountId::new();
    let vault = Vault::new(VaultConfig {
        authority,
        identity: AccountId::new(),
    });
    (vault, authority)
}

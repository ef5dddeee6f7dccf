//! Offset ledger.
//!
//! Sole owner of the `TokenOffset` and `SupplyOffset` entries. The plain
//! getters/setters do no validation; every other module goes through the
//! checked mutations below.

use crate::error::Error;
use crate::invariants::{loss_reduction_valid, transfer_offset_delta};
use crate::storage::{extend_persistent_ttl, DataKey};
use soroban_sdk::{Address, Env};

// === Raw accessors ===

pub fn get_token_offset(env: &Env, token: &Address) -> i128 {
    let key = DataKey::TokenOffset(token.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_token_offset(env: &Env, token: &Address, offset: i128) {
    let key = DataKey::TokenOffset(token.clone());
    if offset == 0 {
        // Fully reconciled
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &offset);
        extend_persistent_ttl(env, &key);
    }
}

pub fn get_supply_offset(env: &Env) -> i128 {
    env.storage()
        .instance()
        .get(&DataKey::SupplyOffset)
        .unwrap_or(0)
}

#[cfg(any(test, feature = "testutils"))]
pub fn set_supply_offset(env: &Env, offset: i128) {
    if offset == 0 {
        env.storage().instance().remove(&DataKey::SupplyOffset);
    } else {
        env.storage().instance().set(&DataKey::SupplyOffset, &offset);
    }
    crate::storage::extend_instance_ttl(env);
}

// === Checked mutations ===

/// Source side of a Transfer: `amount` left the wallet but still counts
pub fn credit_outbound(env: &Env, token: &Address, amount: i128) -> Result<i128, Error> {
    let before = get_token_offset(env, token);
    let offset = before.checked_add(amount).ok_or(Error::MathOverflow)?;
    set_token_offset(env, token, offset);
    debug_assert!(transfer_offset_delta(before, get_token_offset(env, token), amount, true));
    Ok(offset)
}

/// Destination side of a Transfer: `amount` arrived but must not count
pub fn debit_inbound(env: &Env, token: &Address, amount: i128) -> Result<i128, Error> {
    let before = get_token_offset(env, token);
    let offset = before.checked_sub(amount).ok_or(Error::MathOverflow)?;
    set_token_offset(env, token, offset);
    debug_assert!(transfer_offset_delta(before, get_token_offset(env, token), amount, false));
    Ok(offset)
}

/// Shrink a positive offset after the matching remote leg failed for good
pub fn reduce_positive_offset(env: &Env, token: &Address, amount: i128) -> Result<i128, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let offset = get_token_offset(env, token);
    if amount > offset {
        return Err(Error::ReductionExceedsBalance);
    }
    debug_assert!(loss_reduction_valid(offset, amount));
    let remaining = offset - amount;
    set_token_offset(env, token, remaining);
    Ok(remaining)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::Env;

    fn with_contract<F, R>(env: &Env, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let contract_id = env.register(crate::XnavPool, ());
        env.as_contract(&contract_id, f)
    }

    #[test]
    fn test_offsets_default_to_zero() {
        let env = Env::default();
        with_contract(&env, || {
            let token = Address::generate(&env);
            assert_eq!(get_token_offset(&env, &token), 0);
            assert_eq!(get_supply_offset(&env), 0);
        });
    }

    #[test]
    fn test_set_and_get_signed_offsets() {
        let env = Env::default();
        with_contract(&env, || {
            let token = Address::generate(&env);
            set_token_offset(&env, &token, -42);
            assert_eq!(get_token_offset(&env, &token), -42);

            set_supply_offset(&env, 7);
            assert_eq!(get_supply_offset(&env), 7);
        });
    }

    #[test]
    fn test_zero_offset_removes_entry() {
        let env = Env::default();
        with_contract(&env, || {
            let token = Address::generate(&env);
            set_token_offset(&env, &token, 5);
            set_token_offset(&env, &token, 0);
            let key = DataKey::TokenOffset(token.clone());
            assert!(!env.storage().persistent().has(&key));
        });
    }

    #[test]
    fn test_credit_then_debit_nets_out() {
        let env = Env::default();
        with_contract(&env, || {
            let token = Address::generate(&env);
            assert_eq!(credit_outbound(&env, &token, 1_000), Ok(1_000));
            assert_eq!(debit_inbound(&env, &token, 1_000), Ok(0));
            assert_eq!(debit_inbound(&env, &token, 250), Ok(-250));
        });
    }

    #[test]
    fn test_offsets_are_per_token() {
        let env = Env::default();
        with_contract(&env, || {
            let token_a = Address::generate(&env);
            let token_b = Address::generate(&env);
            credit_outbound(&env, &token_a, 10).unwrap();
            assert_eq!(get_token_offset(&env, &token_b), 0);
        });
    }

    #[test]
    fn test_overflow_is_reported() {
        let env = Env::default();
        with_contract(&env, || {
            let token = Address::generate(&env);
            set_token_offset(&env, &token, i128::MAX);
            assert_eq!(credit_outbound(&env, &token, 1), Err(Error::MathOverflow));
            assert_eq!(get_token_offset(&env, &token), i128::MAX);
        });
    }

    #[test]
    fn test_reduce_positive_offset_bounds() {
        let env = Env::default();
        with_contract(&env, || {
            let token = Address::generate(&env);
            set_token_offset(&env, &token, 100);

            assert_eq!(
                reduce_positive_offset(&env, &token, 101),
                Err(Error::ReductionExceedsBalance)
            );
            assert_eq!(reduce_positive_offset(&env, &token, 0), Err(Error::InvalidAmount));
            assert_eq!(reduce_positive_offset(&env, &token, 60), Ok(40));
            assert_eq!(reduce_positive_offset(&env, &token, 40), Ok(0));
        });
    }

    #[test]
    fn test_reduce_negative_offset_fails() {
        let env = Env::default();
        with_contract(&env, || {
            let token = Address::generate(&env);
            set_token_offset(&env, &token, -100);
            assert_eq!(
                reduce_positive_offset(&env, &token, 1),
                Err(Error::ReductionExceedsBalance)
            );
        });
    }
}

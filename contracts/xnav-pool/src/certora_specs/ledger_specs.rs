// ============================================================================
// OFFSET LEDGER SPECIFICATIONS
// ============================================================================
//
// KEY INVARIANTS:
// 1. credit_outbound / debit_inbound move the offset by exactly the amount
// 2. The two legs of a Transfer cancel out
// 3. reduce_positive_offset never crosses zero
// 4. Offsets of other tokens are untouched
//
// ============================================================================

#[cfg(feature = "certora")]
use soroban_sdk::{Address, Env};

#[cfg(feature = "certora")]
use cvlr_soroban_derive::rule;

#[cfg(feature = "certora")]
use cvlr::asserts::{cvlr_assert, cvlr_assume, cvlr_satisfy};

#[cfg(feature = "certora")]
use super::model::LedgerSnapshot;

/// RULE: Sanity - an outbound credit is reachable
#[cfg(feature = "certora")]
#[rule]
pub fn sanity_credit_outbound(env: Env, token: Address, amount: i128) {
    cvlr_assume!(amount > 0);
    let _ = crate::ledger::credit_outbound(&env, &token, amount);
    cvlr_satisfy!(true);
}

/// RULE: Outbound credit adds exactly `amount`
#[cfg(feature = "certora")]
#[rule]
pub fn credit_outbound_exact(env: Env, token: Address, amount: i128) {
    let before = LedgerSnapshot::capture(&env, &token);
    if crate::ledger::credit_outbound(&env, &token, amount).is_ok() {
        let after = LedgerSnapshot::capture(&env, &token);
        cvlr_assert!(after.token_offset == before.token_offset + amount);
        cvlr_assert!(after.supply_offset == before.supply_offset);
    }
}

/// RULE: Inbound debit subtracts exactly `amount`
#[cfg(feature = "certora")]
#[rule]
pub fn debit_inbound_exact(env: Env, token: Address, amount: i128) {
    let before = LedgerSnapshot::capture(&env, &token);
    if crate::ledger::debit_inbound(&env, &token, amount).is_ok() {
        let after = LedgerSnapshot::capture(&env, &token);
        cvlr_assert!(after.token_offset == before.token_offset - amount);
    }
}

/// RULE: A Transfer round trip on one ledger restores the offset
#[cfg(feature = "certora")]
#[rule]
pub fn transfer_round_trip_neutral(env: Env, token: Address, amount: i128) {
    cvlr_assume!(amount > 0);
    let before = LedgerSnapshot::capture(&env, &token);
    if crate::ledger::credit_outbound(&env, &token, amount).is_ok()
        && crate::ledger::debit_inbound(&env, &token, amount).is_ok()
    {
        let after = LedgerSnapshot::capture(&env, &token);
        cvlr_assert!(after.token_offset == before.token_offset);
    }
}

/// RULE: Loss acknowledgement keeps the offset non-negative
#[cfg(feature = "certora")]
#[rule]
pub fn reduce_never_crosses_zero(env: Env, token: Address, amount: i128) {
    if crate::ledger::reduce_positive_offset(&env, &token, amount).is_ok() {
        cvlr_assert!(crate::ledger::get_token_offset(&env, &token) >= 0);
    }
}

/// RULE: Mutating one token leaves another token's offset alone
#[cfg(feature = "certora")]
#[rule]
pub fn offsets_isolated_per_token(env: Env, token: Address, other: Address, amount: i128) {
    cvlr_assume!(token != other);
    let before = LedgerSnapshot::capture(&env, &other);
    let _ = crate::ledger::credit_outbound(&env, &token, amount);
    let after = LedgerSnapshot::capture(&env, &other);
    cvlr_assert!(after.token_offset == before.token_offset);
}

// ============================================================================
// TESTS (run with cargo test)
// ============================================================================

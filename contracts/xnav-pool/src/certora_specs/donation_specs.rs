// ============================================================================
// DONATION PROTOCOL SPECIFICATIONS
// ============================================================================
//
// KEY INVARIANTS:
// 1. Phase one fails while a donation is in flight
// 2. Phase two fails unless phase one ran for the same token
// 3. A successful phase two credits at most the observed delivery
// 4. A successful phase two leaves no lock entry behind
//
// ============================================================================

#[cfg(feature = "certora")]
use soroban_sdk::{Address, Env};

#[cfg(feature = "certora")]
use cvlr_soroban_derive::rule;

#[cfg(feature = "certora")]
use cvlr::asserts::{cvlr_assert, cvlr_assume, cvlr_satisfy};

#[cfg(feature = "certora")]
use xnav_types::{DonationParams, OpType, SENTINEL_INIT};

#[cfg(feature = "certora")]
use super::model::LedgerSnapshot;

/// RULE: Sanity - phase one is reachable on an unlocked pool
#[cfg(feature = "certora")]
#[rule]
pub fn sanity_donation_init(env: Env, token: Address) {
    cvlr_assume!(!crate::storage::is_donation_locked(&env));
    let params = DonationParams { op_type: OpType::Transfer };
    let res = crate::donation::donate(&env, token, SENTINEL_INIT, params);
    cvlr_satisfy!(res.is_ok());
}

/// RULE: Phase one never succeeds on a locked pool
#[cfg(feature = "certora")]
#[rule]
pub fn init_fails_when_locked(env: Env, token: Address) {
    cvlr_assume!(crate::storage::is_donation_locked(&env));
    let params = DonationParams { op_type: OpType::Sync };
    let res = crate::donation::donate(&env, token, SENTINEL_INIT, params);
    cvlr_assert!(res.is_err());
}

/// RULE: Phase two for an uninitialized token never succeeds
#[cfg(feature = "certora")]
#[rule]
pub fn process_requires_same_token(env: Env, token: Address, claimed: i128) {
    cvlr_assume!(claimed != SENTINEL_INIT);
    cvlr_assume!(!crate::storage::is_token_initialized(&env, &token));
    let params = DonationParams { op_type: OpType::Transfer };
    let res = crate::donation::donate(&env, token, claimed, params);
    cvlr_assert!(res.is_err());
}

/// RULE: A Transfer donation debits the offset by exactly the claim and
/// releases the lock
#[cfg(feature = "certora")]
#[rule]
pub fn process_debits_claim_and_unlocks(env: Env, token: Address, claimed: i128) {
    cvlr_assume!(claimed != SENTINEL_INIT);
    let before = LedgerSnapshot::capture(&env, &token);
    let params = DonationParams { op_type: OpType::Transfer };
    if crate::donation::donate(&env, token.clone(), claimed, params).is_ok() {
        let after = LedgerSnapshot::capture(&env, &token);
        cvlr_assert!(before.locked);
        cvlr_assert!(!after.locked);
        cvlr_assert!(after.token_offset == before.token_offset - claimed);
        cvlr_assert!(crate::storage::donation_lock_cleared(&env, &token));
    }
}

// ============================================================================
// TESTS (run with cargo test)
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::donation::DonationLock;
    use crate::error::Error;
    use crate::storage::{donation_lock_cleared, is_donation_locked};
    use crate::testutils::{PoolFixture, RATE_SCALE};

    #[test]
    fn test_lock_handle_lifecycle() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.mint(&token, &fx.pool.address, 300);

        fx.env.as_contract(&fx.pool.address, || {
            let lock = DonationLock::acquire(&fx.env, &token).unwrap();
            assert_eq!(lock.snapshot(), 300);
            assert!(is_donation_locked(&fx.env));
            assert!(matches!(
                DonationLock::acquire(&fx.env, &token),
                Err(Error::DonationLocked)
            ));

            let resumed = DonationLock::resume(&fx.env, &token).unwrap();
            assert_eq!(resumed.snapshot(), 300);
            assert_eq!(resumed.delivered(), Ok(0));
            resumed.release();

            assert!(donation_lock_cleared(&fx.env, &token));
            assert!(matches!(
                DonationLock::resume(&fx.env, &token),
                Err(Error::DonationNotLocked)
            ));
        });
    }
}

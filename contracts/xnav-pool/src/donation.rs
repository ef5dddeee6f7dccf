//! Two-phase donation.
//!
//! Phase one (`claimed_amount == SENTINEL_INIT`) snapshots the balance of a
//! single token and takes the pool-wide lock. Tokens are then delivered by
//! whoever holds them. Phase two, callable by anyone, credits at most the
//! balance increase observed for that same token and releases the lock.
//!
//! The lock only holds within the ledger that opened it. While it is held,
//! every other entry point that moves pool balances is refused, so the
//! balance increase seen by phase two can only come from the donor.

use crate::effects::activate_if_priced;
use crate::error::Error;
use crate::invariants::{claim_within_delivery, lock_fully_cleared};
use crate::ledger::debit_inbound;
use crate::storage::{
    clear_donation_lock, donation_lock_cleared, get_config, get_temp_balance,
    is_cross_chain_token, is_donation_locked, is_token_initialized, set_donation_lock,
};
use soroban_sdk::{log, token, Address, Env, Symbol};
use xnav_types::{DonationParams, OpType, SENTINEL_INIT};

/// Handle on the pool's donation lock for one token.
///
/// `acquire` writes the lock; `resume` only succeeds while the lock is held
/// for the same token. The lock is released by `release`, which consumes
/// the handle. A failed call never leaves a half-written lock behind: the
/// host discards every storage write of an invocation that returns an error.
pub struct DonationLock<'a> {
    env: &'a Env,
    token: Address,
    snapshot: i128,
}

impl<'a> DonationLock<'a> {
    pub fn acquire(env: &'a Env, token: &Address) -> Result<Self, Error> {
        require_no_donation(env)?;
        let snapshot = pool_balance(env, token);
        set_donation_lock(env, token, snapshot);
        Ok(Self {
            env,
            token: token.clone(),
            snapshot,
        })
    }

    pub fn resume(env: &'a Env, token: &Address) -> Result<Self, Error> {
        if !is_donation_locked(env) {
            return Err(Error::DonationNotLocked);
        }
        if !is_token_initialized(env, token) {
            return Err(Error::TokenNotInitialized);
        }
        Ok(Self {
            env,
            token: token.clone(),
            snapshot: get_temp_balance(env, token),
        })
    }

    pub fn snapshot(&self) -> i128 {
        self.snapshot
    }

    /// Balance increase since phase one
    pub fn delivered(&self) -> Result<i128, Error> {
        let delta = pool_balance(self.env, &self.token)
            .checked_sub(self.snapshot)
            .ok_or(Error::MathOverflow)?;
        if delta < 0 {
            return Err(Error::BalanceUnderflow);
        }
        Ok(delta)
    }

    pub fn release(self) {
        clear_donation_lock(self.env, &self.token);
        debug_assert!(lock_fully_cleared(
            is_donation_locked(self.env),
            is_token_initialized(self.env, &self.token),
            donation_lock_cleared(self.env, &self.token),
        ));
    }
}

/// Refuse to move pool balances while a donation is in flight
pub fn require_no_donation(env: &Env) -> Result<(), Error> {
    if is_donation_locked(env) {
        return Err(Error::DonationLocked);
    }
    Ok(())
}

/// Entry point behind `XnavPool::donate`
pub fn donate(env: &Env, token: Address, claimed_amount: i128, params: DonationParams) -> Result<(), Error> {
    if claimed_amount == SENTINEL_INIT {
        let lock = DonationLock::acquire(env, &token)?;
        log!(env, "donation initialized", token, lock.snapshot());
        env.events().publish(
            (Symbol::new(env, "donation_init"),),
            (token, lock.snapshot()),
        );
        return Ok(());
    }

    let lock = DonationLock::resume(env, &token)?;
    let delivered = lock.delivered()?;

    if claimed_amount < 0 {
        return Err(Error::InvalidAmount);
    }
    if !claim_within_delivery(claimed_amount, delivered) {
        return Err(Error::CallerTransferAmount);
    }
    if !is_cross_chain_token(env, &token) {
        return Err(Error::UnsupportedCrossChainToken);
    }

    match params.op_type {
        OpType::Transfer => {
            debit_inbound(env, &token, claimed_amount)?;
        }
        OpType::Sync => {}
        // A rebalance needs the source NAV only a bridge message carries
        OpType::Rebalance | OpType::Invalid => return Err(Error::InvalidOpType),
    }

    let config = get_config(env);
    activate_if_priced(env, &config, &token)?;

    lock.release();

    log!(env, "donation processed", token, claimed_amount, delivered);
    env.events().publish(
        (Symbol::new(env, "donation"),),
        (token, claimed_amount, delivered, params.op_type),
    );
    Ok(())
}

fn pool_balance(env: &Env, token: &Address) -> i128 {
    token::Client::new(env, token).balance(&env.current_contract_address())
}

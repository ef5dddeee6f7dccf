#![no_std]

//! Fallback escrow.
//!
//! When the bridge cannot hand tokens to the pool together with a message,
//! it parks them at the pool's escrow for the operation type. The address
//! is derived from (pool, op type) alone, so it is known before the escrow
//! is deployed. `refund_vault` forwards a parked balance through the pool's
//! donation protocol with the escrow's own operation type.

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, log, token, Address, Env, IntoVal, Symbol,
};
use xnav_types::{DonationParams, OpType, SENTINEL_INIT};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum EscrowError {
    /// Token is not on the pool's cross-chain allow-list
    UnsupportedToken = 1,
    /// Nothing to refund
    InvalidAmount = 2,
}

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Pool,
    OpType,
}

const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days

#[contract]
pub struct XnavEscrow;

#[contractimpl]
impl XnavEscrow {
    /// Bind the escrow to its pool. The pool calls this in the same
    /// transaction that deploys the escrow.
    pub fn initialize(env: Env, pool: Address, op_type: OpType) {
        if env.storage().instance().has(&DataKey::Pool) {
            panic!("Already initialized");
        }

        env.storage().instance().set(&DataKey::Pool, &pool);
        env.storage().instance().set(&DataKey::OpType, &op_type);
        extend_instance_ttl(&env);
    }

    /// Hand the escrow's whole balance of `token` back to the pool.
    ///
    /// Runs a complete donation against the pool: open, transfer, close.
    /// Callable by anyone.
    ///
    /// # Returns
    /// The amount returned
    pub fn refund_vault(env: Env, token: Address) -> Result<i128, EscrowError> {
        let pool = Self::get_pool(env.clone());
        let op_type = Self::get_op_type(env.clone());

        if !is_cross_chain_token(&env, &pool, &token) {
            return Err(EscrowError::UnsupportedToken);
        }

        let this = env.current_contract_address();
        let token_client = token::Client::new(&env, &token);
        let balance = token_client.balance(&this);
        if balance <= 0 {
            return Err(EscrowError::InvalidAmount);
        }

        let params = DonationParams { op_type };
        donate(&env, &pool, &token, SENTINEL_INIT, &params);
        token_client.transfer(&this, &pool, &balance);
        // A single unit cannot be claimed: it reads as the opening sentinel
        let claimed = if balance == SENTINEL_INIT { 0 } else { balance };
        donate(&env, &pool, &token, claimed, &params);

        log!(&env, "escrow refund", token, balance);
        env.events().publish(
            (Symbol::new(&env, "escrow_refund"), pool),
            (token, balance, op_type),
        );
        Ok(balance)
    }

    pub fn get_pool(env: Env) -> Address {
        extend_instance_ttl(&env);
        env.storage()
            .instance()
            .get(&DataKey::Pool)
            .expect("Escrow not initialized")
    }

    pub fn get_op_type(env: Env) -> OpType {
        env.storage()
            .instance()
            .get(&DataKey::OpType)
            .expect("Escrow not initialized")
    }
}

fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

fn is_cross_chain_token(env: &Env, pool: &Address, token: &Address) -> bool {
    env.invoke_contract(
        pool,
        &Symbol::new(env, "is_cross_chain_token"),
        (token,).into_val(env),
    )
}

// Pool errors abort the whole refund
fn donate(env: &Env, pool: &Address, token: &Address, claimed: i128, params: &DonationParams) {
    env.invoke_contract::<()>(
        pool,
        &Symbol::new(env, "donate"),
        (token, claimed, params.clone()).into_val(env),
    );
}

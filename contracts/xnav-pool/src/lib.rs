#![no_std]

mod donation;
mod effects;
mod error;
mod escrow;
mod inbound;
mod invariants;
mod ledger;
mod nav;
mod oracle;
mod outbound;
mod shares;
mod storage;

#[cfg(any(test, feature = "certora"))]
mod certora_specs;

#[cfg(any(test, feature = "testutils"))]
pub mod testutils;

pub use error::Error;

use soroban_sdk::{contract, contractimpl, log, token, Address, Bytes, Env, Symbol, Vec};
use storage::{get_active_tokens, get_config, get_shares, get_state, has_config, set_config, set_state};
use xnav_types::{
    BridgeTransferParams, DonationParams, NavData, OpType, PoolConfig, PoolSettings, PoolState,
    V3Deposit,
};

#[contract]
pub struct XnavPool;

#[contractimpl]
impl XnavPool {
    /// Initialize the pool. Decimals are taken from the base token.
    pub fn initialize(env: Env, settings: PoolSettings) {
        if has_config(&env) {
            panic!("Already initialized");
        }
        settings.owner.require_auth();

        let decimals = token::Client::new(&env, &settings.base_token).decimals();
        let config = PoolConfig::from_settings(settings, decimals);
        set_config(&env, &config);
        set_state(&env, &PoolState::new(decimals));
    }

    // === Owner ===

    /// Allow or disallow `token` as a cross-chain asset
    pub fn set_cross_chain_token(env: Env, token: Address, allowed: bool) {
        get_config(&env).owner.require_auth();
        storage::set_cross_chain_token(&env, &token, allowed);
        env.events().publish(
            (Symbol::new(&env, "cross_chain_token"),),
            (token, allowed),
        );
    }

    /// Write off part of a positive offset whose remote leg is lost for good.
    ///
    /// # Returns
    /// The remaining offset
    pub fn acknowledge_loss(env: Env, token: Address, amount: i128) -> Result<i128, Error> {
        get_config(&env).owner.require_auth();
        let remaining = ledger::reduce_positive_offset(&env, &token, amount)?;
        log!(&env, "loss acknowledged", token, amount, remaining);
        env.events().publish(
            (Symbol::new(&env, "loss_acknowledged"),),
            (token, amount, remaining),
        );
        Ok(remaining)
    }

    // === Cross-chain flows ===

    /// Two-phase donation: `claimed_amount == 1` opens it, any other value
    /// closes it. Callable by anyone.
    pub fn donate(
        env: Env,
        token: Address,
        claimed_amount: i128,
        params: DonationParams,
    ) -> Result<(), Error> {
        donation::donate(&env, token, claimed_amount, params)
    }

    /// Bridge callback for tokens delivered together with a message
    pub fn handle_message(
        env: Env,
        caller: Address,
        token: Address,
        amount: i128,
        message: Bytes,
    ) -> Result<(), Error> {
        inbound::handle_message(&env, caller, token, amount, message)
    }

    /// Send tokens to another chain through the bridge spoke
    ///
    /// # Returns
    /// The deposit handed to the spoke
    pub fn deposit_v3(
        env: Env,
        caller: Address,
        params: BridgeTransferParams,
    ) -> Result<V3Deposit, Error> {
        outbound::deposit_v3(&env, caller, params)
    }

    // === NAV ===

    /// NAV as it would be stored now, without writing anything
    pub fn get_nav_data_view(env: Env) -> Result<NavData, Error> {
        nav::compute_nav(&env)
    }

    /// Recompute NAV and store the unitary value
    pub fn update_unitary_value(env: Env) -> Result<NavData, Error> {
        nav::update_unitary_value(&env)
    }

    // === Escrows ===

    pub fn get_escrow_address(env: Env, op_type: OpType) -> Result<Address, Error> {
        escrow::escrow_address(&env, op_type)
    }

    /// Deploy the escrow for `op_type`; returns the existing one on repeat
    pub fn deploy_escrow(env: Env, op_type: OpType) -> Result<Address, Error> {
        escrow::deploy_escrow(&env, op_type)
    }

    // === Shares ===

    /// Deposit `amount_in` base token for shares
    pub fn mint(env: Env, recipient: Address, amount_in: i128) -> Result<i128, Error> {
        recipient.require_auth();
        shares::mint(&env, recipient, amount_in)
    }

    /// Redeem `shares` for base token
    pub fn burn(env: Env, holder: Address, shares: i128) -> Result<i128, Error> {
        holder.require_auth();
        shares::burn(&env, holder, shares)
    }

    // === View Functions ===

    pub fn get_token_offset(env: Env, token: Address) -> i128 {
        ledger::get_token_offset(&env, &token)
    }

    pub fn get_supply_offset(env: Env) -> i128 {
        ledger::get_supply_offset(&env)
    }

    pub fn is_cross_chain_token(env: Env, token: Address) -> bool {
        storage::is_cross_chain_token(&env, &token)
    }

    pub fn get_active_tokens(env: Env) -> Vec<Address> {
        get_active_tokens(&env)
    }

    pub fn balance_of(env: Env, holder: Address) -> i128 {
        get_shares(&env, &holder)
    }

    pub fn total_supply(env: Env) -> i128 {
        get_state(&env).total_supply
    }

    pub fn get_state(env: Env) -> PoolState {
        get_state(&env)
    }

    pub fn get_config(env: Env) -> PoolConfig {
        get_config(&env)
    }
}

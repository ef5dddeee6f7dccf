//! Mock collaborators and a pool fixture for tests.
//!
//! Enabled for this crate's own tests and, through the `testutils` feature,
//! for other crates in the workspace that drive a pool end to end.

#![cfg(any(test, feature = "testutils"))]

use crate::{XnavPool, XnavPoolClient};
use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{contract, contractimpl, contracttype, token, Address, BytesN, Env};
use xnav_types::{DestinationMessage, PoolSettings, V3Deposit};

/// Oracle rates are quoted as base units per token unit, scaled by this
pub const RATE_SCALE: i128 = 10_000_000;

// === Oracle ===

#[contracttype]
#[derive(Clone)]
enum OracleKey {
    Rate(Address),
}

#[contract]
pub struct MockOracle;

#[contractimpl]
impl MockOracle {
    pub fn set_price(env: Env, token: Address, rate: i128) {
        env.storage().instance().set(&OracleKey::Rate(token), &rate);
    }

    pub fn has_price_feed(env: Env, token: Address) -> bool {
        env.storage().instance().has(&OracleKey::Rate(token))
    }

    pub fn convert_token_amount(env: Env, token: Address, amount: i128, _target: Address) -> i128 {
        let rate: i128 = env
            .storage()
            .instance()
            .get(&OracleKey::Rate(token))
            .expect("No price feed");
        amount * rate / RATE_SCALE
    }
}

// === Bridge spoke ===

#[contracttype]
#[derive(Clone)]
enum SpokeKey {
    LastDeposit,
    Depositor,
}

#[contract]
pub struct MockSpoke;

#[contractimpl]
impl MockSpoke {
    pub fn deposit_v3(env: Env, depositor: Address, deposit: V3Deposit) {
        env.storage().instance().set(&SpokeKey::Depositor, &depositor);
        env.storage().instance().set(&SpokeKey::LastDeposit, &deposit);
    }

    pub fn last_deposit(env: Env) -> Option<V3Deposit> {
        env.storage().instance().get(&SpokeKey::LastDeposit)
    }

    pub fn last_depositor(env: Env) -> Option<Address> {
        env.storage().instance().get(&SpokeKey::Depositor)
    }
}

// === Wrapped native ===

#[contracttype]
#[derive(Clone)]
enum WrappedKey {
    Native,
    Balance(Address),
}

/// Wrapped-native token backed one to one by a native asset contract
#[contract]
pub struct MockWrappedNative;

#[contractimpl]
impl MockWrappedNative {
    pub fn initialize(env: Env, native: Address) {
        env.storage().instance().set(&WrappedKey::Native, &native);
    }

    /// Pull `amount` native from `from` (needs an allowance) and credit wrapped
    pub fn deposit(env: Env, from: Address, amount: i128) {
        from.require_auth();
        let this = env.current_contract_address();
        Self::native(&env).transfer_from(&this, &from, &this, &amount);
        Self::credit(&env, &from, amount);
    }

    pub fn withdraw(env: Env, from: Address, amount: i128) {
        from.require_auth();
        Self::debit(&env, &from, amount);
        Self::native(&env).transfer(&env.current_contract_address(), &from, &amount);
    }

    pub fn balance(env: Env, id: Address) -> i128 {
        env.storage()
            .persistent()
            .get(&WrappedKey::Balance(id))
            .unwrap_or(0)
    }

    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        from.require_auth();
        Self::debit(&env, &from, amount);
        Self::credit(&env, &to, amount);
    }

    pub fn decimals(_env: Env) -> u32 {
        7
    }
}

impl MockWrappedNative {
    fn native(env: &Env) -> token::Client<'_> {
        let native: Address = env
            .storage()
            .instance()
            .get(&WrappedKey::Native)
            .expect("Not initialized");
        token::Client::new(env, &native)
    }

    fn credit(env: &Env, id: &Address, amount: i128) {
        let balance = Self::balance(env.clone(), id.clone());
        env.storage()
            .persistent()
            .set(&WrappedKey::Balance(id.clone()), &(balance + amount));
    }

    fn debit(env: &Env, id: &Address, amount: i128) {
        let balance = Self::balance(env.clone(), id.clone());
        if balance < amount {
            panic!("Insufficient balance");
        }
        env.storage()
            .persistent()
            .set(&WrappedKey::Balance(id.clone()), &(balance - amount));
    }
}

// === Pool fixture ===

/// An initialized pool wired to mock collaborators, with all auths mocked
pub struct PoolFixture {
    pub env: Env,
    pub pool: XnavPoolClient<'static>,
    pub owner: Address,
    pub base_token: Address,
    pub native_token: Address,
    pub wrapped_native: Address,
    pub spoke: Address,
    pub oracle: MockOracleClient<'static>,
    pub chain_id: u32,
    asset_admin: Address,
}

impl PoolFixture {
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();

        let owner = Address::generate(&env);
        let asset_admin = Address::generate(&env);
        let base_token = env
            .register_stellar_asset_contract_v2(asset_admin.clone())
            .address();
        let native_token = env
            .register_stellar_asset_contract_v2(asset_admin.clone())
            .address();

        let wrapped_native = env.register(MockWrappedNative, ());
        MockWrappedNativeClient::new(&env, &wrapped_native).initialize(&native_token);
        let oracle_id = env.register(MockOracle, ());
        let spoke = env.register(MockSpoke, ());

        let chain_id = 10;
        let pool_id = env.register(XnavPool, ());
        let pool = XnavPoolClient::new(&env, &pool_id);
        pool.initialize(&PoolSettings {
            owner: owner.clone(),
            base_token: base_token.clone(),
            chain_id,
            bridge: spoke.clone(),
            oracle: oracle_id.clone(),
            wrapped_native: Some(wrapped_native.clone()),
            native_token: Some(native_token.clone()),
            escrow_wasm_hash: BytesN::from_array(&env, &[1u8; 32]),
        });
        pool.set_cross_chain_token(&base_token, &true);

        let oracle = MockOracleClient::new(&env, &oracle_id);
        Self {
            env,
            pool,
            owner,
            base_token,
            native_token,
            wrapped_native,
            spoke,
            oracle,
            chain_id,
            asset_admin,
        }
    }

    /// Fresh asset contract, neither allow-listed nor priced
    pub fn create_token(&self) -> Address {
        self.env
            .register_stellar_asset_contract_v2(self.asset_admin.clone())
            .address()
    }

    /// Fresh asset contract, allow-listed and priced at `rate`
    pub fn create_bridged_token(&self, rate: i128) -> Address {
        let token = self.create_token();
        self.pool.set_cross_chain_token(&token, &true);
        self.oracle.set_price(&token, &rate);
        token
    }

    pub fn mint(&self, token: &Address, to: &Address, amount: i128) {
        token::StellarAssetClient::new(&self.env, token).mint(to, &amount);
    }

    pub fn balance(&self, token: &Address, id: &Address) -> i128 {
        token::Client::new(&self.env, token).balance(id)
    }

    /// Move tokens out of the pool behind its back
    pub fn transfer_from_pool(&self, token: &Address, amount: i128) {
        let sink = Address::generate(&self.env);
        let pool = self.pool.address.clone();
        self.env.as_contract(&pool, || {
            token::Client::new(&self.env, token).transfer(&pool, &sink, &amount);
        });
    }

    /// Mint `amount` shares against the same amount of base token.
    /// Only exact while NAV is one unit.
    pub fn seed_shares(&self, amount: i128) -> Address {
        let holder = Address::generate(&self.env);
        self.mint(&self.base_token, &holder, amount);
        self.pool.mint(&holder, &amount);
        holder
    }

    /// Bridge delivery: tokens land in the pool, then the spoke calls in
    pub fn deliver(&self, token: &Address, amount: i128, message: &DestinationMessage) {
        self.mint(token, &self.pool.address, amount);
        self.pool
            .handle_message(&self.spoke, token, &amount, &message.encode(&self.env));
    }

    /// Bridge delivery in wrapped native
    pub fn deliver_wrapped(&self, amount: i128, message: &DestinationMessage) {
        let wrapped = MockWrappedNativeClient::new(&self.env, &self.wrapped_native);
        self.mint(&self.native_token, &self.spoke, amount);
        token::Client::new(&self.env, &self.native_token).approve(
            &self.spoke,
            &self.wrapped_native,
            &amount,
            &self.env.ledger().sequence(),
        );
        wrapped.deposit(&self.spoke, &amount);
        wrapped.transfer(&self.spoke, &self.pool.address, &amount);
        self.pool.handle_message(
            &self.spoke,
            &self.wrapped_native,
            &amount,
            &message.encode(&self.env),
        );
    }

    /// Close the current ledger
    pub fn advance_ledger(&self) {
        self.env.ledger().with_mut(|li| {
            li.sequence_number += 1;
            li.timestamp += 5;
        });
    }

    pub fn spoke_client(&self) -> MockSpokeClient<'static> {
        MockSpokeClient::new(&self.env, &self.spoke)
    }

    // Direct ledger access inside the pool's contract frame

    pub fn activate(&self, token: &Address) {
        self.env.as_contract(&self.pool.address, || {
            let config = crate::storage::get_config(&self.env);
            crate::effects::activate_if_priced(&self.env, &config, token).unwrap();
        });
    }

    pub fn set_offset(&self, token: &Address, offset: i128) {
        self.env.as_contract(&self.pool.address, || {
            crate::ledger::set_token_offset(&self.env, token, offset);
        });
    }

    pub fn set_supply_offset(&self, offset: i128) {
        self.env.as_contract(&self.pool.address, || {
            crate::ledger::set_supply_offset(&self.env, offset);
        });
    }

    pub fn donation_locked(&self) -> bool {
        self.env.as_contract(&self.pool.address, || {
            crate::storage::is_donation_locked(&self.env)
        })
    }

    pub fn temp_balance(&self, token: &Address) -> i128 {
        self.env.as_contract(&self.pool.address, || {
            crate::storage::get_temp_balance(&self.env, token)
        })
    }

    pub fn lock_cleared(&self, token: &Address) -> bool {
        self.env.as_contract(&self.pool.address, || {
            crate::storage::donation_lock_cleared(&self.env, token)
        })
    }
}

impl Default for PoolFixture {
    fn default() -> Self {
        Self::new()
    }
}

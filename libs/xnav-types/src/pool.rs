use soroban_sdk::{contracttype, Address, BytesN};

/// Arguments of pool initialization
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolSettings {
    pub owner: Address,
    /// Token NAV is denominated in
    pub base_token: Address,
    /// Chain id stamped on outbound messages
    pub chain_id: u32,
    /// Bridge spoke allowed to deliver messages
    pub bridge: Address,
    /// Price feed contract
    pub oracle: Address,
    pub wrapped_native: Option<Address>,
    pub native_token: Option<Address>,
    /// Escrow WASM hash for deployment
    pub escrow_wasm_hash: BytesN<32>,
}

/// Pool configuration - immutable after creation
#[contracttype]
#[derive(Clone, Debug)]
pub struct PoolConfig {
    pub owner: Address,
    pub base_token: Address,
    /// Decimals of the base token, shares and unitary value
    pub decimals: u32,
    pub chain_id: u32,
    pub bridge: Address,
    pub oracle: Address,
    pub wrapped_native: Option<Address>,
    pub native_token: Option<Address>,
    pub escrow_wasm_hash: BytesN<32>,
}

impl PoolConfig {
    pub fn from_settings(settings: PoolSettings, decimals: u32) -> Self {
        Self {
            owner: settings.owner,
            base_token: settings.base_token,
            decimals,
            chain_id: settings.chain_id,
            bridge: settings.bridge,
            oracle: settings.oracle,
            wrapped_native: settings.wrapped_native,
            native_token: settings.native_token,
            escrow_wasm_hash: settings.escrow_wasm_hash,
        }
    }
}

/// Mutable pool accounting - stored in Instance storage
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    /// Last stored value of one share, in base token units
    pub unitary_value: i128,
    /// Shares in existence on this chain
    pub total_supply: i128,
}

impl PoolState {
    pub fn new(decimals: u32) -> Self {
        Self {
            unitary_value: 10i128.pow(decimals),
            total_supply: 0,
        }
    }
}

/// Inputs and result of one NAV computation
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NavData {
    /// Base + active tokens valued at balance plus offset
    pub total_value: i128,
    pub total_supply: i128,
    /// Total supply plus supply offset
    pub effective_supply: i128,
    pub unitary_value: i128,
}

use soroban_sdk::{contracttype, Address, Env, Vec};
use xnav_types::{OpType, PoolConfig, PoolState};

// ============================================================================
// SOROBAN RESOURCE LIMITS - Constraints shaping the pool layout:
// ============================================================================
// - Read entries per tx: 100 entries / 200 KB
// - Write entries per tx: 50 entries / 132 KB
//
// Storage design considerations:
// - Config, state, active token list and supply offset live in Instance
//   storage; they are read on nearly every call
// - Token offsets, allow-list flags, escrow addresses and share balances are
//   separate Persistent entries; zero/false entries are removed
// - Donation lock entries live in Temporary storage and are bound to the
//   ledger that opened them; a lock from an earlier ledger reads as released
//   and is swept by the next phase one
// - NAV touches 1 balance read + 1 offset read per active token, which is
//   why the active set is capped at MAX_ACTIVE_TOKENS
// ============================================================================

/// Value of `LockKey::DonationLock`
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OpenDonation {
    pub token: Address,
    pub ledger: u32,
}

/// Storage keys for the pool contract
#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    /// Pool configuration (Instance storage)
    Config,
    /// Unitary value and total supply (Instance storage)
    State,
    /// Tokens valued besides the base token (Instance storage)
    ActiveTokens,
    /// Share-equivalents owed to or by other chains (Instance storage)
    SupplyOffset,
    /// token -> value not reflected in the wallet balance (Persistent storage)
    TokenOffset(Address),
    /// token -> accepted through the bridge (Persistent storage)
    CrossChainToken(Address),
    /// op type -> deployed escrow (Persistent storage)
    Escrow(OpType),
    /// holder -> shares (Persistent storage)
    Shares(Address),
}

/// Keys of the in-flight donation (Temporary storage)
#[contracttype]
#[derive(Clone)]
pub enum LockKey {
    /// Open donation: token and opening ledger
    DonationLock,
    /// token -> balance when phase one ran
    TempBalance(Address),
    /// token -> phase one ran for this token
    TokenInitialized(Address),
}

// TTL constants
const INSTANCE_TTL_THRESHOLD: u32 = 17280; // ~1 day
const INSTANCE_TTL_EXTEND: u32 = 518400; // ~30 days
const PERSISTENT_TTL_THRESHOLD: u32 = 17280;
const PERSISTENT_TTL_EXTEND: u32 = 518400;
const TEMPORARY_TTL_THRESHOLD: u32 = 120;
const TEMPORARY_TTL_EXTEND: u32 = 720; // ~1 hour

/// Extend instance storage TTL
pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_TTL_THRESHOLD, INSTANCE_TTL_EXTEND);
}

/// Extend persistent storage TTL for a key
pub fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_TTL_THRESHOLD, PERSISTENT_TTL_EXTEND);
}

fn extend_temporary_ttl(env: &Env, key: &LockKey) {
    env.storage()
        .temporary()
        .extend_ttl(key, TEMPORARY_TTL_THRESHOLD, TEMPORARY_TTL_EXTEND);
}

// === Config ===

pub fn has_config(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Config)
}

pub fn get_config(env: &Env) -> PoolConfig {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::Config)
        .expect("Pool not initialized")
}

pub fn set_config(env: &Env, config: &PoolConfig) {
    env.storage().instance().set(&DataKey::Config, config);
    extend_instance_ttl(env);
}

// === State ===

pub fn get_state(env: &Env) -> PoolState {
    extend_instance_ttl(env);
    env.storage()
        .instance()
        .get(&DataKey::State)
        .expect("Pool not initialized")
}

pub fn set_state(env: &Env, state: &PoolState) {
    env.storage().instance().set(&DataKey::State, state);
    extend_instance_ttl(env);
}

// === Active tokens ===

pub fn get_active_tokens(env: &Env) -> Vec<Address> {
    env.storage()
        .instance()
        .get(&DataKey::ActiveTokens)
        .unwrap_or_else(|| Vec::new(env))
}

pub fn set_active_tokens(env: &Env, tokens: &Vec<Address>) {
    env.storage().instance().set(&DataKey::ActiveTokens, tokens);
    extend_instance_ttl(env);
}

// === Cross-chain allow-list ===

pub fn is_cross_chain_token(env: &Env, token: &Address) -> bool {
    let key = DataKey::CrossChainToken(token.clone());
    env.storage().persistent().get(&key).unwrap_or(false)
}

pub fn set_cross_chain_token(env: &Env, token: &Address, allowed: bool) {
    let key = DataKey::CrossChainToken(token.clone());
    if allowed {
        env.storage().persistent().set(&key, &true);
        extend_persistent_ttl(env, &key);
    } else {
        env.storage().persistent().remove(&key);
    }
}

// === Escrows ===

pub fn get_escrow(env: &Env, op_type: OpType) -> Option<Address> {
    env.storage().persistent().get(&DataKey::Escrow(op_type))
}

pub fn set_escrow(env: &Env, op_type: OpType, escrow: &Address) {
    let key = DataKey::Escrow(op_type);
    env.storage().persistent().set(&key, escrow);
    extend_persistent_ttl(env, &key);
}

// === Shares ===

pub fn get_shares(env: &Env, holder: &Address) -> i128 {
    let key = DataKey::Shares(holder.clone());
    env.storage().persistent().get(&key).unwrap_or(0)
}

pub fn set_shares(env: &Env, holder: &Address, shares: i128) {
    let key = DataKey::Shares(holder.clone());
    if shares == 0 {
        env.storage().persistent().remove(&key);
    } else {
        env.storage().persistent().set(&key, &shares);
        extend_persistent_ttl(env, &key);
    }
}

// === Donation lock ===

/// Lock entry written by phase one, stale or not
fn open_donation(env: &Env) -> Option<OpenDonation> {
    env.storage().temporary().get(&LockKey::DonationLock)
}

/// Lock held for the current ledger
fn current_donation(env: &Env) -> Option<OpenDonation> {
    open_donation(env).filter(|open| open.ledger == env.ledger().sequence())
}

pub fn is_donation_locked(env: &Env) -> bool {
    current_donation(env).is_some()
}

pub fn is_token_initialized(env: &Env, token: &Address) -> bool {
    match current_donation(env) {
        Some(open) => {
            open.token == *token
                && env
                    .storage()
                    .temporary()
                    .get(&LockKey::TokenInitialized(token.clone()))
                    .unwrap_or(false)
        }
        None => false,
    }
}

pub fn get_temp_balance(env: &Env, token: &Address) -> i128 {
    env.storage()
        .temporary()
        .get(&LockKey::TempBalance(token.clone()))
        .unwrap_or(0)
}

/// Open the lock for `token` at the current ledger, sweeping a stale one
pub fn set_donation_lock(env: &Env, token: &Address, balance: i128) {
    if let Some(stale) = open_donation(env) {
        clear_donation_lock(env, &stale.token);
    }

    let temporary = env.storage().temporary();
    let open = OpenDonation {
        token: token.clone(),
        ledger: env.ledger().sequence(),
    };
    temporary.set(&LockKey::DonationLock, &open);
    extend_temporary_ttl(env, &LockKey::DonationLock);

    let initialized_key = LockKey::TokenInitialized(token.clone());
    temporary.set(&initialized_key, &true);
    extend_temporary_ttl(env, &initialized_key);

    let balance_key = LockKey::TempBalance(token.clone());
    temporary.set(&balance_key, &balance);
    extend_temporary_ttl(env, &balance_key);
}

/// Remove the lock flag and every entry recorded for `token`
pub fn clear_donation_lock(env: &Env, token: &Address) {
    let temporary = env.storage().temporary();
    temporary.remove(&LockKey::DonationLock);
    temporary.remove(&LockKey::TokenInitialized(token.clone()));
    temporary.remove(&LockKey::TempBalance(token.clone()));
}

/// True when no lock entry is left for `token`
pub fn donation_lock_cleared(env: &Env, token: &Address) -> bool {
    let temporary = env.storage().temporary();
    !temporary.has(&LockKey::DonationLock)
        && !temporary.has(&LockKey::TokenInitialized(token.clone()))
        && !temporary.has(&LockKey::TempBalance(token.clone()))
}

use crate::error::Error;
use crate::oracle::has_price_feed;
use crate::storage::{get_active_tokens, set_active_tokens};
use soroban_sdk::{log, token, Address, Env, IntoVal, Symbol};
use xnav_types::{PoolConfig, MAX_ACTIVE_TOKENS};

/// Add `token` to the valued set if it is priced and not yet tracked.
///
/// Returns true when the token was added.
pub fn activate_if_priced(env: &Env, config: &PoolConfig, token: &Address) -> Result<bool, Error> {
    if *token == config.base_token {
        return Ok(false);
    }
    let mut active = get_active_tokens(env);
    if active.contains(token) {
        return Ok(false);
    }
    if !has_price_feed(env, config, token) {
        return Ok(false);
    }
    if active.len() >= MAX_ACTIVE_TOKENS {
        return Err(Error::ActiveTokensLimitReached);
    }

    active.push_back(token.clone());
    set_active_tokens(env, &active);

    log!(env, "token activated", token);
    env.events()
        .publish((Symbol::new(env, "token_activated"),), (token.clone(),));
    Ok(true)
}

/// Token identity a delivery is accounted under.
///
/// A wrapped-native delivery flagged for unwrapping is unwrapped in place
/// and counted as the native token; everything else keeps its identity.
pub fn resolve_delivered_token(
    env: &Env,
    config: &PoolConfig,
    token: &Address,
    amount: i128,
    should_unwrap: bool,
) -> Address {
    if !should_unwrap {
        return token.clone();
    }
    match (&config.wrapped_native, &config.native_token) {
        (Some(wrapped), Some(native)) if wrapped == token => {
            unwrap_native(env, wrapped, amount);
            native.clone()
        }
        _ => token.clone(),
    }
}

/// Wrap `amount` of the pool's native balance.
///
/// The wrapped contract pulls the native tokens itself, so the pool grants
/// it an allowance valid for this ledger only.
pub fn wrap_native(env: &Env, native: &Address, wrapped: &Address, amount: i128) {
    let pool = env.current_contract_address();
    token::Client::new(env, native).approve(&pool, wrapped, &amount, &env.ledger().sequence());
    env.invoke_contract::<()>(
        wrapped,
        &Symbol::new(env, "deposit"),
        (pool, amount).into_val(env),
    );
}

fn unwrap_native(env: &Env, wrapped: &Address, amount: i128) {
    env.invoke_contract::<()>(
        wrapped,
        &Symbol::new(env, "withdraw"),
        (env.current_contract_address(), amount).into_val(env),
    );
}

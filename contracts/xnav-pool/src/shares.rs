//! Minimal share accounting, priced at the refreshed unitary value and
//! settled in the base token.

use crate::donation::require_no_donation;
use crate::error::Error;
use crate::ledger::get_supply_offset;
use crate::nav::update_unitary_value;
use crate::storage::{get_config, get_shares, get_state, set_shares, set_state};
use soroban_sdk::{log, token, Address, Env, Symbol};
use xnav_math::{amount_for_shares, effective_supply, shares_for_amount};

pub fn mint(env: &Env, recipient: Address, amount_in: i128) -> Result<i128, Error> {
    require_no_donation(env)?;
    if amount_in <= 0 {
        return Err(Error::InvalidAmount);
    }
    let config = get_config(env);
    let nav = update_unitary_value(env)?;

    let shares = shares_for_amount(env, amount_in, nav.unitary_value, config.decimals)
        .ok_or(Error::MathOverflow)?;
    if shares <= 0 {
        return Err(Error::InvalidAmount);
    }

    token::Client::new(env, &config.base_token).transfer(
        &recipient,
        &env.current_contract_address(),
        &amount_in,
    );

    let mut state = get_state(env);
    state.total_supply = state.total_supply.checked_add(shares).ok_or(Error::MathOverflow)?;
    set_state(env, &state);
    set_shares(env, &recipient, get_shares(env, &recipient) + shares);

    log!(env, "mint", recipient, amount_in, shares);
    env.events()
        .publish((Symbol::new(env, "mint"), recipient), (amount_in, shares));
    Ok(shares)
}

pub fn burn(env: &Env, holder: Address, shares: i128) -> Result<i128, Error> {
    require_no_donation(env)?;
    if shares <= 0 {
        return Err(Error::InvalidAmount);
    }
    let held = get_shares(env, &holder);
    if shares > held {
        return Err(Error::InsufficientShares);
    }

    let config = get_config(env);
    let nav = update_unitary_value(env)?;
    let amount_out = amount_for_shares(env, shares, nav.unitary_value, config.decimals)
        .ok_or(Error::MathOverflow)?;

    let mut state = get_state(env);
    state.total_supply -= shares;
    // Remaining supply must still carry the supply offset
    effective_supply(state.total_supply, get_supply_offset(env)).ok_or(Error::EffectiveSupplyTooLow)?;

    let base = token::Client::new(env, &config.base_token);
    let pool = env.current_contract_address();
    if base.balance(&pool) < amount_out {
        return Err(Error::InsufficientLiquidity);
    }

    set_state(env, &state);
    set_shares(env, &holder, held - shares);
    if amount_out > 0 {
        base.transfer(&pool, &holder, &amount_out);
    }

    log!(env, "burn", holder, shares, amount_out);
    env.events()
        .publish((Symbol::new(env, "burn"), holder), (shares, amount_out));
    Ok(amount_out)
}

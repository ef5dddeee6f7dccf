//! NAV view.
//!
//! `compute_nav` is the only place NAV is derived. The read-only view and
//! `update_unitary_value` both go through it, so a stored unitary value is
//! always the value the view would have reported in the same ledger state.

use crate::error::Error;
use crate::invariants::{effective_supply_above_floor, nav_non_negative};
use crate::ledger::{get_supply_offset, get_token_offset};
use crate::oracle::convert_to_base;
use crate::storage::{get_active_tokens, get_config, get_state, set_state};
use soroban_sdk::{log, token, Address, Env, Symbol};
use xnav_math::{effective_supply, unitary_value};
use xnav_types::{NavData, PoolConfig};

/// Value the pool owns in `token`: wallet balance plus offset, in base units
fn virtual_value(env: &Env, config: &PoolConfig, pool: &Address, token: &Address) -> Result<i128, Error> {
    let balance = token::Client::new(env, token).balance(pool);
    let amount = balance
        .checked_add(get_token_offset(env, token))
        .ok_or(Error::MathOverflow)?;
    Ok(convert_to_base(env, config, token, amount))
}

pub fn compute_nav(env: &Env) -> Result<NavData, Error> {
    let config = get_config(env);
    let state = get_state(env);
    let pool = env.current_contract_address();

    let mut total_value = virtual_value(env, &config, &pool, &config.base_token)?;
    for token in get_active_tokens(env).iter() {
        let value = virtual_value(env, &config, &pool, &token)?;
        total_value = total_value.checked_add(value).ok_or(Error::MathOverflow)?;
    }
    if total_value < 0 {
        return Err(Error::NegativePoolValue);
    }

    let effective = effective_supply(state.total_supply, get_supply_offset(env))
        .ok_or(Error::EffectiveSupplyTooLow)?;
    debug_assert!(effective_supply_above_floor(state.total_supply, effective));

    let unitary = if effective == 0 {
        state.unitary_value
    } else {
        unitary_value(env, total_value, effective, config.decimals).ok_or(Error::MathOverflow)?
    };

    Ok(NavData {
        total_value,
        total_supply: state.total_supply,
        effective_supply: effective,
        unitary_value: unitary,
    })
}

/// Recompute NAV and persist the unitary value
pub fn update_unitary_value(env: &Env) -> Result<NavData, Error> {
    let nav = compute_nav(env)?;
    let mut state = get_state(env);
    if state.unitary_value != nav.unitary_value {
        state.unitary_value = nav.unitary_value;
        set_state(env, &state);
        log!(env, "nav updated", nav.unitary_value, nav.total_value);
        env.events().publish(
            (Symbol::new(env, "nav_updated"),),
            (nav.unitary_value, nav.total_value, nav.effective_supply),
        );
    }
    debug_assert!(nav_non_negative(&nav));
    Ok(nav)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::testutils::{PoolFixture, RATE_SCALE};

    #[test]
    fn test_initial_nav_is_one_unit() {
        let fx = PoolFixture::new();
        let nav = fx.pool.get_nav_data_view();
        assert_eq!(nav.unitary_value, 10_000_000);
        assert_eq!(nav.total_supply, 0);
        assert_eq!(nav.effective_supply, 0);
    }

    #[test]
    fn test_view_and_update_agree() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(3 * RATE_SCALE);
        fx.seed_shares(1_000_0000000);
        fx.activate(&token);
        fx.mint(&token, &fx.pool.address, 77_1234567);

        let view = fx.pool.get_nav_data_view();
        let updated = fx.pool.update_unitary_value();
        assert_eq!(view, updated);
        assert_eq!(fx.pool.get_state().unitary_value, view.unitary_value);
        assert_eq!(fx.pool.get_nav_data_view(), view);
    }

    #[test]
    fn test_view_does_not_write() {
        let fx = PoolFixture::new();
        fx.seed_shares(100_0000000);
        fx.mint(&fx.base_token, &fx.pool.address, 100_0000000);

        let stored = fx.pool.get_state().unitary_value;
        let view = fx.pool.get_nav_data_view();
        assert_eq!(view.unitary_value, 2 * stored);
        assert_eq!(fx.pool.get_state().unitary_value, stored);
    }

    #[test]
    fn test_offsets_count_toward_value() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.seed_shares(100_0000000);
        fx.activate(&token);

        fx.set_offset(&token, 100_0000000);
        assert_eq!(fx.pool.get_nav_data_view().total_value, 200_0000000);

        fx.set_offset(&token, -50_0000000);
        assert_eq!(fx.pool.get_nav_data_view().total_value, 50_0000000);
    }

    #[test]
    fn test_negative_total_value_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.seed_shares(100_0000000);
        fx.activate(&token);
        fx.set_offset(&token, -200_0000000);

        assert_eq!(
            fx.pool.try_get_nav_data_view(),
            Err(Ok(Error::NegativePoolValue))
        );
        assert_eq!(
            fx.pool.try_update_unitary_value(),
            Err(Ok(Error::NegativePoolValue))
        );
    }

    #[test]
    fn test_supply_offset_changes_effective_supply() {
        let fx = PoolFixture::new();
        fx.seed_shares(100_0000000);

        fx.set_supply_offset(100_0000000);
        let nav = fx.pool.get_nav_data_view();
        assert_eq!(nav.effective_supply, 200_0000000);
        assert_eq!(nav.unitary_value, 5_000_000);

        fx.set_supply_offset(-95_0000000);
        assert_eq!(
            fx.pool.try_get_nav_data_view(),
            Err(Ok(Error::EffectiveSupplyTooLow))
        );
    }

    #[test]
    fn test_inactive_tokens_are_not_valued() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.seed_shares(100_0000000);
        fx.mint(&token, &fx.pool.address, 1_000_0000000);

        assert_eq!(fx.pool.get_nav_data_view().total_value, 100_0000000);
    }
}

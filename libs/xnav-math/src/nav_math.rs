use crate::full_math::mul_div_amount;
use soroban_fixed_point_math::FixedPoint;
use soroban_sdk::Env;
use xnav_types::{BPS_DENOMINATOR, MINIMUM_SUPPLY_RATIO_BPS};

/// Rescale a unitary value from `source_decimals` to `dest_decimals`.
///
/// Upscaling multiplies by `10^(dest - source)`. Downscaling divides and
/// truncates toward zero: the dropped digits are lost, never rounded.
/// Returns `None` when the factor or the product leaves i128.
pub fn normalize_nav(nav: i128, source_decimals: u32, dest_decimals: u32) -> Option<i128> {
    if dest_decimals >= source_decimals {
        let factor = 10i128.checked_pow(dest_decimals - source_decimals)?;
        nav.checked_mul(factor)
    } else {
        let factor = 10i128.checked_pow(source_decimals - dest_decimals)?;
        Some(nav / factor)
    }
}

/// True when `observed` is within `tolerance_bps` of `expected`:
/// `|observed - expected| <= expected * tolerance_bps / 10_000`
pub fn within_tolerance(observed: i128, expected: i128, tolerance_bps: u32) -> bool {
    if observed < 0 || expected < 0 {
        return false;
    }
    let allowed = match expected.fixed_mul_floor(tolerance_bps as i128, BPS_DENOMINATOR) {
        Some(allowed) => allowed,
        None => return false,
    };
    match observed.checked_sub(expected) {
        Some(diff) => diff.checked_abs().map_or(false, |d| d <= allowed),
        None => false,
    }
}

/// Total supply adjusted by the supply offset.
///
/// Returns `None` on overflow, when the result is negative, or when a
/// negative offset pushes it below `MINIMUM_SUPPLY_RATIO_BPS` of total
/// supply.
pub fn effective_supply(total_supply: i128, supply_offset: i128) -> Option<i128> {
    let effective = total_supply.checked_add(supply_offset)?;
    if effective < 0 {
        return None;
    }
    if supply_offset < 0 {
        let floor = total_supply.fixed_mul_ceil(MINIMUM_SUPPLY_RATIO_BPS, BPS_DENOMINATOR)?;
        if effective < floor {
            return None;
        }
    }
    Some(effective)
}

/// One unit of `decimals` precision, i.e. `10^decimals`
pub fn decimals_unit(decimals: u32) -> Option<i128> {
    10i128.checked_pow(decimals)
}

/// Value of one share: `total_value * 10^decimals / effective_supply`
pub fn unitary_value(
    env: &Env,
    total_value: i128,
    effective_supply: i128,
    decimals: u32,
) -> Option<i128> {
    mul_div_amount(env, total_value, decimals_unit(decimals)?, effective_supply)
}

/// Shares minted for `amount` base units at `unitary_value`
pub fn shares_for_amount(env: &Env, amount: i128, unitary_value: i128, decimals: u32) -> Option<i128> {
    mul_div_amount(env, amount, decimals_unit(decimals)?, unitary_value)
}

/// Base units paid out for `shares` at `unitary_value`
pub fn amount_for_shares(env: &Env, shares: i128, unitary_value: i128, decimals: u32) -> Option<i128> {
    mul_div_amount(env, shares, unitary_value, decimals_unit(decimals)?)
}

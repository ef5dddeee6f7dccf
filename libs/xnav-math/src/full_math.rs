use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    checked_mul_div(env, a, b, denominator).expect("U256 overflow when converting to u128")
}

/// `mul_div` that reports an out-of-range result instead of panicking
pub fn checked_mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    product.div(&U256::from_u128(env, denominator)).to_u128()
}

/// Signed-amount flavour of `checked_mul_div`.
///
/// Token amounts are `i128` on Soroban; negative operands and a non-positive
/// denominator have no meaning here and yield `None`.
pub fn mul_div_amount(env: &Env, a: i128, b: i128, denominator: i128) -> Option<i128> {
    if a < 0 || b < 0 || denominator <= 0 {
        return None;
    }
    let result = checked_mul_div(env, a as u128, b as u128, denominator as u128)?;
    i128::try_from(result).ok()
}

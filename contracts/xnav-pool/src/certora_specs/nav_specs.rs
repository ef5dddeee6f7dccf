// ============================================================================
// NAV MATH SPECIFICATIONS
// ============================================================================
//
// KEY INVARIANTS:
// 1. Normalization to more decimals is exact and reversible
// 2. The tolerance band is symmetric and contains its center
// 3. Effective supply never drops below its floor when a negative offset
//    applies
//
// ============================================================================

#[cfg(feature = "certora")]
use cvlr_soroban_derive::rule;

#[cfg(feature = "certora")]
use cvlr::asserts::{cvlr_assert, cvlr_assume};

/// RULE: Upscaling then downscaling returns the original NAV
#[cfg(feature = "certora")]
#[rule]
pub fn normalize_round_trip(nav: i128, decimals: u32) {
    cvlr_assume!(nav >= 0);
    cvlr_assume!(decimals <= 18);
    if let Some(up) = xnav_math::normalize_nav(nav, decimals, 18) {
        cvlr_assert!(xnav_math::normalize_nav(up, 18, decimals) == Some(nav));
    }
}

/// RULE: The expected value is always inside its own band
#[cfg(feature = "certora")]
#[rule]
pub fn tolerance_contains_center(expected: i128, tolerance: u32) {
    cvlr_assume!(expected >= 0);
    cvlr_assume!(expected <= i128::MAX / 10_000);
    cvlr_assume!(tolerance <= 10_000);
    cvlr_assert!(xnav_math::within_tolerance(expected, expected, tolerance));
}

/// RULE: Effective supply respects the floor whenever it is defined
#[cfg(feature = "certora")]
#[rule]
pub fn effective_supply_floor(total: i128, offset: i128) {
    cvlr_assume!(total >= 0 && total <= i128::MAX / 10_000);
    cvlr_assume!(offset < 0);
    if let Some(effective) = xnav_math::effective_supply(total, offset) {
        cvlr_assert!(crate::invariants::effective_supply_above_floor(total, effective));
    }
}

// ============================================================================
// TESTS (run with cargo test)
// ============================================================================

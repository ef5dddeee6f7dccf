// ============================================================================
// INVARIANTS MODULE - For Formal Verification
// ============================================================================
//
// Pure predicates over pool accounting. They back the debug assertions in
// the ledger, donation and NAV code paths and are reused by the rules in
// `certora_specs`.
//
// INVARIANT CATEGORIES:
//
// 1. DONATION INVARIANTS
//    - A claim never exceeds the observed balance increase
//    - A completed donation leaves no lock entry behind
//
// 2. OFFSET INVARIANTS
//    - Transfer legs move the offset by exactly the bridged amount
//    - A loss acknowledgement only shrinks a positive offset
//
// 3. NAV INVARIANTS
//    - Reported value, supply and unitary value are non-negative
//    - Effective supply stays above its floor
//
// ============================================================================

use xnav_types::{NavData, BPS_DENOMINATOR, MINIMUM_SUPPLY_RATIO_BPS};

// ============================================================================
// DONATION INVARIANTS
// ============================================================================

/// Invariant: credited amount is bounded by what arrived
///
/// Property:
///   0 <= claimed <= balance_after - snapshot
pub fn claim_within_delivery(claimed: i128, delivered: i128) -> bool {
    claimed >= 0 && claimed <= delivered
}

/// Invariant: a released lock leaves nothing behind
///
/// Property:
///   !locked && !initialized(token) && no entry for token
pub fn lock_fully_cleared(locked: bool, token_initialized: bool, entries_cleared: bool) -> bool {
    !locked && !token_initialized && entries_cleared
}

// ============================================================================
// OFFSET INVARIANTS
// ============================================================================

/// Invariant: one Transfer leg moves the offset by exactly `amount`
///
/// Property:
///   outbound: after == before + amount
///   inbound:  after == before - amount
pub fn transfer_offset_delta(before: i128, after: i128, amount: i128, outbound: bool) -> bool {
    let expected = if outbound {
        before.checked_add(amount)
    } else {
        before.checked_sub(amount)
    };
    expected == Some(after)
}

/// Invariant: the two legs of a Transfer cancel out
///
/// Property:
///   source_delta + destination_delta == 0
pub fn transfer_legs_net_out(source_delta: i128, destination_delta: i128) -> bool {
    source_delta.checked_add(destination_delta) == Some(0)
}

/// Invariant: a loss acknowledgement stays inside the positive offset
///
/// Property:
///   0 < amount <= offset
pub fn loss_reduction_valid(offset: i128, amount: i128) -> bool {
    amount > 0 && amount <= offset
}

// ============================================================================
// NAV INVARIANTS
// ============================================================================

/// Invariant: a successfully computed NAV is never negative
pub fn nav_non_negative(nav: &NavData) -> bool {
    nav.total_value >= 0 && nav.effective_supply >= 0 && nav.unitary_value >= 0
}

/// Invariant: effective supply respects the minimum ratio
///
/// Property:
///   effective * 10_000 >= total * MINIMUM_SUPPLY_RATIO_BPS
pub fn effective_supply_above_floor(total_supply: i128, effective_supply: i128) -> bool {
    match (
        effective_supply.checked_mul(BPS_DENOMINATOR),
        total_supply.checked_mul(MINIMUM_SUPPLY_RATIO_BPS),
    ) {
        (Some(lhs), Some(rhs)) => lhs >= rhs,
        _ => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================

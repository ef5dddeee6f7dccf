// ============================================================================
// CERTORA SUNBEAM FORMAL VERIFICATION SPECIFICATIONS
// ============================================================================
//
// Formal verification rules for the cross-chain NAV pool.
//
// STRUCTURE:
//
// - model.rs         : Ledger snapshots
// - ledger_specs.rs  : Offset ledger mutations
// - donation_specs.rs: Two-phase donation lock and claim bounds
// - nav_specs.rs     : NAV math (normalization, tolerance, supply floor)
//
// PATTERNS USED:
//
// 1. Arbitrary second token - Frame rules: a mutation of one token leaves
//    every other token's offset alone
// 2. State snapshots - Before/after comparisons
// 3. Sanity rules - Ensure rules aren't vacuously true
//
// USAGE:
// - Unit tests: cargo test -p xnav-pool
// - Certora build: cargo build --features certora -p xnav-pool
// - Verification: certoraSorobanProver xnav_pool.conf
//
// ============================================================================

#[cfg(feature = "certora")]
pub mod model;

pub mod donation_specs;
pub mod ledger_specs;
pub mod nav_specs;

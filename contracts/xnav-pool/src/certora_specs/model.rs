// ============================================================================
// STATE SNAPSHOT HELPERS
// ============================================================================

use soroban_sdk::{Address, Env};

/// Ledger entries of one token for before/after comparisons
#[derive(Clone)]
pub struct LedgerSnapshot {
    pub token_offset: i128,
    pub supply_offset: i128,
    pub locked: bool,
}

impl LedgerSnapshot {
    pub fn capture(env: &Env, token: &Address) -> Self {
        Self {
            token_offset: crate::ledger::get_token_offset(env, token),
            supply_offset: crate::ledger::get_supply_offset(env),
            locked: crate::storage::is_donation_locked(env),
        }
    }
}

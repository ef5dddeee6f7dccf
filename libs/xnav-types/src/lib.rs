#![no_std]

mod bridge;
mod message;
mod pool;

pub use bridge::*;
pub use message::*;
pub use pool::*;

use soroban_sdk::{BytesN, Env};

/// Claimed amount that marks the first phase of a donation.
/// A real delivery of exactly one unit can never be claimed in phase two.
pub const SENTINEL_INIT: i128 = 1;

/// Basis points denominator (100% = 10_000)
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Largest tolerance accepted on an outbound message (100%)
pub const MAX_NAV_TOLERANCE_BPS: u32 = 10_000;

/// Effective supply may not drop below this share of total supply (10%)
pub const MINIMUM_SUPPLY_RATIO_BPS: i128 = 1_000;

/// Upper bound of the active token set.
/// NAV reads one balance and one offset entry per active token, so the set
/// must stay well inside Soroban's 100 read entries per transaction.
pub const MAX_ACTIVE_TOKENS: u32 = 32;

/// Deployment salt of the escrow serving `op_type`.
///
/// The escrow address is derived from (deployer, salt), so anyone who knows
/// the pool address can compute where the escrow lives before it exists.
pub fn escrow_salt(env: &Env, op_type: OpType) -> BytesN<32> {
    let mut salt_bytes = [0u8; 32];
    salt_bytes[0..6].copy_from_slice(b"escrow");
    salt_bytes[28..32].copy_from_slice(&(op_type as u32).to_be_bytes());
    BytesN::from_array(env, &salt_bytes)
}

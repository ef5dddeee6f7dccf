use crate::donation::require_no_donation;
use crate::effects::{activate_if_priced, resolve_delivered_token};
use crate::error::Error;
use crate::ledger::debit_inbound;
use crate::nav::update_unitary_value;
use crate::oracle::has_price_feed;
use crate::storage::{get_config, is_cross_chain_token};
use soroban_sdk::{log, Address, Bytes, Env, Symbol};
use xnav_math::{normalize_nav, within_tolerance};
use xnav_types::{DestinationMessage, OpType, BPS_DENOMINATOR};

/// Process tokens and a message delivered by the bridge.
///
/// Only the configured bridge may call. Every check runs before the first
/// write, so a rejected message leaves the ledger untouched.
pub fn handle_message(
    env: &Env,
    caller: Address,
    token: Address,
    amount: i128,
    message: Bytes,
) -> Result<(), Error> {
    let config = get_config(env);
    if caller != config.bridge {
        return Err(Error::UnauthorizedCaller);
    }
    caller.require_auth();
    require_no_donation(env)?;

    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }

    let msg = DestinationMessage::decode(env, &message).ok_or(Error::InvalidMessage)?;
    if msg.op_type == OpType::Invalid {
        return Err(Error::InvalidOpType);
    }

    if msg.nav_tolerance > 0 && msg.source_amount > 0 {
        check_source_amount(amount, msg.source_amount, msg.nav_tolerance)?;
    }

    let token = resolve_delivered_token(env, &config, &token, amount, msg.should_unwrap);

    if !is_cross_chain_token(env, &token) {
        return Err(Error::UnsupportedCrossChainToken);
    }
    if !has_price_feed(env, &config, &token) {
        return Err(Error::TokenWithoutPriceFeed);
    }

    match msg.op_type {
        OpType::Transfer => {
            debit_inbound(env, &token, amount)?;
        }
        OpType::Rebalance | OpType::Sync => {}
        OpType::Invalid => return Err(Error::InvalidOpType),
    }

    activate_if_priced(env, &config, &token)?;

    if msg.op_type == OpType::Rebalance && msg.source_nav > 0 && msg.nav_tolerance > 0 {
        let expected = normalize_nav(msg.source_nav, msg.source_decimals, config.decimals)
            .ok_or(Error::MathOverflow)?;
        let nav = update_unitary_value(env)?;
        if !within_tolerance(nav.unitary_value, expected, msg.nav_tolerance) {
            return Err(Error::NavDeviationTooHigh);
        }
    }

    log!(env, "message handled", token, amount, msg.source_chain_id);
    env.events().publish(
        (Symbol::new(env, "message_handled"), msg.source_chain_id),
        (token, amount, msg.op_type),
    );
    Ok(())
}

/// Delivered amount must match the amount that left the source chain
/// within `tolerance_bps`, which absorbs bridge fees
fn check_source_amount(amount: i128, source_amount: i128, tolerance_bps: u32) -> Result<(), Error> {
    let diff = amount
        .checked_sub(source_amount)
        .and_then(|d| d.checked_abs())
        .ok_or(Error::MathOverflow)?;
    let lhs = diff.checked_mul(BPS_DENOMINATOR).ok_or(Error::MathOverflow)?;
    let rhs = source_amount
        .checked_mul(tolerance_bps as i128)
        .ok_or(Error::MathOverflow)?;
    if lhs > rhs {
        return Err(Error::SourceAmountMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::check_source_amount;
    use crate::error::Error;
    use crate::testutils::{PoolFixture, RATE_SCALE};
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::{Address, Bytes};
    use xnav_types::{DestinationMessage, OpType, PoolState};

    fn message(op_type: OpType) -> DestinationMessage {
        DestinationMessage {
            op_type,
            source_chain_id: 42161,
            source_nav: 0,
            source_decimals: 7,
            nav_tolerance: 0,
            should_unwrap: false,
            source_amount: 0,
        }
    }

    #[test]
    fn test_check_source_amount_band() {
        // 1% band around 10_000
        assert_eq!(check_source_amount(10_000, 10_000, 100), Ok(()));
        assert_eq!(check_source_amount(9_900, 10_000, 100), Ok(()));
        assert_eq!(check_source_amount(10_100, 10_000, 100), Ok(()));
        assert_eq!(
            check_source_amount(9_899, 10_000, 100),
            Err(Error::SourceAmountMismatch)
        );
        assert_eq!(
            check_source_amount(10_101, 10_000, 100),
            Err(Error::SourceAmountMismatch)
        );
    }

    #[test]
    fn test_transfer_message_debits_offset() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.seed_shares(100_0000000);
        let nav_before = fx.pool.get_nav_data_view().unitary_value;

        fx.deliver(&token, 50_0000000, &message(OpType::Transfer));

        assert_eq!(fx.pool.get_token_offset(&token), -50_0000000);
        assert!(fx.pool.get_active_tokens().contains(&token));
        assert_eq!(fx.pool.get_nav_data_view().unitary_value, nav_before);
    }

    #[test]
    fn test_sync_message_raises_nav() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.seed_shares(100_0000000);

        fx.deliver(&token, 50_0000000, &message(OpType::Sync));

        assert_eq!(fx.pool.get_token_offset(&token), 0);
        assert_eq!(fx.pool.get_nav_data_view().unitary_value, 15_000_000);
    }

    #[test]
    fn test_only_bridge_may_call() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        let intruder = Address::generate(&fx.env);
        fx.mint(&token, &fx.pool.address, 100);

        let res = fx.pool.try_handle_message(
            &intruder,
            &token,
            &100,
            &message(OpType::Transfer).encode(&fx.env),
        );
        assert_eq!(res, Err(Ok(Error::UnauthorizedCaller)));
        assert_eq!(fx.pool.get_token_offset(&token), 0);
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        let bytes = message(OpType::Transfer).encode(&fx.env);
        for amount in [0i128, -1] {
            let res = fx.pool.try_handle_message(&fx.spoke, &token, &amount, &bytes);
            assert_eq!(res, Err(Ok(Error::InvalidAmount)));
        }
    }

    #[test]
    fn test_malformed_message_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);

        let garbage = Bytes::from_slice(&fx.env, &[1, 2, 3, 4]);
        let res = fx.pool.try_handle_message(&fx.spoke, &token, &10, &garbage);
        assert_eq!(res, Err(Ok(Error::InvalidMessage)));

        let other_shape = {
            use soroban_sdk::xdr::ToXdr;
            PoolState::new(7).to_xdr(&fx.env)
        };
        let res = fx.pool.try_handle_message(&fx.spoke, &token, &10, &other_shape);
        assert_eq!(res, Err(Ok(Error::InvalidMessage)));
    }

    #[test]
    fn test_invalid_op_type_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        let bytes = message(OpType::Invalid).encode(&fx.env);
        let res = fx.pool.try_handle_message(&fx.spoke, &token, &10, &bytes);
        assert_eq!(res, Err(Ok(Error::InvalidOpType)));
    }

    #[test]
    fn test_source_amount_outside_tolerance_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        let mut msg = message(OpType::Transfer);
        msg.nav_tolerance = 50;
        msg.source_amount = 10_000;

        fx.mint(&token, &fx.pool.address, 9_900);
        let res = fx.pool.try_handle_message(&fx.spoke, &token, &9_900, &msg.encode(&fx.env));
        assert_eq!(res, Err(Ok(Error::SourceAmountMismatch)));

        // Within 0.5% of the source amount
        let res = fx.pool.try_handle_message(&fx.spoke, &token, &9_950, &msg.encode(&fx.env));
        assert_eq!(res, Ok(Ok(())));
        assert_eq!(fx.pool.get_token_offset(&token), -9_950);
    }

    #[test]
    fn test_unlisted_token_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_token();
        fx.oracle.set_price(&token, &RATE_SCALE);
        let bytes = message(OpType::Transfer).encode(&fx.env);
        let res = fx.pool.try_handle_message(&fx.spoke, &token, &10, &bytes);
        assert_eq!(res, Err(Ok(Error::UnsupportedCrossChainToken)));
    }

    #[test]
    fn test_unpriced_token_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_token();
        fx.pool.set_cross_chain_token(&token, &true);
        let bytes = message(OpType::Transfer).encode(&fx.env);
        let res = fx.pool.try_handle_message(&fx.spoke, &token, &10, &bytes);
        assert_eq!(res, Err(Ok(Error::TokenWithoutPriceFeed)));
    }

    #[test]
    fn test_base_token_needs_no_price_feed() {
        let fx = PoolFixture::new();
        fx.seed_shares(100_0000000);
        let base = fx.base_token.clone();
        fx.deliver(&base, 10_0000000, &message(OpType::Transfer));
        assert_eq!(fx.pool.get_token_offset(&base), -10_0000000);
        assert!(!fx.pool.get_active_tokens().contains(&base));
    }

    #[test]
    fn test_rebalance_within_nav_tolerance() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.seed_shares(100_0000000);

        // Source reports 1.0 at 18 decimals; pool runs at 7
        let mut msg = message(OpType::Rebalance);
        msg.source_nav = 1_000_000_000_000_000_000;
        msg.source_decimals = 18;
        msg.nav_tolerance = 200;

        fx.deliver(&token, 1_0000000, &msg);
        assert_eq!(fx.pool.get_token_offset(&token), 0);
        assert_eq!(fx.pool.get_state().unitary_value, 10_100_000);
    }

    #[test]
    fn test_rebalance_outside_nav_tolerance_rejected() {
        let fx = PoolFixture::new();
        let token = fx.create_bridged_token(RATE_SCALE);
        fx.seed_shares(100_0000000);

        let mut msg = message(OpType::Rebalance);
        msg.source_nav = 1_000_000;
        msg.source_decimals = 6;
        msg.nav_tolerance = 100;

        fx.mint(&token, &fx.pool.address, 10_0000000);
        let res = fx
            .pool
            .try_handle_message(&fx.spoke, &token, &10_0000000, &msg.encode(&fx.env));
        assert_eq!(res, Err(Ok(Error::NavDeviationTooHigh)));
        assert!(!fx.pool.get_active_tokens().contains(&token));
    }

    #[test]
    fn test_unwrap_credits_native_token() {
        let fx = PoolFixture::new();
        let native = fx.native_token.clone();
        fx.pool.set_cross_chain_token(&native, &true);
        fx.oracle.set_price(&native, &RATE_SCALE);
        fx.seed_shares(100_0000000);

        let mut msg = message(OpType::Transfer);
        msg.should_unwrap = true;
        fx.deliver_wrapped(5_0000000, &msg);

        assert_eq!(fx.pool.get_token_offset(&native), -5_0000000);
        assert_eq!(fx.pool.get_token_offset(&fx.wrapped_native), 0);
        assert_eq!(fx.balance(&native, &fx.pool.address), 5_0000000);
        assert_eq!(fx.balance(&fx.wrapped_native, &fx.pool.address), 0);
    }

    #[test]
    fn test_wrapped_kept_without_unwrap_flag() {
        let fx = PoolFixture::new();
        let wrapped = fx.wrapped_native.clone();
        fx.pool.set_cross_chain_token(&wrapped, &true);
        fx.oracle.set_price(&wrapped, &RATE_SCALE);

        fx.deliver_wrapped(5_0000000, &message(OpType::Transfer));
        assert_eq!(fx.pool.get_token_offset(&wrapped), -5_0000000);
    }
}

use crate::donation::require_no_donation;
use crate::effects::{activate_if_priced, wrap_native};
use crate::error::Error;
use crate::ledger::credit_outbound;
use crate::nav::update_unitary_value;
use crate::oracle::has_price_feed;
use crate::storage::{get_config, is_cross_chain_token};
use soroban_sdk::{log, token, Address, Env, IntoVal, Symbol};
use xnav_types::{
    BridgeTransferParams, DestinationMessage, OpType, PoolConfig, V3Deposit, MAX_NAV_TOLERANCE_BPS,
};

/// Send tokens and a NAV message to another chain through the bridge spoke.
///
/// Runs only on the owner path: `caller` must be the pool owner, who must
/// authorize. For a Transfer the offset is credited before the tokens leave
/// so NAV never sees the value disappear.
pub fn deposit_v3(env: &Env, caller: Address, params: BridgeTransferParams) -> Result<V3Deposit, Error> {
    let config = get_config(env);
    if caller != config.owner {
        return Err(Error::DirectCallNotAllowed);
    }
    caller.require_auth();
    require_no_donation(env)?;

    validate(env, &config, &params)?;
    let op_type = params.message.op_type;

    if params.message.source_native_amount > 0 {
        if let (Some(wrapped), Some(native)) = (&config.wrapped_native, &config.native_token) {
            if *wrapped == params.input_token {
                wrap_native(env, native, wrapped, params.message.source_native_amount);
            }
        }
    }

    let nav = update_unitary_value(env)?;

    if op_type == OpType::Transfer {
        activate_if_priced(env, &config, &params.input_token)?;
        credit_outbound(env, &params.input_token, params.input_amount)?;
    }

    let message = DestinationMessage {
        op_type,
        source_chain_id: config.chain_id,
        source_nav: nav.unitary_value,
        source_decimals: config.decimals,
        nav_tolerance: params.message.nav_tolerance,
        should_unwrap: params.message.should_unwrap_on_destination,
        source_amount: params.input_amount,
    };
    let deposit = V3Deposit {
        recipient: params.recipient,
        input_token: params.input_token.clone(),
        output_token: params.output_token,
        input_amount: params.input_amount,
        output_amount: params.output_amount,
        destination_chain_id: params.destination_chain_id,
        exclusive_relayer: params.exclusive_relayer,
        quote_timestamp: params.quote_timestamp,
        fill_deadline: params.fill_deadline,
        exclusivity_deadline: params.exclusivity_deadline,
        message: message.encode(env),
    };

    let pool = env.current_contract_address();
    token::Client::new(env, &params.input_token).transfer(&pool, &config.bridge, &params.input_amount);
    env.invoke_contract::<()>(
        &config.bridge,
        &Symbol::new(env, "deposit_v3"),
        (pool, deposit.clone()).into_val(env),
    );

    log!(env, "intent sent", params.input_token, params.input_amount, params.destination_chain_id);
    env.events().publish(
        (Symbol::new(env, "intent_sent"), params.destination_chain_id),
        (params.input_token, params.input_amount, op_type, nav.unitary_value),
    );
    Ok(deposit)
}

fn validate(env: &Env, config: &PoolConfig, params: &BridgeTransferParams) -> Result<(), Error> {
    let message = &params.message;
    if message.op_type == OpType::Invalid {
        return Err(Error::InvalidOpType);
    }
    if params.input_amount <= 0 || params.output_amount <= 0 || message.source_native_amount < 0 {
        return Err(Error::InvalidAmount);
    }
    if message.nav_tolerance > MAX_NAV_TOLERANCE_BPS {
        return Err(Error::InvalidTolerance);
    }
    if params.fill_deadline < env.ledger().timestamp() {
        return Err(Error::DeadlineExpired);
    }
    if !is_cross_chain_token(env, &params.input_token) {
        return Err(Error::UnsupportedCrossChainToken);
    }
    if message.op_type == OpType::Transfer && !has_price_feed(env, config, &params.input_token) {
        return Err(Error::TokenWithoutPriceFeed);
    }
    Ok(())
}

use soroban_sdk::{Address, Env, IntoVal, Symbol};
use xnav_types::PoolConfig;

/// True when the oracle can value `token`; the base token always can
pub fn has_price_feed(env: &Env, config: &PoolConfig, token: &Address) -> bool {
    if *token == config.base_token {
        return true;
    }
    env.invoke_contract(
        &config.oracle,
        &Symbol::new(env, "has_price_feed"),
        (token,).into_val(env),
    )
}

/// Value of `amount` of `token` in base token units. `amount` may be
/// negative when an offset outweighs the wallet balance.
pub fn convert_to_base(env: &Env, config: &PoolConfig, token: &Address, amount: i128) -> i128 {
    if *token == config.base_token || amount == 0 {
        return amount;
    }
    env.invoke_contract(
        &config.oracle,
        &Symbol::new(env, "convert_token_amount"),
        (token, amount, &config.base_token).into_val(env),
    )
}

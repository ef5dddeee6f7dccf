use crate::error::Error;
use crate::storage::{get_config, get_escrow, set_escrow};
use soroban_sdk::{log, Address, Env, IntoVal, Symbol};
use xnav_types::{escrow_salt, OpType};

/// Op types that get a refund escrow
fn has_escrow(op_type: OpType) -> bool {
    matches!(op_type, OpType::Transfer | OpType::Sync)
}

/// Address the escrow for `op_type` has, or will have once deployed
pub fn escrow_address(env: &Env, op_type: OpType) -> Result<Address, Error> {
    if !has_escrow(op_type) {
        return Err(Error::InvalidOpType);
    }
    Ok(env
        .deployer()
        .with_current_contract(escrow_salt(env, op_type))
        .deployed_address())
}

/// Deploy the escrow for `op_type` unless it already exists
pub fn deploy_escrow(env: &Env, op_type: OpType) -> Result<Address, Error> {
    if !has_escrow(op_type) {
        return Err(Error::InvalidOpType);
    }
    if let Some(escrow) = get_escrow(env, op_type) {
        return Ok(escrow);
    }

    let config = get_config(env);
    let escrow = env
        .deployer()
        .with_current_contract(escrow_salt(env, op_type))
        .deploy_v2(config.escrow_wasm_hash, ());

    env.invoke_contract::<()>(
        &escrow,
        &Symbol::new(env, "initialize"),
        (env.current_contract_address(), op_type).into_val(env),
    );
    set_escrow(env, op_type, &escrow);

    log!(env, "escrow deployed", escrow, op_type);
    env.events().publish(
        (Symbol::new(env, "escrow_deployed"),),
        (op_type, escrow.clone()),
    );
    Ok(escrow)
}

#[cfg(test)]
mod tests {
    use super::escrow_address;
    use crate::error::Error;
    use crate::storage::{get_escrow, set_escrow};
    use crate::testutils::PoolFixture;
    use soroban_sdk::testutils::Address as _;
    use soroban_sdk::Address;
    use xnav_types::OpType;

    #[test]
    fn test_escrow_addresses_are_stable_and_distinct() {
        let fx = PoolFixture::new();
        let transfer = fx.pool.get_escrow_address(&OpType::Transfer);
        let sync = fx.pool.get_escrow_address(&OpType::Sync);

        assert_eq!(transfer, fx.pool.get_escrow_address(&OpType::Transfer));
        assert_ne!(transfer, sync);
        assert_ne!(transfer, fx.pool.address);
    }

    #[test]
    fn test_escrow_addresses_differ_per_pool() {
        let fx = PoolFixture::new();
        let other = fx.env.register(crate::XnavPool, ());
        let other_escrow = fx
            .env
            .as_contract(&other, || escrow_address(&fx.env, OpType::Transfer))
            .unwrap();
        assert_ne!(fx.pool.get_escrow_address(&OpType::Transfer), other_escrow);
    }

    #[test]
    fn test_no_escrow_for_other_op_types() {
        let fx = PoolFixture::new();
        for op_type in [OpType::Invalid, OpType::Rebalance] {
            assert_eq!(
                fx.pool.try_get_escrow_address(&op_type),
                Err(Ok(Error::InvalidOpType))
            );
            assert_eq!(
                fx.pool.try_deploy_escrow(&op_type),
                Err(Ok(Error::InvalidOpType))
            );
        }
    }

    #[test]
    fn test_deploy_returns_existing_escrow() {
        let fx = PoolFixture::new();
        let existing = Address::generate(&fx.env);
        fx.env.as_contract(&fx.pool.address, || {
            set_escrow(&fx.env, OpType::Transfer, &existing);
        });

        // The stored address comes back without another deployment
        assert_eq!(fx.pool.deploy_escrow(&OpType::Transfer), existing);
        assert_eq!(fx.pool.deploy_escrow(&OpType::Transfer), existing);

        let sync = fx
            .env
            .as_contract(&fx.pool.address, || get_escrow(&fx.env, OpType::Sync));
        assert_eq!(sync, None);
    }
}

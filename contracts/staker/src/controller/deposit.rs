use meridian::{
    error::{ErrorCode, MeridianResult},
    validate,
};
use soroban_sdk::{Address, Env, Vec};

use crate::{
    controller::stake::{ensure_owner, load_deposit, stake_token},
    interfaces::position_manager::PositionManagerClient,
    storage::{get_deposit, remove_deposit, save_deposit, Config, Deposit, IncentiveKey, Stake},
};

/// Takes custody of a position token and stakes it into each of `incentives`. Returns the
/// deposit along with the opened stakes, in the order of `incentives`.
pub fn deposit_token(
    env: &Env,
    config: &Config,
    owner: &Address,
    token_id: u128,
    incentives: &Vec<IncentiveKey>,
) -> MeridianResult<(Deposit, Vec<Stake>)> {
    validate!(
        env,
        get_deposit(env, token_id).is_none(),
        ErrorCode::DepositAlreadyExists,
        "Staker: Deposit: token {} already deposited",
        token_id
    )?;

    let position_manager = PositionManagerClient::new(env, &config.position_manager);
    let position = position_manager.positions(&token_id);

    let mut deposit = Deposit {
        owner: owner.clone(),
        number_of_stakes: 0,
        tick_lower: position.tick_lower,
        tick_upper: position.tick_upper,
    };
    save_deposit(env, token_id, &deposit);

    let mut stakes = Vec::new(env);
    for key in incentives.iter() {
        stakes.push_back(stake_token(env, config, &key, token_id, &mut deposit)?);
    }

    position_manager.transfer(owner, &env.current_contract_address(), &token_id);

    Ok((deposit, stakes))
}

/// Releases custody of an unstaked token to `to`.
pub fn withdraw_token(
    env: &Env,
    config: &Config,
    sender: &Address,
    token_id: u128,
    to: &Address,
) -> MeridianResult {
    let deposit = load_deposit(env, token_id)?;
    ensure_owner(env, &deposit, sender)?;
    validate!(
        env,
        deposit.number_of_stakes == 0,
        ErrorCode::DepositHasStakes,
        "Staker: Withdraw: token {} still has {} stakes",
        token_id,
        deposit.number_of_stakes
    )?;

    remove_deposit(env, token_id);

    PositionManagerClient::new(env, &config.position_manager).transfer(
        &env.current_contract_address(),
        to,
        &token_id,
    );

    Ok(())
}

pub fn transfer_deposit(
    env: &Env,
    sender: &Address,
    token_id: u128,
    new_owner: &Address,
) -> MeridianResult<Deposit> {
    let mut deposit = load_deposit(env, token_id)?;
    ensure_owner(env, &deposit, sender)?;

    deposit.owner = new_owner.clone();
    save_deposit(env, token_id, &deposit);

    Ok(deposit)
}

use meridian::{
    error::{ErrorCode, MeridianResult},
    math::{
        bn::{HostU256Ext, U256},
        casting::Cast,
        safe_math::SafeMath,
    },
    safe_decrement, safe_increment, validate,
};
use soroban_sdk::{log, token, Address, BytesN, Env};

use crate::{
    controller::incentive::{load_incentive, scheduled_end_time},
    indexed_set::staked_tokens,
    interfaces::{
        position_manager::PositionManagerClient,
        snapshot_source::{seconds_per_liquidity_inside, PoolOracle},
    },
    math::reward::{compute_reward, seconds_inside_x128, RewardInputs},
    storage::{
        get_deposit, get_reward_accounting, get_snapshot_or_empty, get_stake, get_unstaked_seconds,
        remove_stake, save_deposit, save_incentive, save_reward_accounting, save_stake,
        save_unstaked_seconds, Config, Deposit, Incentive, IncentiveKey, RewardInfo, Stake,
    },
};

pub fn load_deposit(env: &Env, token_id: u128) -> MeridianResult<Deposit> {
    get_deposit(env, token_id).ok_or_else(|| {
        log!(env, "Staker: token {} not deposited", token_id);
        ErrorCode::DepositNotFound
    })
}

fn load_stake(env: &Env, incentive_id: &BytesN<32>, token_id: u128) -> MeridianResult<Stake> {
    get_stake(env, incentive_id, token_id).ok_or_else(|| {
        log!(env, "Staker: token {} not staked", token_id);
        ErrorCode::StakeNotFound
    })
}

pub fn ensure_owner(env: &Env, deposit: &Deposit, sender: &Address) -> MeridianResult {
    validate!(
        env,
        deposit.owner == *sender,
        ErrorCode::NotDepositOwner,
        "Staker: sender does not own the deposit"
    )
}

/// Stakes a deposited token into an incentive. The caller has already checked ownership.
pub fn stake_token(
    env: &Env,
    config: &Config,
    key: &IncentiveKey,
    token_id: u128,
    deposit: &mut Deposit,
) -> MeridianResult<Stake> {
    let incentive_id = key.id(env);
    let mut incentive = load_incentive(env, &incentive_id)?;
    let now = env.ledger().timestamp();
    let end_time = scheduled_end_time(env, &incentive_id, &incentive);

    validate!(
        env,
        key.start_time <= now && now < end_time,
        ErrorCode::IncentiveNotActive,
        "Staker: Stake: incentive active from {} until {}",
        key.start_time,
        end_time
    )?;
    validate!(
        env,
        get_stake(env, &incentive_id, token_id).is_none(),
        ErrorCode::StakeAlreadyExists,
        "Staker: Stake: token {} already staked",
        token_id
    )?;

    let position = PositionManagerClient::new(env, &config.position_manager).positions(&token_id);
    validate!(
        env,
        position.pool == key.pool,
        ErrorCode::PoolMismatch,
        "Staker: Stake: token {} belongs to another pool",
        token_id
    )?;
    validate!(
        env,
        key.accepts_range(position.tick_lower, position.tick_upper),
        ErrorCode::TickRangeMismatch,
        "Staker: Stake: range {} {} not accepted",
        position.tick_lower,
        position.tick_upper
    )?;
    validate!(
        env,
        position.liquidity > 0,
        ErrorCode::ZeroLiquidity
    )?;

    let initial = seconds_per_liquidity_inside(
        env,
        &PoolOracle::new(env, &key.pool),
        position.tick_lower,
        position.tick_upper,
    )?;

    let mut staked = staked_tokens(env, &incentive_id);
    staked.add(token_id)?;
    incentive.number_of_stakes = staked.len();
    safe_increment!(env, deposit.number_of_stakes, 1);

    let stake = Stake {
        liquidity: position.liquidity,
        claimed_reward: 0,
        initial_secs_per_liq_x128: initial,
        stake_time: now,
        last_update_time_on_stake: incentive.last_update_time,
        cumulative_reward_on_stake: incentive.cumulative_reward,
    };

    save_stake(env, &incentive_id, token_id, &stake);
    save_incentive(env, &incentive_id, &incentive);
    save_deposit(env, token_id, deposit);

    Ok(stake)
}

/// Reward a stake could collect right now, capped at what is left of the incentive's funds,
/// along with the liquidity-seconds it has spent in range.
fn pending_reward(
    env: &Env,
    key: &IncentiveKey,
    incentive_id: &BytesN<32>,
    incentive: &Incentive,
    deposit: &Deposit,
    stake: &Stake,
) -> MeridianResult<(u128, U256)> {
    let current = seconds_per_liquidity_inside(
        env,
        &PoolOracle::new(env, &key.pool),
        deposit.tick_lower,
        deposit.tick_upper,
    )?
    .to_bn();
    let initial = stake.initial_secs_per_liq_x128.to_bn();

    let latest = get_snapshot_or_empty(env, incentive_id, incentive.last_update_time);
    let anchor = get_snapshot_or_empty(env, incentive_id, stake.last_update_time_on_stake);
    let total = latest.total_seconds_inside_x128.to_bn();
    let total_at_stake = anchor.total_seconds_inside_x128.to_bn();

    let (reward, seconds) =
        if incentive.last_update_time >= stake.stake_time && total == total_at_stake {
            (0, seconds_inside_x128(env, initial, current, stake.liquidity)?)
        } else {
            compute_reward(
                env,
                &RewardInputs {
                    incentive_cumulative_reward: incentive.cumulative_reward,
                    incentive_cumulative_reward_at_stake: stake.cumulative_reward_on_stake,
                    incentive_total_seconds_inside_x128: total,
                    incentive_total_seconds_inside_at_stake_x128: total_at_stake,
                    incentive_last_update_time: incentive.last_update_time,
                    stake_time: stake.stake_time,
                    liquidity: stake.liquidity,
                    initial_seconds_per_liquidity_inside_x128: initial,
                    current_seconds_per_liquidity_inside_x128: current,
                    claimed_reward: stake.claimed_reward,
                },
            )?
        };

    let accounting = get_reward_accounting(env, incentive_id);
    let available = accounting
        .added_rewards
        .safe_sub(accounting.claimed_rewards, env)?;
    if reward > available {
        log!(env, "Staker: reward {} capped at {}", reward, available);
        return Ok((available, seconds));
    }

    Ok((reward, seconds))
}

fn record_claim(env: &Env, incentive_id: &BytesN<32>, reward: u128) -> MeridianResult {
    if reward == 0 {
        return Ok(());
    }
    let mut accounting = get_reward_accounting(env, incentive_id);
    accounting.claimed_rewards = accounting.claimed_rewards.safe_add(reward, env)?;
    save_reward_accounting(env, incentive_id, &accounting);
    Ok(())
}

fn pay(env: &Env, key: &IncentiveKey, to: &Address, reward: u128) -> MeridianResult {
    if reward > 0 {
        token::Client::new(env, &key.reward_token).transfer(
            &env.current_contract_address(),
            to,
            &reward.cast::<i128>(env)?,
        );
    }
    Ok(())
}

/// Closes a stake, paying its final reward to the deposit owner. Returns the reward paid.
pub fn unstake_token(
    env: &Env,
    sender: &Address,
    key: &IncentiveKey,
    token_id: u128,
) -> MeridianResult<u128> {
    let incentive_id = key.id(env);
    let mut incentive = load_incentive(env, &incentive_id)?;
    let mut deposit = load_deposit(env, token_id)?;
    let stake = load_stake(env, &incentive_id, token_id)?;
    let now = env.ledger().timestamp();

    if now < scheduled_end_time(env, &incentive_id, &incentive) {
        ensure_owner(env, &deposit, sender)?;
    }
    validate!(
        env,
        now >= stake.stake_time.safe_add(key.lock_time, env)?,
        ErrorCode::TokenLocked,
        "Staker: Unstake: token {} locked until {}",
        token_id,
        stake.stake_time.saturating_add(key.lock_time)
    )?;

    let (reward, seconds) = pending_reward(env, key, &incentive_id, &incentive, &deposit, &stake)?;

    let unstaked = get_unstaked_seconds(env, &incentive_id)
        .to_bn()
        .safe_add(seconds, env)?;
    save_unstaked_seconds(env, &incentive_id, &unstaked.to_host(env));

    let mut staked = staked_tokens(env, &incentive_id);
    staked.remove(token_id)?;
    incentive.number_of_stakes = staked.len();
    safe_decrement!(env, deposit.number_of_stakes, 1);

    remove_stake(env, &incentive_id, token_id);
    save_incentive(env, &incentive_id, &incentive);
    save_deposit(env, token_id, &deposit);
    record_claim(env, &incentive_id, reward)?;

    pay(env, key, &deposit.owner, reward)?;

    Ok(reward)
}

/// Pays out what a stake has earned so far without closing it. Returns the reward paid.
pub fn collect_reward(
    env: &Env,
    sender: &Address,
    key: &IncentiveKey,
    token_id: u128,
) -> MeridianResult<u128> {
    let incentive_id = key.id(env);
    let incentive = load_incentive(env, &incentive_id)?;
    let deposit = load_deposit(env, token_id)?;
    ensure_owner(env, &deposit, sender)?;
    let mut stake = load_stake(env, &incentive_id, token_id)?;

    let (reward, _) = pending_reward(env, key, &incentive_id, &incentive, &deposit, &stake)?;

    stake.claimed_reward = stake.claimed_reward.safe_add(reward, env)?;
    save_stake(env, &incentive_id, token_id, &stake);
    record_claim(env, &incentive_id, reward)?;

    pay(env, key, &deposit.owner, reward)?;

    Ok(reward)
}

pub fn reward_info(env: &Env, key: &IncentiveKey, token_id: u128) -> MeridianResult<RewardInfo> {
    let incentive_id = key.id(env);
    let incentive = load_incentive(env, &incentive_id)?;
    let deposit = load_deposit(env, token_id)?;
    let stake = load_stake(env, &incentive_id, token_id)?;

    let (reward, seconds) = pending_reward(env, key, &incentive_id, &incentive, &deposit, &stake)?;

    Ok(RewardInfo {
        reward,
        seconds_inside_x128: seconds.to_host(env),
    })
}

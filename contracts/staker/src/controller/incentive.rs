use meridian::{
    error::{ErrorCode, MeridianResult},
    math::{bn::HostU256Ext, casting::Cast, safe_math::SafeMath},
    validate,
};
use soroban_sdk::{log, token, Address, BytesN, Env, U256};

use crate::{
    constants::CUMULATIVE_REWARD_UNIT,
    storage::{
        erase_incentive, get_incentive, get_period, get_reward_accounting, get_snapshot_or_empty,
        save_incentive, save_period, save_reward_accounting, save_snapshot, Config,
        DistributionSnapshot, Incentive, IncentiveKey, Period,
    },
};

pub fn load_incentive(env: &Env, incentive_id: &BytesN<32>) -> MeridianResult<Incentive> {
    get_incentive(env, incentive_id).ok_or_else(|| {
        log!(env, "Staker: incentive not found");
        ErrorCode::IncentiveNotFound
    })
}

fn load_period(env: &Env, incentive_id: &BytesN<32>, period_id: u32) -> MeridianResult<Period> {
    get_period(env, incentive_id, period_id).ok_or_else(|| {
        log!(env, "Staker: period {} not registered", period_id);
        ErrorCode::InvalidPeriodId
    })
}

/// End of the last registered period. A period registered after the active one counts even
/// before an update has rolled the incentive into it.
pub fn scheduled_end_time(env: &Env, incentive_id: &BytesN<32>, incentive: &Incentive) -> u64 {
    incentive
        .current_period_id
        .checked_add(1)
        .and_then(|next_period_id| get_period(env, incentive_id, next_period_id))
        .map_or(incentive.end_time, |period| period.end_time)
}

fn reward_per_second(env: &Env, reward: u128, duration: u64) -> MeridianResult<u128> {
    reward.safe_div(duration.cast::<u128>(env)?, env)
}

pub fn create_incentive(
    env: &Env,
    config: &Config,
    funder: &Address,
    key: &IncentiveKey,
    duration: u64,
    reward: u128,
) -> MeridianResult<BytesN<32>> {
    let now = env.ledger().timestamp();

    validate!(env, reward > 0, ErrorCode::ZeroReward, "Staker: Create: zero reward")?;
    validate!(env, duration > 0, ErrorCode::ZeroDuration, "Staker: Create: zero duration")?;
    validate!(
        env,
        key.start_time >= now,
        ErrorCode::StartTimeInPast,
        "Staker: Create: start time {} before now {}",
        key.start_time,
        now
    )?;
    validate!(
        env,
        key.start_time - now <= config.max_incentive_start_lead_time,
        ErrorCode::StartTimeTooFarInFuture
    )?;
    validate!(
        env,
        duration <= config.max_incentive_duration,
        ErrorCode::DurationTooLong
    )?;
    validate!(
        env,
        key.lock_time <= config.max_lock_time,
        ErrorCode::LockTimeTooLong
    )?;
    validate!(
        env,
        key.has_valid_tick_bounds(),
        ErrorCode::InvalidTickBounds,
        "Staker: Create: inverted tick bounds"
    )?;

    let incentive_id = key.id(env);
    validate!(
        env,
        get_incentive(env, &incentive_id).is_none(),
        ErrorCode::IncentiveAlreadyExists
    )?;

    let end_time = key.start_time.safe_add(duration, env)?;

    save_period(
        env,
        &incentive_id,
        0,
        &Period {
            reward_per_second: reward_per_second(env, reward, duration)?,
            start_time: key.start_time,
            end_time,
        },
    );
    save_incentive(
        env,
        &incentive_id,
        &Incentive {
            cumulative_reward: 0,
            current_period_id: 0,
            last_update_time: key.start_time,
            end_time,
            number_of_stakes: 0,
        },
    );

    let mut accounting = get_reward_accounting(env, &incentive_id);
    accounting.added_rewards = reward;
    save_reward_accounting(env, &incentive_id, &accounting);

    token::Client::new(env, &key.reward_token).transfer(
        funder,
        &env.current_contract_address(),
        &reward.cast::<i128>(env)?,
    );

    Ok(incentive_id)
}

/// Registers the period following the active one. Returns the new period.
pub fn extend_incentive(
    env: &Env,
    config: &Config,
    funder: &Address,
    key: &IncentiveKey,
    new_period_id: u32,
    duration: u64,
    reward: u128,
) -> MeridianResult<Period> {
    let incentive_id = key.id(env);
    let incentive = load_incentive(env, &incentive_id)?;

    validate!(
        env,
        Some(new_period_id) == incentive.current_period_id.checked_add(1),
        ErrorCode::InvalidPeriodId,
        "Staker: Extend: expected period {}, got {}",
        incentive.current_period_id.saturating_add(1),
        new_period_id
    )?;
    validate!(
        env,
        get_period(env, &incentive_id, new_period_id).is_none(),
        ErrorCode::InvalidPeriodId,
        "Staker: Extend: period {} already registered",
        new_period_id
    )?;
    validate!(env, reward > 0, ErrorCode::ZeroReward)?;
    validate!(env, duration > 0, ErrorCode::ZeroDuration)?;
    validate!(
        env,
        duration <= config.max_incentive_duration,
        ErrorCode::DurationTooLong
    )?;

    let previous = load_period(env, &incentive_id, incentive.current_period_id)?;
    let period = Period {
        reward_per_second: reward_per_second(env, reward, duration)?,
        start_time: previous.end_time,
        end_time: previous.end_time.safe_add(duration, env)?,
    };
    save_period(env, &incentive_id, new_period_id, &period);

    let mut accounting = get_reward_accounting(env, &incentive_id);
    accounting.added_rewards = accounting.added_rewards.safe_add(reward, env)?;
    save_reward_accounting(env, &incentive_id, &accounting);

    token::Client::new(env, &key.reward_token).transfer(
        funder,
        &env.current_contract_address(),
        &reward.cast::<i128>(env)?,
    );

    Ok(period)
}

/// Advances the incentive's accounting to `timestamp` with an externally computed total of
/// liquidity-seconds spent inside range by all stakes, live or already unstaked.
pub fn update_incentive(
    env: &Env,
    key: &IncentiveKey,
    total_seconds_inside_x128: &U256,
    timestamp: u64,
) -> MeridianResult<Incentive> {
    let incentive_id = key.id(env);
    let mut incentive = load_incentive(env, &incentive_id)?;
    let now = env.ledger().timestamp();

    validate!(
        env,
        timestamp < now,
        ErrorCode::UpdateTimestampNotInPast,
        "Staker: Update: timestamp {} not before now {}",
        timestamp,
        now
    )?;
    validate!(
        env,
        timestamp > incentive.last_update_time,
        ErrorCode::UpdateTimestampNotAfterLastUpdate,
        "Staker: Update: timestamp {} not after last update {}",
        timestamp,
        incentive.last_update_time
    )?;

    let previous = get_snapshot_or_empty(env, &incentive_id, incentive.last_update_time);
    let total = total_seconds_inside_x128.to_bn();
    let previous_total = previous.total_seconds_inside_x128.to_bn();
    validate!(
        env,
        total >= previous_total,
        ErrorCode::SecondsInsideDecreased
    )?;

    let mut accrued: u128 = 0;
    let mut from = incentive.last_update_time;
    let mut period = load_period(env, &incentive_id, incentive.current_period_id)?;

    while timestamp > incentive.end_time {
        let segment = incentive.end_time.saturating_sub(from).cast::<u128>(env)?;
        accrued = accrued.safe_add(segment.safe_mul(period.reward_per_second, env)?, env)?;
        from = incentive.end_time;

        let next_period_id = incentive.current_period_id.safe_add(1, env)?;
        period = get_period(env, &incentive_id, next_period_id).ok_or_else(|| {
            log!(env, "Staker: Update: no period after {}", incentive.current_period_id);
            ErrorCode::NextPeriodMissing
        })?;

        incentive.current_period_id = next_period_id;
        incentive.end_time = period.end_time;
        log!(env, "Staker: Update: rolled over to period {}", next_period_id);
    }

    let segment = timestamp.saturating_sub(from).cast::<u128>(env)?;
    accrued = accrued.safe_add(segment.safe_mul(period.reward_per_second, env)?, env)?;

    if total == previous_total {
        log!(env, "Staker: Update: no liquidity in range, {} discarded", accrued);
    } else {
        incentive.cumulative_reward = incentive.cumulative_reward.safe_add(accrued, env)?;
    }
    incentive.last_update_time = timestamp;

    save_incentive(env, &incentive_id, &incentive);
    save_snapshot(
        env,
        &incentive_id,
        timestamp,
        &DistributionSnapshot {
            total_seconds_inside_x128: total_seconds_inside_x128.clone(),
            cumulative_reward_compact: incentive
                .cumulative_reward
                .safe_div(CUMULATIVE_REWARD_UNIT, env)?,
        },
    );

    Ok(incentive)
}

/// Terminates an incentive and returns the leftover to its refundee. Returns the refund.
pub fn end_incentive(env: &Env, config: &Config, key: &IncentiveKey) -> MeridianResult<u128> {
    let incentive_id = key.id(env);
    let incentive = load_incentive(env, &incentive_id)?;
    let now = env.ledger().timestamp();

    validate!(
        env,
        now >= incentive.end_time.safe_add(config.end_incentive_lag, env)?,
        ErrorCode::IncentiveStillActive,
        "Staker: End: incentive runs until {}",
        incentive.end_time
    )?;

    let next_period_id = incentive.current_period_id.safe_add(1, env)?;
    validate!(
        env,
        get_period(env, &incentive_id, next_period_id).is_none(),
        ErrorCode::PeriodPending,
        "Staker: End: period {} is registered",
        next_period_id
    )?;
    validate!(
        env,
        incentive.number_of_stakes == 0,
        ErrorCode::IncentiveHasStakes,
        "Staker: End: {} tokens still staked",
        incentive.number_of_stakes
    )?;

    let accounting = get_reward_accounting(env, &incentive_id);
    validate!(
        env,
        accounting.added_rewards > accounting.claimed_rewards,
        ErrorCode::NoRefundAvailable
    )?;
    let refund = accounting
        .added_rewards
        .safe_sub(accounting.claimed_rewards, env)?;

    erase_incentive(env, &incentive_id, incentive.current_period_id);

    token::Client::new(env, &key.reward_token).transfer(
        &env.current_contract_address(),
        &key.refundee,
        &refund.cast::<i128>(env)?,
    );

    Ok(refund)
}

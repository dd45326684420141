use meridian::{
    error::MeridianResult,
    math::{bn::U256, helpers::get_proportion_u128, safe_math::SafeMath},
};
use soroban_sdk::Env;

/// Inputs of a single stake's reward computation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RewardInputs {
    pub incentive_cumulative_reward: u128,
    /// Cumulative reward recorded at the stake's anchor snapshot
    pub incentive_cumulative_reward_at_stake: u128,
    pub incentive_total_seconds_inside_x128: U256,
    pub incentive_total_seconds_inside_at_stake_x128: U256,
    pub incentive_last_update_time: u64,
    pub stake_time: u64,
    pub liquidity: u128,
    pub initial_seconds_per_liquidity_inside_x128: U256,
    pub current_seconds_per_liquidity_inside_x128: U256,
    pub claimed_reward: u128,
}

/// Liquidity-seconds a position spent inside its range since `initial` was observed.
pub fn seconds_inside_x128(
    env: &Env,
    initial_seconds_per_liquidity_inside_x128: U256,
    current_seconds_per_liquidity_inside_x128: U256,
    liquidity: u128,
) -> MeridianResult<U256> {
    current_seconds_per_liquidity_inside_x128
        .safe_sub(initial_seconds_per_liquidity_inside_x128, env)?
        .safe_mul(U256::from(liquidity), env)
}

/// Returns the unclaimed reward of a stake together with the liquidity-seconds it has
/// accumulated inside its range.
///
/// The stake earns the share of the reward distributed since its anchor snapshot that its
/// own seconds represent within the total seconds over the same window. Nothing is earned
/// until the incentive has been updated at or after the stake time.
///
/// Fails with `DivisionByZero` when the seconds window is empty, callers are expected to
/// check that beforehand.
pub fn compute_reward(env: &Env, inputs: &RewardInputs) -> MeridianResult<(u128, U256)> {
    let seconds_inside_x128 = seconds_inside_x128(
        env,
        inputs.initial_seconds_per_liquidity_inside_x128,
        inputs.current_seconds_per_liquidity_inside_x128,
        inputs.liquidity,
    )?;

    if inputs.incentive_last_update_time < inputs.stake_time {
        return Ok((0, seconds_inside_x128));
    }

    let reward_window = inputs
        .incentive_cumulative_reward
        .safe_sub(inputs.incentive_cumulative_reward_at_stake, env)?;
    let seconds_window = inputs
        .incentive_total_seconds_inside_x128
        .safe_sub(inputs.incentive_total_seconds_inside_at_stake_x128, env)?;

    let reward_so_far =
        get_proportion_u128(env, reward_window, seconds_inside_x128, seconds_window)?;

    Ok((
        reward_so_far.saturating_sub(inputs.claimed_reward),
        seconds_inside_x128,
    ))
}

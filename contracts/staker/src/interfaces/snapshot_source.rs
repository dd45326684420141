use meridian::{
    error::{ErrorCode, MeridianResult},
    validate,
};
use soroban_sdk::{Address, BytesN, Env, U256};

use crate::{
    indexed_set::staked_tokens,
    interfaces::pool::PoolClient,
    storage::{get_deposit, get_stake, StakeSnapshot},
};

/// Read access to the staked tokens of one incentive, by position in its staked set.
pub trait StakeSnapshotSource {
    fn staked_token_count(&self) -> u32;

    /// Snapshot of the token at `index`, `None` if the slot no longer holds a live stake
    fn stake_snapshot_at(&self, index: u32) -> Option<StakeSnapshot>;
}

/// Current seconds-per-liquidity accumulator of a tick range.
pub trait SecondsPerLiquidityOracle {
    fn seconds_per_liquidity_inside_x128(&self, tick_lower: i32, tick_upper: i32) -> U256;
}

pub struct LedgerStakes<'a> {
    env: &'a Env,
    incentive_id: BytesN<32>,
}

impl<'a> LedgerStakes<'a> {
    pub fn new(env: &'a Env, incentive_id: &BytesN<32>) -> Self {
        LedgerStakes {
            env,
            incentive_id: incentive_id.clone(),
        }
    }
}

/// Stake snapshot for a token, `None` unless both its deposit and its stake exist.
pub fn load_stake_snapshot(
    env: &Env,
    incentive_id: &BytesN<32>,
    token_id: u128,
) -> Option<StakeSnapshot> {
    let stake = get_stake(env, incentive_id, token_id)?;
    let deposit = get_deposit(env, token_id)?;

    Some(StakeSnapshot {
        initial_secs_per_liq_x128: stake.initial_secs_per_liq_x128,
        liquidity: stake.liquidity,
        tick_lower: deposit.tick_lower,
        tick_upper: deposit.tick_upper,
    })
}

impl StakeSnapshotSource for LedgerStakes<'_> {
    fn staked_token_count(&self) -> u32 {
        staked_tokens(self.env, &self.incentive_id).len()
    }

    fn stake_snapshot_at(&self, index: u32) -> Option<StakeSnapshot> {
        let token_id = staked_tokens(self.env, &self.incentive_id).at(index)?;
        load_stake_snapshot(self.env, &self.incentive_id, token_id)
    }
}

pub struct PoolOracle<'a> {
    client: PoolClient<'a>,
}

impl<'a> PoolOracle<'a> {
    pub fn new(env: &'a Env, pool: &Address) -> Self {
        PoolOracle {
            client: PoolClient::new(env, pool),
        }
    }
}

impl SecondsPerLiquidityOracle for PoolOracle<'_> {
    fn seconds_per_liquidity_inside_x128(&self, tick_lower: i32, tick_upper: i32) -> U256 {
        self.client
            .snapshot_cumulatives_inside(&tick_lower, &tick_upper)
            .secs_per_liq_inside_x128
    }
}

/// Pool accumulator of a tick range. The range must not be empty.
pub fn seconds_per_liquidity_inside(
    env: &Env,
    oracle: &impl SecondsPerLiquidityOracle,
    tick_lower: i32,
    tick_upper: i32,
) -> MeridianResult<U256> {
    validate!(
        env,
        tick_lower < tick_upper,
        ErrorCode::InvalidTickBounds,
        "Staker: tick range {} {} is empty",
        tick_lower,
        tick_upper
    )?;
    Ok(oracle.seconds_per_liquidity_inside_x128(tick_lower, tick_upper))
}

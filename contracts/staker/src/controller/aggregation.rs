//! Read side of the off-chain assisted distribution update.
//!
//! An external job reads the staked token count, splits `[0, count)` with [`chunk_ranges`],
//! sums [`aggregate_seconds_inside`] over every chunk, adds the incentive's unstaked seconds
//! and submits the total together with a timestamp in the past.

use meridian::{
    error::{ErrorCode, MeridianResult},
    math::{
        bn::{HostU256Ext, U256},
        safe_math::SafeMath,
    },
    validate,
};
use soroban_sdk::{log, Env, Vec};

use crate::{
    constants::MAX_AGGREGATION_CHUNK,
    interfaces::snapshot_source::{
        seconds_per_liquidity_inside, SecondsPerLiquidityOracle, StakeSnapshotSource,
    },
    math::reward::seconds_inside_x128,
};

/// Sum of liquidity-seconds spent in range by the stakes at positions `[start, end)`.
pub fn aggregate_seconds_inside(
    env: &Env,
    stakes: &impl StakeSnapshotSource,
    oracle: &impl SecondsPerLiquidityOracle,
    start: u32,
    end: u32,
) -> MeridianResult<U256> {
    validate!(
        env,
        start <= end,
        ErrorCode::InvalidIndexRange,
        "Staker: Aggregate: range {} {} is inverted",
        start,
        end
    )?;
    validate!(
        env,
        end - start <= MAX_AGGREGATION_CHUNK,
        ErrorCode::InvalidChunkSize,
        "Staker: Aggregate: {} tokens requested",
        end - start
    )?;

    let mut total = U256::zero();
    for index in start..end {
        let snapshot = stakes.stake_snapshot_at(index).ok_or_else(|| {
            log!(env, "Staker: Aggregate: no live stake at {}", index);
            ErrorCode::StakedTokenNotFound
        })?;

        let current = seconds_per_liquidity_inside(
            env,
            oracle,
            snapshot.tick_lower,
            snapshot.tick_upper,
        )?;
        let seconds = seconds_inside_x128(
            env,
            snapshot.initial_secs_per_liq_x128.to_bn(),
            current.to_bn(),
            snapshot.liquidity,
        )?;

        total = total.safe_add(seconds, env)?;
    }

    Ok(total)
}

/// Splits `[0, count)` into consecutive `[start, end)` ranges of at most `chunk_size` tokens.
pub fn chunk_ranges(env: &Env, count: u32, chunk_size: u32) -> MeridianResult<Vec<(u32, u32)>> {
    validate!(
        env,
        chunk_size > 0 && chunk_size <= MAX_AGGREGATION_CHUNK,
        ErrorCode::InvalidChunkSize,
        "Staker: chunk size {} out of bounds",
        chunk_size
    )?;

    let mut ranges = Vec::new(env);
    let mut start = 0u32;
    while start < count {
        let end = start.saturating_add(chunk_size).min(count);
        ranges.push_back((start, end));
        start = end;
    }

    Ok(ranges)
}

/// Distribution snapshots keep the cumulative reward in units of this many base units.
/// Anything below one unit is dropped when the snapshot is written.
pub const CUMULATIVE_REWARD_UNIT: u128 = 1_000;

/// Upper bound on how many staked tokens a single aggregation query may visit.
pub const MAX_AGGREGATION_CHUNK: u32 = 200;

pub const DEFAULT_MAX_INCENTIVE_START_LEAD_TIME: u64 = 30 * meridian::constants::ONE_DAY;
pub const DEFAULT_MAX_INCENTIVE_DURATION: u64 = 2 * 365 * meridian::constants::ONE_DAY;
pub const DEFAULT_MAX_LOCK_TIME: u64 = 90 * meridian::constants::ONE_DAY;
pub const DEFAULT_END_INCENTIVE_LAG: u64 = meridian::constants::ONE_DAY;

use core::fmt::Debug;

use meridian::{
    constants::{PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD},
    error::ErrorCode,
};
use soroban_sdk::{
    contracttype, log, panic_with_error, xdr::ToXdr, Address, BytesN, Env, IntoVal, TryFromVal,
    Val, U256,
};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Config,
    Admin,
    Initialized,
    Role(Role, Address),
    Incentive(BytesN<32>),
    Period(BytesN<32>, u32),
    Snapshot(BytesN<32>, u64),
    RewardAccounting(BytesN<32>),
    UnstakedSeconds(BytesN<32>),
    Deposit(u128),
    Stake(BytesN<32>, u128),
    StakedTokenCount(BytesN<32>),
    StakedTokenAt(BytesN<32>, u32),
    StakedTokenPosition(BytesN<32>, u128),
}

pub(crate) fn save<V: IntoVal<Env, Val>>(env: &Env, key: &DataKey, value: &V) {
    env.storage().persistent().set(key, value);
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

pub(crate) fn load<V>(env: &Env, key: &DataKey) -> Option<V>
where
    V: TryFromVal<Env, Val>,
    <V as TryFromVal<Env, Val>>::Error: Debug,
{
    let value = env.storage().persistent().get::<DataKey, V>(key);
    if value.is_some() {
        env.storage()
            .persistent()
            .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
    }
    value
}

pub(crate) fn erase(env: &Env, key: &DataKey) {
    env.storage().persistent().remove(key);
}

// ################################################################
//                             Config
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Position NFT contract the deposits are custodied from
    pub position_manager: Address,
    /// How far in the future an incentive may start
    pub max_incentive_start_lead_time: u64,
    /// Longest duration accepted for a single period
    pub max_incentive_duration: u64,
    /// Longest lock time an incentive key may carry
    pub max_lock_time: u64,
    /// Time after the end of the active period before the incentive may be ended
    pub end_incentive_lag: u64,
}

pub fn save_config(env: &Env, config: &Config) {
    save(env, &DataKey::Config, config);
}

pub fn get_config(env: &Env) -> Config {
    load(env, &DataKey::Config).unwrap_or_else(|| {
        log!(env, "Staker: Config not set");
        panic_with_error!(env, ErrorCode::NotInitialized)
    })
}

#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum Role {
    /// Creates, extends and ends incentives
    IncentiveManager = 0,
    /// Submits off-chain computed distribution aggregates
    DistributionOperator = 1,
}

// ################################################################
//                           Incentives
// ################################################################

/// Immutable parameters of an incentive. The incentive id is the hash of its XDR encoding.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IncentiveKey {
    pub reward_token: Address,
    pub pool: Address,
    /// Receives whatever is left over when the incentive is ended
    pub refundee: Address,
    pub start_time: u64,
    /// Minimum time a token has to stay staked, 0 for none
    pub lock_time: u64,
    pub minimum_tick_range: i32,
    pub min_tick_lower: i32,
    pub max_tick_lower: i32,
    pub min_tick_upper: i32,
    pub max_tick_upper: i32,
}

impl IncentiveKey {
    pub fn id(&self, env: &Env) -> BytesN<32> {
        env.crypto().sha256(&self.clone().to_xdr(env)).into()
    }

    pub fn has_valid_tick_bounds(&self) -> bool {
        self.minimum_tick_range >= 0
            && self.min_tick_lower <= self.max_tick_lower
            && self.min_tick_upper <= self.max_tick_upper
    }

    pub fn accepts_range(&self, tick_lower: i32, tick_upper: i32) -> bool {
        (tick_upper as i64) - (tick_lower as i64) >= self.minimum_tick_range as i64
            && (self.min_tick_lower..=self.max_tick_lower).contains(&tick_lower)
            && (self.min_tick_upper..=self.max_tick_upper).contains(&tick_upper)
    }
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Incentive {
    pub cumulative_reward: u128,
    pub current_period_id: u32,
    /// Timestamp of the last accepted aggregate, the start time until the first update
    pub last_update_time: u64,
    /// End of the active period
    pub end_time: u64,
    pub number_of_stakes: u32,
}

pub fn get_incentive(env: &Env, incentive_id: &BytesN<32>) -> Option<Incentive> {
    load::<Incentive>(env, &DataKey::Incentive(incentive_id.clone()))
        .filter(|incentive| incentive.end_time > 0)
}

pub fn save_incentive(env: &Env, incentive_id: &BytesN<32>, incentive: &Incentive) {
    save(env, &DataKey::Incentive(incentive_id.clone()), incentive);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Period {
    pub reward_per_second: u128,
    pub start_time: u64,
    pub end_time: u64,
}

pub fn get_period(env: &Env, incentive_id: &BytesN<32>, period_id: u32) -> Option<Period> {
    load(env, &DataKey::Period(incentive_id.clone(), period_id))
}

pub fn save_period(env: &Env, incentive_id: &BytesN<32>, period_id: u32, period: &Period) {
    save(env, &DataKey::Period(incentive_id.clone(), period_id), period);
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DistributionSnapshot {
    pub total_seconds_inside_x128: U256,
    /// Cumulative reward in `CUMULATIVE_REWARD_UNIT`s, truncated
    pub cumulative_reward_compact: u128,
}

impl DistributionSnapshot {
    pub fn empty(env: &Env) -> Self {
        DistributionSnapshot {
            total_seconds_inside_x128: U256::from_u32(env, 0),
            cumulative_reward_compact: 0,
        }
    }
}

pub fn get_snapshot(
    env: &Env,
    incentive_id: &BytesN<32>,
    timestamp: u64,
) -> Option<DistributionSnapshot> {
    load(env, &DataKey::Snapshot(incentive_id.clone(), timestamp))
}

/// Snapshot at `timestamp`, or the all-zero snapshot when none was recorded there.
pub fn get_snapshot_or_empty(
    env: &Env,
    incentive_id: &BytesN<32>,
    timestamp: u64,
) -> DistributionSnapshot {
    get_snapshot(env, incentive_id, timestamp).unwrap_or_else(|| DistributionSnapshot::empty(env))
}

pub fn save_snapshot(
    env: &Env,
    incentive_id: &BytesN<32>,
    timestamp: u64,
    snapshot: &DistributionSnapshot,
) {
    save(env, &DataKey::Snapshot(incentive_id.clone(), timestamp), snapshot);
}

#[contracttype]
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RewardAccounting {
    pub claimed_rewards: u128,
    pub added_rewards: u128,
}

pub fn get_reward_accounting(env: &Env, incentive_id: &BytesN<32>) -> RewardAccounting {
    load(env, &DataKey::RewardAccounting(incentive_id.clone())).unwrap_or_default()
}

pub fn save_reward_accounting(env: &Env, incentive_id: &BytesN<32>, accounting: &RewardAccounting) {
    save(env, &DataKey::RewardAccounting(incentive_id.clone()), accounting);
}

pub fn get_unstaked_seconds(env: &Env, incentive_id: &BytesN<32>) -> U256 {
    load(env, &DataKey::UnstakedSeconds(incentive_id.clone()))
        .unwrap_or_else(|| U256::from_u32(env, 0))
}

pub fn save_unstaked_seconds(env: &Env, incentive_id: &BytesN<32>, seconds: &U256) {
    save(env, &DataKey::UnstakedSeconds(incentive_id.clone()), seconds);
}

/// Removes everything the ledger keeps for an incentive except its distribution snapshots,
/// which are left to expire.
pub fn erase_incentive(env: &Env, incentive_id: &BytesN<32>, last_period_id: u32) {
    for period_id in 0..=last_period_id {
        erase(env, &DataKey::Period(incentive_id.clone(), period_id));
    }
    erase(env, &DataKey::Incentive(incentive_id.clone()));
    erase(env, &DataKey::RewardAccounting(incentive_id.clone()));
    erase(env, &DataKey::UnstakedSeconds(incentive_id.clone()));
}

// ################################################################
//                        Deposits & Stakes
// ################################################################

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Deposit {
    pub owner: Address,
    /// Number of incentives the token is currently staked in
    pub number_of_stakes: u32,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

pub fn get_deposit(env: &Env, token_id: u128) -> Option<Deposit> {
    load(env, &DataKey::Deposit(token_id))
}

pub fn save_deposit(env: &Env, token_id: u128, deposit: &Deposit) {
    save(env, &DataKey::Deposit(token_id), deposit);
}

pub fn remove_deposit(env: &Env, token_id: u128) {
    erase(env, &DataKey::Deposit(token_id));
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Stake {
    /// Position liquidity at stake time
    pub liquidity: u128,
    /// Reward already paid out for this stake
    pub claimed_reward: u128,
    pub initial_secs_per_liq_x128: U256,
    pub stake_time: u64,
    /// The incentive's `last_update_time` when the token was staked
    pub last_update_time_on_stake: u64,
    /// The incentive's full precision `cumulative_reward` when the token was staked
    pub cumulative_reward_on_stake: u128,
}

pub fn get_stake(env: &Env, incentive_id: &BytesN<32>, token_id: u128) -> Option<Stake> {
    load(env, &DataKey::Stake(incentive_id.clone(), token_id))
}

pub fn save_stake(env: &Env, incentive_id: &BytesN<32>, token_id: u128, stake: &Stake) {
    save(env, &DataKey::Stake(incentive_id.clone(), token_id), stake);
}

pub fn remove_stake(env: &Env, incentive_id: &BytesN<32>, token_id: u128) {
    erase(env, &DataKey::Stake(incentive_id.clone(), token_id));
}

/// What the aggregation path needs to know about one staked token.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakeSnapshot {
    pub initial_secs_per_liq_x128: U256,
    pub liquidity: u128,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardInfo {
    pub reward: u128,
    pub seconds_inside_x128: U256,
}

// ################################################################
//                             Utils
// ################################################################

pub mod utils {
    use super::*;

    pub fn is_initialized(env: &Env) -> bool {
        env.storage()
            .persistent()
            .get(&DataKey::Initialized)
            .unwrap_or(false)
    }

    pub fn set_initialized(env: &Env) {
        save(env, &DataKey::Initialized, &true);
    }

    pub fn save_admin(env: &Env, address: &Address) {
        save(env, &DataKey::Admin, address);
    }

    pub fn get_admin(env: &Env) -> Address {
        load(env, &DataKey::Admin).unwrap_or_else(|| {
            log!(env, "Staker: Admin not set");
            panic_with_error!(env, ErrorCode::AdminNotSet)
        })
    }

    pub fn is_admin(env: &Env, sender: &Address) -> bool {
        get_admin(env) == *sender
    }

    pub fn has_role(env: &Env, account: &Address, role: Role) -> bool {
        load::<bool>(env, &DataKey::Role(role, account.clone())).unwrap_or(false)
    }

    pub fn set_role(env: &Env, account: &Address, role: Role, granted: bool) {
        let key = DataKey::Role(role, account.clone());
        if granted {
            save(env, &key, &true);
        } else {
            erase(env, &key);
        }
    }
}

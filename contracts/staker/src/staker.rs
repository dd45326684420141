use meridian::error::ErrorCode;
use soroban_sdk::{Address, BytesN, Env, Vec, U256};

use crate::storage::{
    Config, Deposit, DistributionSnapshot, Incentive, IncentiveKey, Period, RewardAccounting,
    RewardInfo, Role, Stake, StakeSnapshot,
};

pub trait StakerTrait {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(env: Env, admin: Address, position_manager: Address) -> Result<(), ErrorCode>;

    fn update_config(
        env: Env,
        max_incentive_start_lead_time: Option<u64>,
        max_incentive_duration: Option<u64>,
        max_lock_time: Option<u64>,
        end_incentive_lag: Option<u64>,
    ) -> Result<(), ErrorCode>;

    fn grant_role(env: Env, account: Address, role: Role) -> Result<(), ErrorCode>;

    fn revoke_role(env: Env, account: Address, role: Role) -> Result<(), ErrorCode>;

    // ################################################################
    //                           INCENTIVES
    // ################################################################

    fn create_incentive(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        duration: u64,
        reward: u128,
    ) -> Result<BytesN<32>, ErrorCode>;

    fn extend_incentive(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        new_period_id: u32,
        duration: u64,
        reward: u128,
    ) -> Result<(), ErrorCode>;

    fn update_distribution_info(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        total_seconds_inside_x128: U256,
        timestamp: u64,
    ) -> Result<(), ErrorCode>;

    fn end_incentive(env: Env, sender: Address, key: IncentiveKey) -> Result<u128, ErrorCode>;

    // ################################################################
    //                              USER
    // ################################################################

    fn deposit_token(
        env: Env,
        sender: Address,
        token_id: u128,
        incentives: Vec<IncentiveKey>,
    ) -> Result<(), ErrorCode>;

    fn withdraw_token(
        env: Env,
        sender: Address,
        token_id: u128,
        to: Address,
    ) -> Result<(), ErrorCode>;

    fn transfer_deposit_ownership(
        env: Env,
        sender: Address,
        token_id: u128,
        new_owner: Address,
    ) -> Result<(), ErrorCode>;

    fn stake_token(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<(), ErrorCode>;

    fn unstake_token(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<u128, ErrorCode>;

    fn collect_reward(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<u128, ErrorCode>;

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config;

    fn query_admin(env: Env) -> Address;

    fn has_role(env: Env, account: Address, role: Role) -> bool;

    fn compute_incentive_id(env: Env, key: IncentiveKey) -> BytesN<32>;

    fn get_incentive(env: Env, incentive_id: BytesN<32>) -> Result<Incentive, ErrorCode>;

    fn get_period(
        env: Env,
        incentive_id: BytesN<32>,
        period_id: u32,
    ) -> Result<Period, ErrorCode>;

    fn get_distribution_snapshot(
        env: Env,
        incentive_id: BytesN<32>,
        timestamp: u64,
    ) -> DistributionSnapshot;

    fn get_reward_accounting(env: Env, incentive_id: BytesN<32>) -> RewardAccounting;

    fn get_deposit(env: Env, token_id: u128) -> Result<Deposit, ErrorCode>;

    fn get_stake(env: Env, incentive_id: BytesN<32>, token_id: u128) -> Result<Stake, ErrorCode>;

    fn get_reward_info(
        env: Env,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<RewardInfo, ErrorCode>;

    // ################################################################
    //                          AGGREGATION
    // ################################################################

    fn get_staked_token_count(env: Env, incentive_id: BytesN<32>) -> u32;

    fn get_staked_token_at(
        env: Env,
        incentive_id: BytesN<32>,
        index: u32,
    ) -> Result<u128, ErrorCode>;

    fn get_stake_snapshot(
        env: Env,
        incentive_id: BytesN<32>,
        token_id: u128,
    ) -> Result<StakeSnapshot, ErrorCode>;

    fn get_unstaked_aggregate_seconds(env: Env, incentive_id: BytesN<32>) -> U256;

    /// Liquidity-seconds in range of the stakes at positions `[start, end)` of the staked set
    fn get_seconds_inside_aggregate(
        env: Env,
        incentive_id: BytesN<32>,
        pool: Address,
        start: u32,
        end: u32,
    ) -> Result<U256, ErrorCode>;

    fn chunk_ranges(env: Env, count: u32, chunk_size: u32) -> Result<Vec<(u32, u32)>, ErrorCode>;
}

use soroban_sdk::{contract, contractimpl, contractmeta, log, Address, BytesN, Env, Vec, U256};

use crate::{
    constants::{
        DEFAULT_END_INCENTIVE_LAG, DEFAULT_MAX_INCENTIVE_DURATION,
        DEFAULT_MAX_INCENTIVE_START_LEAD_TIME, DEFAULT_MAX_LOCK_TIME,
    },
    controller::{aggregation, deposit, incentive, stake},
    events::StakerEvents,
    indexed_set::staked_tokens,
    interfaces::snapshot_source::{load_stake_snapshot, LedgerStakes, PoolOracle},
    staker::StakerTrait,
    storage::{
        get_config, get_period as load_period, get_reward_accounting as load_reward_accounting,
        get_snapshot_or_empty, get_stake as load_stake, get_unstaked_seconds, save_config,
        utils::{
            get_admin, has_role, is_initialized, save_admin, set_initialized, set_role,
        },
        Config, Deposit, DistributionSnapshot, Incentive, IncentiveKey, Period,
        RewardAccounting, RewardInfo, Role, Stake, StakeSnapshot,
    },
};

use meridian::{
    constants::{INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD},
    error::{ErrorCode, MeridianResult},
    validate,
};

contractmeta!(
    key = "Description",
    val = "Liquidity mining incentives with off-chain assisted reward distribution"
);

#[contract]
pub struct Staker;

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn require_admin(env: &Env) -> Address {
    let admin = get_admin(env);
    admin.require_auth();
    admin
}

fn require_role(env: &Env, sender: &Address, role: Role) -> MeridianResult {
    sender.require_auth();
    validate!(
        env,
        has_role(env, sender, role),
        ErrorCode::NotAuthorized,
        "Staker: sender lacks role {}",
        role as u32
    )
}

#[contractimpl]
impl StakerTrait for Staker {
    // ################################################################
    //                             ADMIN
    // ################################################################

    fn initialize(env: Env, admin: Address, position_manager: Address) -> Result<(), ErrorCode> {
        if is_initialized(&env) {
            log!(&env, "Staker: Initialize: initializing contract twice is not allowed");
            return Err(ErrorCode::AlreadyInitialized);
        }
        bump_instance(&env);

        set_initialized(&env);
        save_admin(&env, &admin);

        let config = Config {
            position_manager,
            max_incentive_start_lead_time: DEFAULT_MAX_INCENTIVE_START_LEAD_TIME,
            max_incentive_duration: DEFAULT_MAX_INCENTIVE_DURATION,
            max_lock_time: DEFAULT_MAX_LOCK_TIME,
            end_incentive_lag: DEFAULT_END_INCENTIVE_LAG,
        };
        save_config(&env, &config);

        StakerEvents::initialization(&env, admin, config);

        Ok(())
    }

    fn update_config(
        env: Env,
        max_incentive_start_lead_time: Option<u64>,
        max_incentive_duration: Option<u64>,
        max_lock_time: Option<u64>,
        end_incentive_lag: Option<u64>,
    ) -> Result<(), ErrorCode> {
        bump_instance(&env);
        require_admin(&env);

        let mut config = get_config(&env);

        if let Some(max_incentive_start_lead_time) = max_incentive_start_lead_time {
            config.max_incentive_start_lead_time = max_incentive_start_lead_time;
        }
        if let Some(max_incentive_duration) = max_incentive_duration {
            validate!(
                &env,
                max_incentive_duration > 0,
                ErrorCode::ZeroDuration,
                "Staker: Update config: max duration must be positive"
            )?;
            config.max_incentive_duration = max_incentive_duration;
        }
        if let Some(max_lock_time) = max_lock_time {
            config.max_lock_time = max_lock_time;
        }
        if let Some(end_incentive_lag) = end_incentive_lag {
            config.end_incentive_lag = end_incentive_lag;
        }

        save_config(&env, &config);
        StakerEvents::config_updated(&env, config);

        Ok(())
    }

    fn grant_role(env: Env, account: Address, role: Role) -> Result<(), ErrorCode> {
        bump_instance(&env);
        require_admin(&env);

        set_role(&env, &account, role, true);
        StakerEvents::role_updated(&env, account, role, true);

        Ok(())
    }

    fn revoke_role(env: Env, account: Address, role: Role) -> Result<(), ErrorCode> {
        bump_instance(&env);
        require_admin(&env);

        set_role(&env, &account, role, false);
        StakerEvents::role_updated(&env, account, role, false);

        Ok(())
    }

    // ################################################################
    //                           INCENTIVES
    // ################################################################

    fn create_incentive(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        duration: u64,
        reward: u128,
    ) -> Result<BytesN<32>, ErrorCode> {
        bump_instance(&env);
        require_role(&env, &sender, Role::IncentiveManager)?;

        let config = get_config(&env);
        let incentive_id =
            incentive::create_incentive(&env, &config, &sender, &key, duration, reward)?;

        StakerEvents::incentive_created(
            &env,
            incentive_id.clone(),
            key.reward_token,
            key.pool,
            key.start_time,
            key.start_time.saturating_add(duration),
            reward,
        );

        Ok(incentive_id)
    }

    fn extend_incentive(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        new_period_id: u32,
        duration: u64,
        reward: u128,
    ) -> Result<(), ErrorCode> {
        bump_instance(&env);
        require_role(&env, &sender, Role::IncentiveManager)?;

        let config = get_config(&env);
        let period = incentive::extend_incentive(
            &env,
            &config,
            &sender,
            &key,
            new_period_id,
            duration,
            reward,
        )?;

        StakerEvents::incentive_extended(
            &env,
            key.id(&env),
            new_period_id,
            period.start_time,
            period.end_time,
            reward,
        );

        Ok(())
    }

    fn update_distribution_info(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        total_seconds_inside_x128: U256,
        timestamp: u64,
    ) -> Result<(), ErrorCode> {
        bump_instance(&env);
        require_role(&env, &sender, Role::DistributionOperator)?;

        let updated =
            incentive::update_incentive(&env, &key, &total_seconds_inside_x128, timestamp)?;

        StakerEvents::incentive_updated(
            &env,
            key.id(&env),
            timestamp,
            total_seconds_inside_x128,
            updated.cumulative_reward,
            updated.current_period_id,
        );

        Ok(())
    }

    fn end_incentive(env: Env, sender: Address, key: IncentiveKey) -> Result<u128, ErrorCode> {
        bump_instance(&env);
        require_role(&env, &sender, Role::IncentiveManager)?;

        let config = get_config(&env);
        let refund = incentive::end_incentive(&env, &config, &key)?;

        StakerEvents::incentive_ended(&env, key.id(&env), key.refundee, refund);

        Ok(refund)
    }

    // ################################################################
    //                              USER
    // ################################################################

    fn deposit_token(
        env: Env,
        sender: Address,
        token_id: u128,
        incentives: Vec<IncentiveKey>,
    ) -> Result<(), ErrorCode> {
        bump_instance(&env);
        sender.require_auth();

        let config = get_config(&env);
        let (deposit, stakes) =
            deposit::deposit_token(&env, &config, &sender, token_id, &incentives)?;

        StakerEvents::token_deposited(&env, sender, token_id, deposit.number_of_stakes);
        for (key, staked) in incentives.iter().zip(stakes.iter()) {
            StakerEvents::token_staked(
                &env,
                key.id(&env),
                token_id,
                staked.liquidity,
                staked.stake_time,
            );
        }

        Ok(())
    }

    fn withdraw_token(
        env: Env,
        sender: Address,
        token_id: u128,
        to: Address,
    ) -> Result<(), ErrorCode> {
        bump_instance(&env);
        sender.require_auth();

        let config = get_config(&env);
        deposit::withdraw_token(&env, &config, &sender, token_id, &to)?;

        StakerEvents::token_withdrawn(&env, sender, token_id, to);

        Ok(())
    }

    fn transfer_deposit_ownership(
        env: Env,
        sender: Address,
        token_id: u128,
        new_owner: Address,
    ) -> Result<(), ErrorCode> {
        bump_instance(&env);
        sender.require_auth();

        deposit::transfer_deposit(&env, &sender, token_id, &new_owner)?;

        StakerEvents::deposit_transferred(&env, token_id, sender, new_owner);

        Ok(())
    }

    fn stake_token(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<(), ErrorCode> {
        bump_instance(&env);
        sender.require_auth();

        let config = get_config(&env);
        let mut deposit = stake::load_deposit(&env, token_id)?;
        stake::ensure_owner(&env, &deposit, &sender)?;

        let staked = stake::stake_token(&env, &config, &key, token_id, &mut deposit)?;

        StakerEvents::token_staked(
            &env,
            key.id(&env),
            token_id,
            staked.liquidity,
            staked.stake_time,
        );

        Ok(())
    }

    fn unstake_token(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<u128, ErrorCode> {
        bump_instance(&env);
        sender.require_auth();

        let reward = stake::unstake_token(&env, &sender, &key, token_id)?;

        StakerEvents::token_unstaked(&env, key.id(&env), token_id, reward);

        Ok(reward)
    }

    fn collect_reward(
        env: Env,
        sender: Address,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<u128, ErrorCode> {
        bump_instance(&env);
        sender.require_auth();

        let reward = stake::collect_reward(&env, &sender, &key, token_id)?;

        StakerEvents::reward_collected(&env, key.id(&env), token_id, sender, reward);

        Ok(reward)
    }

    // ################################################################
    //                             QUERIES
    // ################################################################

    fn query_config(env: Env) -> Config {
        bump_instance(&env);
        get_config(&env)
    }

    fn query_admin(env: Env) -> Address {
        bump_instance(&env);
        get_admin(&env)
    }

    fn has_role(env: Env, account: Address, role: Role) -> bool {
        has_role(&env, &account, role)
    }

    fn compute_incentive_id(env: Env, key: IncentiveKey) -> BytesN<32> {
        key.id(&env)
    }

    fn get_incentive(env: Env, incentive_id: BytesN<32>) -> Result<Incentive, ErrorCode> {
        incentive::load_incentive(&env, &incentive_id)
    }

    fn get_period(
        env: Env,
        incentive_id: BytesN<32>,
        period_id: u32,
    ) -> Result<Period, ErrorCode> {
        load_period(&env, &incentive_id, period_id).ok_or(ErrorCode::InvalidPeriodId)
    }

    fn get_distribution_snapshot(
        env: Env,
        incentive_id: BytesN<32>,
        timestamp: u64,
    ) -> DistributionSnapshot {
        get_snapshot_or_empty(&env, &incentive_id, timestamp)
    }

    fn get_reward_accounting(env: Env, incentive_id: BytesN<32>) -> RewardAccounting {
        load_reward_accounting(&env, &incentive_id)
    }

    fn get_deposit(env: Env, token_id: u128) -> Result<Deposit, ErrorCode> {
        stake::load_deposit(&env, token_id)
    }

    fn get_stake(env: Env, incentive_id: BytesN<32>, token_id: u128) -> Result<Stake, ErrorCode> {
        load_stake(&env, &incentive_id, token_id).ok_or(ErrorCode::StakeNotFound)
    }

    fn get_reward_info(
        env: Env,
        key: IncentiveKey,
        token_id: u128,
    ) -> Result<RewardInfo, ErrorCode> {
        stake::reward_info(&env, &key, token_id)
    }

    // ################################################################
    //                          AGGREGATION
    // ################################################################

    fn get_staked_token_count(env: Env, incentive_id: BytesN<32>) -> u32 {
        staked_tokens(&env, &incentive_id).len()
    }

    fn get_staked_token_at(
        env: Env,
        incentive_id: BytesN<32>,
        index: u32,
    ) -> Result<u128, ErrorCode> {
        staked_tokens(&env, &incentive_id)
            .at(index)
            .ok_or(ErrorCode::StakedTokenNotFound)
    }

    fn get_stake_snapshot(
        env: Env,
        incentive_id: BytesN<32>,
        token_id: u128,
    ) -> Result<StakeSnapshot, ErrorCode> {
        load_stake_snapshot(&env, &incentive_id, token_id).ok_or(ErrorCode::StakeNotFound)
    }

    fn get_unstaked_aggregate_seconds(env: Env, incentive_id: BytesN<32>) -> U256 {
        get_unstaked_seconds(&env, &incentive_id)
    }

    fn get_seconds_inside_aggregate(
        env: Env,
        incentive_id: BytesN<32>,
        pool: Address,
        start: u32,
        end: u32,
    ) -> Result<U256, ErrorCode> {
        let total = aggregation::aggregate_seconds_inside(
            &env,
            &LedgerStakes::new(&env, &incentive_id),
            &PoolOracle::new(&env, &pool),
            start,
            end,
        )?;
        Ok(total.to_host(&env))
    }

    fn chunk_ranges(env: Env, count: u32, chunk_size: u32) -> Result<Vec<(u32, u32)>, ErrorCode> {
        aggregation::chunk_ranges(&env, count, chunk_size)
    }
}

use soroban_sdk::{Address, BytesN, Env, Symbol, U256};

use crate::storage::{Config, Role};

pub struct StakerEvents {}

impl StakerEvents {
    // Admin Events

    /// Emitted when the contract is initialized
    ///
    /// - topics - `["initialization", admin: Address]`
    /// - data - `[config: Config]`
    pub fn initialization(env: &Env, admin: Address, config: Config) {
        let topics = (Symbol::new(env, "initialization"), admin);
        env.events().publish(topics, config);
    }

    /// Emitted when the admin changes the configuration
    ///
    /// - topics - `["config_updated"]`
    /// - data - `[config: Config]`
    pub fn config_updated(env: &Env, config: Config) {
        let topics = (Symbol::new(env, "config_updated"),);
        env.events().publish(topics, config);
    }

    /// Emitted when a role is granted or revoked
    ///
    /// - topics - `["role_updated", account: Address]`
    /// - data - `[role: Role, granted: bool]`
    pub fn role_updated(env: &Env, account: Address, role: Role, granted: bool) {
        let topics = (Symbol::new(env, "role_updated"), account);
        env.events().publish(topics, (role, granted));
    }

    // Incentive Events

    /// Emitted when an incentive is created along with its first period
    ///
    /// - topics - `["incentive_created", incentive_id: BytesN<32>]`
    /// - data - `[reward_token: Address, pool: Address, start_time: u64, end_time: u64, reward: u128]`
    pub fn incentive_created(
        env: &Env,
        incentive_id: BytesN<32>,
        reward_token: Address,
        pool: Address,
        start_time: u64,
        end_time: u64,
        reward: u128,
    ) {
        let topics = (Symbol::new(env, "incentive_created"), incentive_id);
        env.events()
            .publish(topics, (reward_token, pool, start_time, end_time, reward));
    }

    /// Emitted when a period is appended to an incentive
    ///
    /// - topics - `["incentive_extended", incentive_id: BytesN<32>, period_id: u32]`
    /// - data - `[start_time: u64, end_time: u64, reward: u128]`
    pub fn incentive_extended(
        env: &Env,
        incentive_id: BytesN<32>,
        period_id: u32,
        start_time: u64,
        end_time: u64,
        reward: u128,
    ) {
        let topics = (
            Symbol::new(env, "incentive_extended"),
            incentive_id,
            period_id,
        );
        env.events().publish(topics, (start_time, end_time, reward));
    }

    /// Emitted when a distribution aggregate is accepted
    ///
    /// - topics - `["incentive_updated", incentive_id: BytesN<32>]`
    /// - data - `[timestamp: u64, total_seconds_inside_x128: U256, cumulative_reward: u128, period_id: u32]`
    pub fn incentive_updated(
        env: &Env,
        incentive_id: BytesN<32>,
        timestamp: u64,
        total_seconds_inside_x128: U256,
        cumulative_reward: u128,
        period_id: u32,
    ) {
        let topics = (Symbol::new(env, "incentive_updated"), incentive_id);
        env.events().publish(
            topics,
            (
                timestamp,
                total_seconds_inside_x128,
                cumulative_reward,
                period_id,
            ),
        );
    }

    /// - topics - `["incentive_ended", incentive_id: BytesN<32>]`
    /// - data - `[refundee: Address, refund: u128]`
    pub fn incentive_ended(env: &Env, incentive_id: BytesN<32>, refundee: Address, refund: u128) {
        let topics = (Symbol::new(env, "incentive_ended"), incentive_id);
        env.events().publish(topics, (refundee, refund));
    }

    // Deposit Events

    /// - topics - `["token_deposited", owner: Address]`
    /// - data - `[token_id: u128, number_of_stakes: u32]`
    pub fn token_deposited(env: &Env, owner: Address, token_id: u128, number_of_stakes: u32) {
        let topics = (Symbol::new(env, "token_deposited"), owner);
        env.events().publish(topics, (token_id, number_of_stakes));
    }

    /// - topics - `["token_withdrawn", owner: Address]`
    /// - data - `[token_id: u128, to: Address]`
    pub fn token_withdrawn(env: &Env, owner: Address, token_id: u128, to: Address) {
        let topics = (Symbol::new(env, "token_withdrawn"), owner);
        env.events().publish(topics, (token_id, to));
    }

    /// - topics - `["deposit_transferred", token_id: u128]`
    /// - data - `[old_owner: Address, new_owner: Address]`
    pub fn deposit_transferred(
        env: &Env,
        token_id: u128,
        old_owner: Address,
        new_owner: Address,
    ) {
        let topics = (Symbol::new(env, "deposit_transferred"), token_id);
        env.events().publish(topics, (old_owner, new_owner));
    }

    // Stake Events

    /// Emitted when a token is staked into an incentive
    ///
    /// - topics - `["token_staked", incentive_id: BytesN<32>, token_id: u128]`
    /// - data - `[liquidity: u128, stake_time: u64]`
    pub fn token_staked(
        env: &Env,
        incentive_id: BytesN<32>,
        token_id: u128,
        liquidity: u128,
        stake_time: u64,
    ) {
        let topics = (Symbol::new(env, "token_staked"), incentive_id, token_id);
        env.events().publish(topics, (liquidity, stake_time));
    }

    /// - topics - `["token_unstaked", incentive_id: BytesN<32>, token_id: u128]`
    /// - data - `[reward: u128]`
    pub fn token_unstaked(env: &Env, incentive_id: BytesN<32>, token_id: u128, reward: u128) {
        let topics = (Symbol::new(env, "token_unstaked"), incentive_id, token_id);
        env.events().publish(topics, reward);
    }

    /// - topics - `["reward_collected", incentive_id: BytesN<32>, token_id: u128]`
    /// - data - `[owner: Address, reward: u128]`
    pub fn reward_collected(
        env: &Env,
        incentive_id: BytesN<32>,
        token_id: u128,
        owner: Address,
        reward: u128,
    ) {
        let topics = (Symbol::new(env, "reward_collected"), incentive_id, token_id);
        env.events().publish(topics, (owner, reward));
    }
}

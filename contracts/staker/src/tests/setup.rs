use soroban_sdk::{
    contract, contractimpl, contracttype,
    testutils::{Address as _, Ledger},
    token::{StellarAssetClient, TokenClient},
    Address, BytesN, Env, U256,
};

use crate::{
    contract::{Staker, StakerClient},
    interfaces::{pool::CumulativesInside, position_manager::PositionInfo},
    storage::{IncentiveKey, Role},
};

pub use meridian::constants::ONE_DAY;
pub const NOW: u64 = 100;
pub const START: u64 = 1_000;
pub const TICK_LOWER: i32 = -60;
pub const TICK_UPPER: i32 = 60;

#[contracttype]
#[derive(Clone)]
enum MockKey {
    Position(u128),
    Owner(u128),
    SecondsPerLiquidity(i32, i32),
}

#[contract]
pub struct MockPositionManager;

#[contractimpl]
impl MockPositionManager {
    pub fn mint(env: Env, owner: Address, token_id: u128, position: PositionInfo) {
        env.storage()
            .instance()
            .set(&MockKey::Position(token_id), &position);
        env.storage().instance().set(&MockKey::Owner(token_id), &owner);
    }

    pub fn positions(env: Env, token_id: u128) -> PositionInfo {
        env.storage()
            .instance()
            .get(&MockKey::Position(token_id))
            .unwrap()
    }

    pub fn owner_of(env: Env, token_id: u128) -> Address {
        env.storage()
            .instance()
            .get(&MockKey::Owner(token_id))
            .unwrap()
    }

    pub fn transfer(env: Env, from: Address, to: Address, token_id: u128) {
        from.require_auth();
        let owner: Address = env
            .storage()
            .instance()
            .get(&MockKey::Owner(token_id))
            .unwrap();
        assert_eq!(owner, from, "transfer from non-owner");
        env.storage().instance().set(&MockKey::Owner(token_id), &to);
    }
}

#[contract]
pub struct MockPool;

#[contractimpl]
impl MockPool {
    pub fn set_seconds_per_liquidity(env: Env, tick_lower: i32, tick_upper: i32, value: U256) {
        env.storage()
            .instance()
            .set(&MockKey::SecondsPerLiquidity(tick_lower, tick_upper), &value);
    }

    pub fn snapshot_cumulatives_inside(
        env: Env,
        tick_lower: i32,
        tick_upper: i32,
    ) -> CumulativesInside {
        let secs_per_liq_inside_x128 = env
            .storage()
            .instance()
            .get(&MockKey::SecondsPerLiquidity(tick_lower, tick_upper))
            .unwrap_or_else(|| U256::from_u32(&env, 0));

        CumulativesInside {
            tick_cumulative_inside: 0,
            secs_per_liq_inside_x128,
            seconds_inside: 0,
        }
    }
}

pub struct Setup<'a> {
    pub env: Env,
    pub admin: Address,
    pub manager: Address,
    pub operator: Address,
    pub refundee: Address,
    pub staker: StakerClient<'a>,
    pub reward_token: TokenClient<'a>,
    pub position_manager: MockPositionManagerClient<'a>,
    pub pool: MockPoolClient<'a>,
}

impl Setup<'_> {
    /// Staker with an incentive manager and a distribution operator, clock at `NOW`.
    pub fn new() -> Self {
        let env = Env::default();
        env.mock_all_auths();
        env.cost_estimate().budget().reset_unlimited();
        set_time(&env, NOW);

        let admin = Address::generate(&env);
        let manager = Address::generate(&env);
        let operator = Address::generate(&env);
        let refundee = Address::generate(&env);

        let reward_token_address = env
            .register_stellar_asset_contract_v2(admin.clone())
            .address();
        StellarAssetClient::new(&env, &reward_token_address).mint(&manager, &1_000_000_000);
        let reward_token = TokenClient::new(&env, &reward_token_address);

        let position_manager =
            MockPositionManagerClient::new(&env, &env.register(MockPositionManager, ()));
        let pool = MockPoolClient::new(&env, &env.register(MockPool, ()));

        let staker = StakerClient::new(&env, &env.register(Staker, ()));
        staker.initialize(&admin, &position_manager.address);
        staker.grant_role(&manager, &Role::IncentiveManager);
        staker.grant_role(&operator, &Role::DistributionOperator);

        Setup {
            env,
            admin,
            manager,
            operator,
            refundee,
            staker,
            reward_token,
            position_manager,
            pool,
        }
    }

    pub fn key(&self, start_time: u64) -> IncentiveKey {
        IncentiveKey {
            reward_token: self.reward_token.address.clone(),
            pool: self.pool.address.clone(),
            refundee: self.refundee.clone(),
            start_time,
            lock_time: 0,
            minimum_tick_range: 0,
            min_tick_lower: -1_000,
            max_tick_lower: 0,
            min_tick_upper: 0,
            max_tick_upper: 1_000,
        }
    }

    pub fn create(&self, key: &IncentiveKey, duration: u64, reward: u128) -> BytesN<32> {
        self.staker
            .create_incentive(&self.manager, key, &duration, &reward)
    }

    /// Mints a position in the default range to `owner`.
    pub fn mint(&self, owner: &Address, token_id: u128, liquidity: u128) {
        self.mint_in_range(owner, token_id, liquidity, TICK_LOWER, TICK_UPPER);
    }

    pub fn mint_in_range(
        &self,
        owner: &Address,
        token_id: u128,
        liquidity: u128,
        tick_lower: i32,
        tick_upper: i32,
    ) {
        self.position_manager.mint(
            owner,
            &token_id,
            &PositionInfo {
                pool: self.pool.address.clone(),
                tick_lower,
                tick_upper,
                liquidity,
            },
        );
    }

    /// Mints a position and deposits it into the staker without staking.
    pub fn deposit(&self, owner: &Address, token_id: u128, liquidity: u128) {
        self.mint(owner, token_id, liquidity);
        self.staker
            .deposit_token(owner, &token_id, &soroban_sdk::vec![&self.env]);
    }

    pub fn set_accumulator(&self, seconds_per_liquidity: u128) {
        self.set_accumulator_in_range(TICK_LOWER, TICK_UPPER, seconds_per_liquidity);
    }

    pub fn set_accumulator_in_range(
        &self,
        tick_lower: i32,
        tick_upper: i32,
        seconds_per_liquidity: u128,
    ) {
        self.pool.set_seconds_per_liquidity(
            &tick_lower,
            &tick_upper,
            &U256::from_u128(&self.env, seconds_per_liquidity),
        );
    }

    pub fn update(&self, key: &IncentiveKey, total_seconds_inside: u128, timestamp: u64) {
        self.staker.update_distribution_info(
            &self.operator,
            key,
            &U256::from_u128(&self.env, total_seconds_inside),
            &timestamp,
        );
    }

    pub fn set_time(&self, timestamp: u64) {
        set_time(&self.env, timestamp);
    }

    pub fn u256(&self, value: u128) -> U256 {
        U256::from_u128(&self.env, value)
    }
}

pub fn set_time(env: &Env, timestamp: u64) {
    env.ledger().with_mut(|li| {
        li.timestamp = timestamp;
    });
}

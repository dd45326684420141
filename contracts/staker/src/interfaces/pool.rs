use soroban_sdk::{contractclient, contracttype, Env, U256};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CumulativesInside {
    pub tick_cumulative_inside: i64,
    /// Seconds per unit of liquidity spent inside the range, Q128.128
    pub secs_per_liq_inside_x128: U256,
    pub seconds_inside: u32,
}

#[contractclient(name = "PoolClient")]
pub trait PoolInterface {
    fn snapshot_cumulatives_inside(env: Env, tick_lower: i32, tick_upper: i32)
        -> CumulativesInside;
}

use soroban_sdk::{contractclient, contracttype, Address, Env};

/// What the staker needs to know about a liquidity position NFT.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PositionInfo {
    pub pool: Address,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
}

#[contractclient(name = "PositionManagerClient")]
pub trait PositionManagerInterface {
    fn positions(env: Env, token_id: u128) -> PositionInfo;

    fn transfer(env: Env, from: Address, to: Address, token_id: u128);
}

use meridian::error::ErrorCode;
use pretty_assertions::assert_eq;
use soroban_sdk::{
    testutils::{Address as _, Events},
    vec, Address, BytesN, Symbol, TryFromVal, Vec,
};

use super::setup::{Setup, START};

#[test]
fn deposit_takes_custody_and_stakes_into_each_incentive() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);
    let first = setup.key(START);
    let mut second = setup.key(START);
    second.lock_time = 60;
    let first_id = setup.create(&first, 1_000, 1_000);
    let second_id = setup.create(&second, 1_000, 2_000);

    setup.set_time(START);
    setup.mint(&owner, 1, 5);
    setup.staker.deposit_token(
        &owner,
        &1,
        &vec![&setup.env, first.clone(), second.clone()],
    );

    assert_eq!(setup.position_manager.owner_of(&1), setup.staker.address);
    assert_eq!(setup.staker.get_deposit(&1).number_of_stakes, 2);
    assert_eq!(setup.staker.get_staked_token_at(&first_id, &0), 1);
    assert_eq!(setup.staker.get_staked_token_at(&second_id, &0), 1);
}

#[test]
fn auto_stake_emits_a_stake_event_per_incentive() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);
    let first = setup.key(START);
    let mut second = setup.key(START);
    second.lock_time = 60;
    let first_id = setup.create(&first, 1_000, 1_000);
    let second_id = setup.create(&second, 1_000, 2_000);

    setup.set_time(START);
    setup.mint(&owner, 1, 5);
    setup
        .staker
        .deposit_token(&owner, &1, &vec![&setup.env, first, second]);

    let token_staked = Symbol::new(&setup.env, "token_staked");
    let mut staked_in: Vec<BytesN<32>> = Vec::new(&setup.env);
    for (_, topics, _) in setup.env.events().all().iter() {
        let name = topics
            .get(0)
            .and_then(|topic| Symbol::try_from_val(&setup.env, &topic).ok());
        if name == Some(token_staked.clone()) {
            let incentive_id = topics.get(1).unwrap();
            staked_in.push_back(BytesN::<32>::try_from_val(&setup.env, &incentive_id).unwrap());
        }
    }

    assert_eq!(staked_in, vec![&setup.env, first_id, second_id]);
}

#[test]
fn failed_auto_stake_reverts_the_deposit() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);
    let key = setup.key(START);
    setup.create(&key, 1_000, 1_000);

    // incentive has not started yet
    setup.mint(&owner, 1, 5);
    assert_eq!(
        setup
            .staker
            .try_deposit_token(&owner, &1, &vec![&setup.env, key.clone()]),
        Err(Ok(ErrorCode::IncentiveNotActive))
    );
    assert_eq!(setup.position_manager.owner_of(&1), owner);
    assert_eq!(
        setup.staker.try_get_deposit(&1),
        Err(Ok(ErrorCode::DepositNotFound))
    );
}

#[test]
fn deposit_twice_fails() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);

    setup.deposit(&owner, 1, 5);
    assert_eq!(
        setup
            .staker
            .try_deposit_token(&owner, &1, &vec![&setup.env]),
        Err(Ok(ErrorCode::DepositAlreadyExists))
    );
}

#[test]
fn withdraw_requires_all_stakes_closed() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);
    let receiver = Address::generate(&setup.env);
    let key = setup.key(START);
    setup.create(&key, 1_000, 1_000);

    setup.deposit(&owner, 1, 5);
    setup.set_time(START);
    setup.staker.stake_token(&owner, &key, &1);

    assert_eq!(
        setup.staker.try_withdraw_token(&owner, &1, &receiver),
        Err(Ok(ErrorCode::DepositHasStakes))
    );

    setup.staker.unstake_token(&owner, &key, &1);
    assert_eq!(
        setup.staker.try_withdraw_token(&receiver, &1, &receiver),
        Err(Ok(ErrorCode::NotDepositOwner))
    );

    setup.staker.withdraw_token(&owner, &1, &receiver);
    assert_eq!(setup.position_manager.owner_of(&1), receiver);
    assert_eq!(
        setup.staker.try_get_deposit(&1),
        Err(Ok(ErrorCode::DepositNotFound))
    );
}

#[test]
fn new_owner_collects_the_rewards() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);
    let buyer = Address::generate(&setup.env);
    let key = setup.key(START);
    setup.create(&key, 1_000, 1_000);

    setup.deposit(&owner, 1, 5);
    setup.set_time(START);
    setup.staker.stake_token(&owner, &key, &1);

    setup.set_time(START + 200);
    setup.set_accumulator(40);
    setup.update(&key, 500, START + 100);

    setup.staker.transfer_deposit_ownership(&owner, &1, &buyer);
    assert_eq!(setup.staker.get_deposit(&1).owner, buyer);
    assert_eq!(
        setup.staker.try_collect_reward(&owner, &key, &1),
        Err(Ok(ErrorCode::NotDepositOwner))
    );
    assert_eq!(
        setup
            .staker
            .try_transfer_deposit_ownership(&owner, &1, &owner),
        Err(Ok(ErrorCode::NotDepositOwner))
    );

    assert_eq!(setup.staker.collect_reward(&buyer, &key, &1), 40);
    assert_eq!(setup.reward_token.balance(&buyer), 40);
    assert_eq!(setup.reward_token.balance(&owner), 0);
}

use meridian::error::ErrorCode;
use pretty_assertions::assert_eq;
use soroban_sdk::{testutils::Address as _, Address};
use test_case::test_case;

use super::setup::{Setup, ONE_DAY, START};
use crate::storage::{Incentive, IncentiveKey, Period, RewardAccounting};

#[test]
fn create_registers_first_period() {
    let setup = Setup::new();
    let key = setup.key(START);

    let incentive_id = setup.create(&key, 1_000, 1_000);

    assert_eq!(incentive_id, setup.staker.compute_incentive_id(&key));
    assert_eq!(
        setup.staker.get_incentive(&incentive_id),
        Incentive {
            cumulative_reward: 0,
            current_period_id: 0,
            last_update_time: START,
            end_time: START + 1_000,
            number_of_stakes: 0,
        }
    );
    assert_eq!(
        setup.staker.get_period(&incentive_id, &0),
        Period {
            reward_per_second: 1,
            start_time: START,
            end_time: START + 1_000,
        }
    );
    assert_eq!(
        setup.staker.get_reward_accounting(&incentive_id),
        RewardAccounting {
            claimed_rewards: 0,
            added_rewards: 1_000,
        }
    );
    assert_eq!(setup.reward_token.balance(&setup.staker.address), 1_000);
}

#[test]
fn reward_rate_rounds_down() {
    let setup = Setup::new();
    let key = setup.key(START);

    let incentive_id = setup.create(&key, 300, 1_000);

    assert_eq!(setup.staker.get_period(&incentive_id, &0).reward_per_second, 3);
    assert_eq!(
        setup.staker.get_reward_accounting(&incentive_id).added_rewards,
        1_000
    );
}

#[test]
fn every_parameter_changes_the_id() {
    let setup = Setup::new();
    let key = setup.key(START);
    let id = setup.staker.compute_incentive_id(&key);

    let mut later = key.clone();
    later.start_time += 1;
    let mut locked = key.clone();
    locked.lock_time = 10;
    let mut other_refundee = key.clone();
    other_refundee.refundee = Address::generate(&setup.env);

    for other in [later, locked, other_refundee] {
        assert!(setup.staker.compute_incentive_id(&other) != id);
    }
}

fn invalid(key: &mut IncentiveKey, case: u32) -> (u64, u128) {
    match case {
        0 => (1_000, 0),
        1 => (0, 1_000),
        2 => {
            key.start_time = 99;
            (1_000, 1_000)
        }
        3 => {
            key.start_time = 100 + 30 * ONE_DAY + 1;
            (1_000, 1_000)
        }
        4 => (2 * 365 * ONE_DAY + 1, 1_000),
        5 => {
            key.min_tick_lower = 10;
            key.max_tick_lower = 0;
            (1_000, 1_000)
        }
        6 => {
            key.minimum_tick_range = -1;
            (1_000, 1_000)
        }
        _ => {
            key.lock_time = 90 * ONE_DAY + 1;
            (1_000, 1_000)
        }
    }
}

#[test_case(0, ErrorCode::ZeroReward ; "zero reward")]
#[test_case(1, ErrorCode::ZeroDuration ; "zero duration")]
#[test_case(2, ErrorCode::StartTimeInPast ; "start in the past")]
#[test_case(3, ErrorCode::StartTimeTooFarInFuture ; "start too far ahead")]
#[test_case(4, ErrorCode::DurationTooLong ; "duration too long")]
#[test_case(5, ErrorCode::InvalidTickBounds ; "inverted tick bounds")]
#[test_case(6, ErrorCode::InvalidTickBounds ; "negative range")]
#[test_case(7, ErrorCode::LockTimeTooLong ; "lock too long")]
fn create_rejects_invalid_parameters(case: u32, expected: ErrorCode) {
    let setup = Setup::new();
    let mut key = setup.key(START);
    let (duration, reward) = invalid(&mut key, case);

    assert_eq!(
        setup
            .staker
            .try_create_incentive(&setup.manager, &key, &duration, &reward),
        Err(Ok(expected))
    );
    assert_eq!(setup.reward_token.balance(&setup.staker.address), 0);
}

#[test]
fn create_twice_fails() {
    let setup = Setup::new();
    let key = setup.key(START);
    setup.create(&key, 1_000, 1_000);

    assert_eq!(
        setup
            .staker
            .try_create_incentive(&setup.manager, &key, &1_000, &1_000),
        Err(Ok(ErrorCode::IncentiveAlreadyExists))
    );
}

#[test]
fn extend_appends_the_next_period() {
    let setup = Setup::new();
    let key = setup.key(START);
    let incentive_id = setup.create(&key, 1_000, 1_000);

    setup
        .staker
        .extend_incentive(&setup.manager, &key, &1, &500, &2_000);

    assert_eq!(
        setup.staker.get_period(&incentive_id, &1),
        Period {
            reward_per_second: 4,
            start_time: START + 1_000,
            end_time: START + 1_500,
        }
    );
    assert_eq!(
        setup.staker.get_reward_accounting(&incentive_id).added_rewards,
        3_000
    );
    assert_eq!(setup.reward_token.balance(&setup.staker.address), 3_000);

    // the active period is unchanged until an update rolls over
    assert_eq!(setup.staker.get_incentive(&incentive_id).end_time, START + 1_000);
}

#[test]
fn extend_requires_the_next_period_id() {
    let setup = Setup::new();
    let key = setup.key(START);
    setup.create(&key, 1_000, 1_000);

    assert_eq!(
        setup
            .staker
            .try_extend_incentive(&setup.manager, &key, &2, &500, &500),
        Err(Ok(ErrorCode::InvalidPeriodId))
    );
    assert_eq!(
        setup
            .staker
            .try_extend_incentive(&setup.manager, &key, &0, &500, &500),
        Err(Ok(ErrorCode::InvalidPeriodId))
    );

    setup
        .staker
        .extend_incentive(&setup.manager, &key, &1, &500, &500);
    assert_eq!(
        setup
            .staker
            .try_extend_incentive(&setup.manager, &key, &1, &500, &500),
        Err(Ok(ErrorCode::InvalidPeriodId))
    );
}

#[test]
fn extend_validates_amounts() {
    let setup = Setup::new();
    let key = setup.key(START);

    assert_eq!(
        setup
            .staker
            .try_extend_incentive(&setup.manager, &key, &1, &500, &500),
        Err(Ok(ErrorCode::IncentiveNotFound))
    );

    setup.create(&key, 1_000, 1_000);
    assert_eq!(
        setup
            .staker
            .try_extend_incentive(&setup.manager, &key, &1, &500, &0),
        Err(Ok(ErrorCode::ZeroReward))
    );
    assert_eq!(
        setup
            .staker
            .try_extend_incentive(&setup.manager, &key, &1, &0, &500),
        Err(Ok(ErrorCode::ZeroDuration))
    );
    assert_eq!(
        setup.staker.try_extend_incentive(
            &setup.manager,
            &key,
            &1,
            &(2 * 365 * ONE_DAY + 1),
            &500
        ),
        Err(Ok(ErrorCode::DurationTooLong))
    );
}

#[test]
fn end_refunds_everything_when_nothing_was_claimed() {
    let setup = Setup::new();
    let key = setup.key(START);
    let incentive_id = setup.create(&key, 1_000, 1_000);

    setup.set_time(START + 1_000 + ONE_DAY - 1);
    assert_eq!(
        setup.staker.try_end_incentive(&setup.manager, &key),
        Err(Ok(ErrorCode::IncentiveStillActive))
    );

    setup.set_time(START + 1_000 + ONE_DAY);
    assert_eq!(setup.staker.end_incentive(&setup.manager, &key), 1_000);

    assert_eq!(setup.reward_token.balance(&setup.refundee), 1_000);
    assert_eq!(setup.reward_token.balance(&setup.staker.address), 0);
    assert_eq!(
        setup.staker.try_get_incentive(&incentive_id),
        Err(Ok(ErrorCode::IncentiveNotFound))
    );
    assert_eq!(
        setup.staker.try_get_period(&incentive_id, &0),
        Err(Ok(ErrorCode::InvalidPeriodId))
    );
    assert_eq!(
        setup.staker.get_reward_accounting(&incentive_id),
        RewardAccounting::default()
    );
}

#[test]
fn end_waits_for_registered_periods() {
    let setup = Setup::new();
    let key = setup.key(START);
    setup.create(&key, 1_000, 1_000);
    setup
        .staker
        .extend_incentive(&setup.manager, &key, &1, &1_000, &1_000);

    setup.set_time(START + 1_000 + ONE_DAY);
    assert_eq!(
        setup.staker.try_end_incentive(&setup.manager, &key),
        Err(Ok(ErrorCode::PeriodPending))
    );
}

#[test]
fn end_with_stakes_fails_until_unstaked() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);
    let key = setup.key(START);
    let incentive_id = setup.create(&key, 1_000, 1_000);

    setup.deposit(&owner, 1, 5);
    setup.set_time(START);
    setup.staker.stake_token(&owner, &key, &1);

    setup.set_time(START + 200);
    setup.update(&key, 500, START + 100);
    setup.set_accumulator(40);

    setup.set_time(START + 1_000 + ONE_DAY);
    assert_eq!(
        setup.staker.try_end_incentive(&setup.manager, &key),
        Err(Ok(ErrorCode::IncentiveHasStakes))
    );

    // anyone may unstake once the incentive is over, the owner is paid
    let keeper = Address::generate(&setup.env);
    assert_eq!(setup.staker.unstake_token(&keeper, &key, &1), 40);
    assert_eq!(setup.reward_token.balance(&owner), 40);
    assert_eq!(setup.reward_token.balance(&keeper), 0);

    let accounting = setup.staker.get_reward_accounting(&incentive_id);
    assert_eq!(setup.staker.end_incentive(&setup.manager, &key), 960);
    assert_eq!(
        accounting.added_rewards - accounting.claimed_rewards,
        960
    );
    assert_eq!(setup.reward_token.balance(&setup.refundee), 960);
}

#[test]
fn end_without_leftover_fails() {
    let setup = Setup::new();
    let owner = Address::generate(&setup.env);
    let key = setup.key(START);
    let incentive_id = setup.create(&key, 1_000, 1_000);

    setup.deposit(&owner, 1, 5);
    setup.set_time(START);
    setup.staker.stake_token(&owner, &key, &1);

    // sole staker spends the whole period in range
    setup.set_time(START + 1_100);
    setup.set_accumulator(100);
    setup.update(&key, 500, START + 1_000);

    assert_eq!(setup.staker.unstake_token(&owner, &key, &1), 1_000);
    assert_eq!(
        setup.staker.get_reward_accounting(&incentive_id),
        RewardAccounting {
            claimed_rewards: 1_000,
            added_rewards: 1_000,
        }
    );

    setup.set_time(START + 1_000 + ONE_DAY);
    assert_eq!(
        setup.staker.try_end_incentive(&setup.manager, &key),
        Err(Ok(ErrorCode::NoRefundAvailable))
    );
}

use soroban_sdk::Env;

use crate::{
    error::{ErrorCode, MeridianResult},
    validate,
};

use super::{bn::U256, safe_math::SafeMath};

/// `value * numerator / denominator` rounded down, with a 512-bit intermediate so the
/// product never overflows before the division.
pub fn mul_div_floor(
    env: &Env,
    value: U256,
    numerator: U256,
    denominator: U256,
) -> MeridianResult<U256> {
    validate!(
        env,
        !denominator.is_zero(),
        ErrorCode::DivisionByZero,
        "mul_div_floor: zero denominator"
    )?;

    if numerator == denominator {
        return Ok(value);
    }

    value
        .widen()
        .safe_mul(numerator.widen(), env)?
        .safe_div(denominator.widen(), env)?
        .try_to_u256(env)
}

/// Proportional share of a 128-bit amount, `amount * part / whole`, rounded down.
pub fn get_proportion_u128(
    env: &Env,
    amount: u128,
    part: U256,
    whole: U256,
) -> MeridianResult<u128> {
    mul_div_floor(env, U256::from(amount), part, whole)?.try_to_u128(env)
}

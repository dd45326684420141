use soroban_sdk::{log, Env};

use crate::error::{ErrorCode, MeridianResult};
use crate::math::bn::{U256, U512};

pub trait SafeMath: Sized {
    fn safe_add(self, rhs: Self, env: &Env) -> MeridianResult<Self>;
    fn safe_sub(self, rhs: Self, env: &Env) -> MeridianResult<Self>;
    fn safe_mul(self, rhs: Self, env: &Env) -> MeridianResult<Self>;
    fn safe_div(self, rhs: Self, env: &Env) -> MeridianResult<Self>;
}

macro_rules! checked_impl {
    ($t:ty) => {
        impl SafeMath for $t {
            #[track_caller]
            #[inline(always)]
            fn safe_add(self, v: $t, env: &Env) -> MeridianResult<$t> {
                match self.checked_add(v) {
                    Some(result) => Ok(result),
                    None => {
                        log!(env, "Math error thrown at line {}", line!());
                        Err(ErrorCode::MathError)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_sub(self, v: $t, env: &Env) -> MeridianResult<$t> {
                match self.checked_sub(v) {
                    Some(result) => Ok(result),
                    None => {
                        log!(env, "Math error thrown at line {}", line!());
                        Err(ErrorCode::MathError)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_mul(self, v: $t, env: &Env) -> MeridianResult<$t> {
                match self.checked_mul(v) {
                    Some(result) => Ok(result),
                    None => {
                        log!(env, "Math error thrown at line {}", line!());
                        Err(ErrorCode::MathError)
                    }
                }
            }

            #[track_caller]
            #[inline(always)]
            fn safe_div(self, v: $t, env: &Env) -> MeridianResult<$t> {
                match self.checked_div(v) {
                    Some(result) => Ok(result),
                    None => {
                        log!(env, "Math error thrown at line {}", line!());
                        Err(ErrorCode::MathError)
                    }
                }
            }
        }
    };
}

checked_impl!(U512);
checked_impl!(U256);
checked_impl!(u128);
checked_impl!(u64);
checked_impl!(u32);

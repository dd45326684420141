use soroban_sdk::{log, Env};

use crate::error::{ErrorCode, MeridianResult};

pub trait Cast: Sized {
    /// Perform a casting operation with error handling.
    #[track_caller]
    #[inline(always)]
    fn cast<T: CastFrom<Self>>(self, env: &Env) -> MeridianResult<T> {
        T::cast_from(self, env)
    }
}

pub trait CastFrom<T>: Sized {
    fn cast_from(value: T, env: &Env) -> MeridianResult<Self>;
}

macro_rules! impl_cast {
    ($src:ty, $dst:ty) => {
        impl CastFrom<$src> for $dst {
            fn cast_from(value: $src, env: &Env) -> MeridianResult<Self> {
                value.try_into().map_err(|_| {
                    log!(env, "Casting error: value out of range at line {}", line!());
                    ErrorCode::CastingFailure
                })
            }
        }
    };
}

impl_cast!(u128, i128);
impl_cast!(u64, u128);
impl_cast!(i128, u128);

impl Cast for u128 {}
impl Cast for u64 {}
impl Cast for i128 {}

//! Big number types

#![allow(clippy::assign_op_pattern)]
#![allow(clippy::ptr_offset_with_cast)]
#![allow(clippy::manual_range_contains)]

use soroban_sdk::{log, Bytes, Env};
use uint::construct_uint;

use crate::error::{ErrorCode, MeridianResult};

construct_uint! {
    /// 256-bit unsigned integer.
    pub struct U256(4);
}

construct_uint! {
    /// 512-bit unsigned integer.
    pub struct U512(8);
}

impl U256 {
    /// Widen to 512 bits for full-precision intermediates.
    pub fn widen(self) -> U512 {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        U512::from_big_endian(&bytes)
    }

    /// Convert u256 to u128
    pub fn try_to_u128(self, env: &Env) -> MeridianResult<u128> {
        if self.bits() > 128 {
            log!(env, "Bn conversion error: value does not fit in 128 bits");
            return Err(ErrorCode::BnConversionError);
        }
        Ok(self.low_u128())
    }

    /// Convert to the host representation used in storage and contract interfaces.
    pub fn to_host(self, env: &Env) -> soroban_sdk::U256 {
        let mut bytes = [0u8; 32];
        self.to_big_endian(&mut bytes);
        soroban_sdk::U256::from_be_bytes(env, &Bytes::from_array(env, &bytes))
    }
}

impl U512 {
    /// Narrow back to 256 bits, failing if the high half is in use.
    pub fn try_to_u256(self, env: &Env) -> MeridianResult<U256> {
        let mut bytes = [0u8; 64];
        self.to_big_endian(&mut bytes);
        if bytes[..32].iter().any(|b| *b != 0) {
            log!(env, "Bn conversion error: value does not fit in 256 bits");
            return Err(ErrorCode::BnConversionError);
        }
        Ok(U256::from_big_endian(&bytes[32..]))
    }
}

pub trait HostU256Ext {
    fn to_bn(&self) -> U256;
}

impl HostU256Ext for soroban_sdk::U256 {
    fn to_bn(&self) -> U256 {
        let mut bytes = [0u8; 32];
        self.to_be_bytes().copy_into_slice(&mut bytes);
        U256::from_big_endian(&bytes)
    }
}

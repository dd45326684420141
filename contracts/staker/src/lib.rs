#![no_std]

mod constants;
mod contract;
mod controller;
mod events;
mod indexed_set;
pub mod interfaces;
mod math;
mod staker;
pub mod storage;

pub use contract::*;

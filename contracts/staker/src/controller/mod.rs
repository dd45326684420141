pub mod aggregation;
pub mod deposit;
pub mod incentive;
pub mod stake;

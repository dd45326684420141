pub mod pool;
pub mod position_manager;
pub mod snapshot_source;

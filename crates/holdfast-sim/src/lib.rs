//! Building simulation: spawn pools, per-building controllers and the
//! context the driving world supplies per tick.

pub mod building;
pub mod context;
pub mod controller;
pub mod spawn_pool;

#[cfg(test)]
pub mod test_harness;

pub use building::Building;
pub use context::WorldContext;
pub use spawn_pool::SpawnPool;

//! Shared primitives for the world generator and building simulation:
//! constants, deterministic sequences, surface descriptors and the
//! monster spawn record.

pub mod constants;
pub mod error;
pub mod math;
pub mod monster;
pub mod rng;
pub mod surface;
pub mod types;

pub use error::CoreError;

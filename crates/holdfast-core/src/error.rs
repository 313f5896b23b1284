use thiserror::Error;

/// Errors that can occur during generation and simulation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("sequence bound must be positive, got {0}")]
    InvalidBound(i32),
}

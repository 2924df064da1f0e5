//! Error types for the reel engine

use rf_tween::TweenError;
use thiserror::Error;

/// Reel engine error type
#[derive(Error, Debug)]
pub enum ReelError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid override entry: {0}")]
    InvalidOverride(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tween error: {0}")]
    Tween(#[from] TweenError),

    #[error("Reel {reel} has not settled (position {position})")]
    UnsettledReel { reel: usize, position: f64 },

    #[error("No symbol settled in row {row} of reel {reel}")]
    IncompleteResult { row: usize, reel: usize },
}

/// Result type alias
pub type ReelResult<T> = Result<T, ReelError>;

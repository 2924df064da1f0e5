//! Error types for tween scheduling

use thiserror::Error;

/// Tween error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TweenError {
    #[error("Non-finite tween value: {0}")]
    NonFinite(f64),

    #[error("Invalid tween duration: {0} ms")]
    InvalidDuration(f64),
}

/// Result type alias
pub type TweenResult<T> = Result<T, TweenError>;

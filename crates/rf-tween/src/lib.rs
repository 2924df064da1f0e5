//! # rf-tween — Tweening for reel animation
//!
//! Drives keyed numeric values from a start to an end value over a duration,
//! shaped by an easing curve. The engine is stepped explicitly by the caller's
//! frame loop, so every value it reports is committed before the next frame.
//!
//! ## Contract
//!
//! - One [`TweenStep`] per live tween per [`TweenEngine::advance`] call
//! - A tween's last step has `finished == true` and carries the exact end value
//! - Completion is reported exactly once, and never before the final value

pub mod easing;
pub mod error;
pub mod tween;

pub use easing::*;
pub use error::*;
pub use tween::*;

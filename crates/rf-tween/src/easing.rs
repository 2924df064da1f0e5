//! Easing curves

use serde::{Deserialize, Serialize};

/// Overshoot used by reel stops
pub const DEFAULT_BACKOUT_AMOUNT: f64 = 0.5;

/// Easing function type
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EasingFunction {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Runs past the end value, then settles back onto it.
    /// `amount` controls how far past the end the curve travels.
    BackOut { amount: f64 },
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::back_out(DEFAULT_BACKOUT_AMOUNT)
    }
}

impl EasingFunction {
    /// Back-out curve with the given overshoot
    pub fn back_out(amount: f64) -> Self {
        Self::BackOut { amount }
    }

    /// Apply easing to a 0-1 value
    pub fn apply(self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::BackOut { amount } => {
                // (t-1)^2 * ((amount+1)*(t-1) + amount) + 1
                let t = t - 1.0;
                t * t * ((amount + 1.0) * t + amount) + 1.0
            }
        }
    }
}

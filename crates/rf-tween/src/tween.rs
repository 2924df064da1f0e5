//! Frame-stepped tween engine

use crate::easing::EasingFunction;
use crate::error::{TweenError, TweenResult};

/// Handle returned when a tween is scheduled
pub type TweenId = u64;

/// Value produced for one tween on one advanced frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenStep {
    pub id: TweenId,
    /// Caller-chosen key identifying the animated property
    pub key: usize,
    pub value: f64,
    /// Set on the final step only; `value` is then exactly the end value
    pub finished: bool,
}

/// Time-based interpolation service driven by the caller's frame loop.
pub trait TweenEngine {
    /// Schedule a tween of `key` from `from` to `to`.
    ///
    /// A tween already running on the same key is replaced.
    fn tween_to(
        &mut self,
        key: usize,
        from: f64,
        to: f64,
        duration_ms: f64,
        easing: EasingFunction,
    ) -> TweenResult<TweenId>;

    /// Advance every live tween by `dt_ms` and report their new values.
    fn advance(&mut self, dt_ms: f64) -> Vec<TweenStep>;

    /// Any tween still live?
    fn is_active(&self) -> bool;
}

#[derive(Debug, Clone)]
struct Tween {
    id: TweenId,
    key: usize,
    from: f64,
    to: f64,
    duration_ms: f64,
    elapsed_ms: f64,
    easing: EasingFunction,
}

impl Tween {
    fn progress(&self) -> f64 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).min(1.0)
        }
    }

    fn step(&mut self, dt_ms: f64) -> TweenStep {
        self.elapsed_ms += dt_ms;
        let t = self.progress();
        let finished = t >= 1.0;
        let value = if finished {
            self.to
        } else {
            self.from + (self.to - self.from) * self.easing.apply(t)
        };

        TweenStep {
            id: self.id,
            key: self.key,
            value,
            finished,
        }
    }
}

/// Default [`TweenEngine`] implementation
#[derive(Debug, Default)]
pub struct Tweener {
    tweens: Vec<Tween>,
    next_id: TweenId,
}

impl Tweener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tweens
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

impl TweenEngine for Tweener {
    fn tween_to(
        &mut self,
        key: usize,
        from: f64,
        to: f64,
        duration_ms: f64,
        easing: EasingFunction,
    ) -> TweenResult<TweenId> {
        for value in [from, to] {
            if !value.is_finite() {
                return Err(TweenError::NonFinite(value));
            }
        }
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(TweenError::InvalidDuration(duration_ms));
        }

        let before = self.tweens.len();
        self.tweens.retain(|t| t.key != key);
        if self.tweens.len() != before {
            log::debug!("Replacing live tween on key {}", key);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.tweens.push(Tween {
            id,
            key,
            from,
            to,
            duration_ms,
            elapsed_ms: 0.0,
            easing,
        });

        Ok(id)
    }

    fn advance(&mut self, dt_ms: f64) -> Vec<TweenStep> {
        let dt_ms = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };

        let steps: Vec<TweenStep> = self.tweens.iter_mut().map(|t| t.step(dt_ms)).collect();
        self.tweens.retain(|t| t.progress() < 1.0);
        steps
    }

    fn is_active(&self) -> bool {
        !self.tweens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_tween_steps() {
        let mut tweener = Tweener::new();
        let id = tweener
            .tween_to(0, 0.0, 10.0, 100.0, EasingFunction::Linear)
            .unwrap();

        let steps = tweener.advance(25.0);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].id, id);
        assert_relative_eq!(steps[0].value, 2.5);
        assert!(!steps[0].finished);
        assert!(tweener.is_active());
    }

    #[test]
    fn test_final_step_is_exact_and_reported_once() {
        let mut tweener = Tweener::new();
        tweener
            .tween_to(3, 4.0, 16.0, 50.0, EasingFunction::back_out(0.5))
            .unwrap();

        let mut finished = Vec::new();
        for _ in 0..10 {
            for step in tweener.advance(16.0) {
                if step.finished {
                    finished.push(step);
                }
            }
        }

        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].key, 3);
        assert_eq!(finished[0].value, 16.0);
        assert!(!tweener.is_active());
        assert!(tweener.advance(16.0).is_empty());
    }

    #[test]
    fn test_staggered_tweens_finish_in_order() {
        let mut tweener = Tweener::new();
        for key in 0..3 {
            tweener
                .tween_to(key, 0.0, 1.0, 100.0 + key as f64 * 50.0, EasingFunction::Linear)
                .unwrap();
        }

        let mut order = Vec::new();
        while tweener.is_active() {
            for step in tweener.advance(10.0) {
                if step.finished {
                    order.push(step.key);
                }
            }
        }
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_zero_duration_finishes_on_first_frame() {
        let mut tweener = Tweener::new();
        tweener.tween_to(0, 1.0, 2.0, 0.0, EasingFunction::Linear).unwrap();
        let steps = tweener.advance(0.0);
        assert_eq!(steps.len(), 1);
        assert!(steps[0].finished);
        assert_eq!(steps[0].value, 2.0);
    }

    #[test]
    fn test_same_key_replaces() {
        let mut tweener = Tweener::new();
        tweener.tween_to(1, 0.0, 5.0, 100.0, EasingFunction::Linear).unwrap();
        tweener.tween_to(1, 0.0, 9.0, 100.0, EasingFunction::Linear).unwrap();
        assert_eq!(tweener.len(), 1);
    }

    #[test]
    fn test_invalid_parameters() {
        let mut tweener = Tweener::new();
        assert!(matches!(
            tweener.tween_to(0, f64::NAN, 1.0, 10.0, EasingFunction::Linear),
            Err(TweenError::NonFinite(_))
        ));
        assert!(matches!(
            tweener.tween_to(0, 0.0, f64::INFINITY, 10.0, EasingFunction::Linear),
            Err(TweenError::NonFinite(_))
        ));
        assert!(matches!(
            tweener.tween_to(0, 0.0, 1.0, -1.0, EasingFunction::Linear),
            Err(TweenError::InvalidDuration(_))
        ));
        assert!(tweener.is_empty());
    }
}

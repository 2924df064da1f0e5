//! Reel engine configuration

use std::path::Path;

use rf_tween::EasingFunction;
use serde::{Deserialize, Serialize};

use crate::error::{ReelError, ReelResult};
use crate::reel::SLOTS_PER_REEL;
use crate::symbols::{SymbolSet, SymbolTexture, default_symbol_textures};
use crate::timing::{TimingConfig, TimingProfile};

/// Default display refresh step (60 Hz)
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Complete reel engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReelConfig {
    /// Number of reels (columns)
    pub reel_count: usize,

    /// Square symbol cell size (px)
    pub symbol_size: f64,

    /// Slots travelled by the first reel per spin
    pub base_distance: u32,

    /// Extra slots travelled by each later reel
    pub per_reel_distance: u32,

    /// Stop easing for every reel
    pub easing: EasingFunction,

    /// Blur per slot of movement per frame
    pub blur_scale: f64,

    /// Step used by `advance_frame`
    pub frame_interval_ms: f64,

    pub timing: TimingConfig,

    pub symbols: Vec<SymbolTexture>,
}

impl Default for ReelConfig {
    fn default() -> Self {
        Self {
            reel_count: 3,
            symbol_size: 150.0,
            base_distance: 12,
            per_reel_distance: 4,
            easing: EasingFunction::default(),
            blur_scale: 8.0,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            timing: TimingConfig::default(),
            symbols: default_symbol_textures(),
        }
    }
}

impl ReelConfig {
    /// Default config with a timing profile
    pub fn with_profile(profile: TimingProfile) -> Self {
        Self {
            timing: TimingConfig::from_profile(profile),
            ..Self::default()
        }
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> ReelResult<Self> {
        let config: Self =
            serde_yml::from_str(yaml).map_err(|e| ReelError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate JSON
    pub fn from_json_str(json: &str) -> ReelResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ReelError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> ReelResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        log::info!("Loading reel config from {}", path.display());
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }

    pub fn to_yaml(&self) -> ReelResult<String> {
        serde_yml::to_string(self).map_err(|e| ReelError::Serialization(e.to_string()))
    }

    /// Check every invariant the controller relies on
    pub fn validate(&self) -> ReelResult<()> {
        let invalid = |msg: String| Err(ReelError::InvalidConfig(msg));

        if self.reel_count == 0 {
            return invalid("reel_count must be at least 1".into());
        }
        if !(self.symbol_size.is_finite() && self.symbol_size > 0.0) {
            return invalid(format!("symbol_size must be positive, got {}", self.symbol_size));
        }
        if !(self.frame_interval_ms.is_finite() && self.frame_interval_ms > 0.0) {
            return invalid(format!(
                "frame_interval_ms must be positive, got {}",
                self.frame_interval_ms
            ));
        }
        if let EasingFunction::BackOut { amount } = self.easing {
            if !(amount.is_finite() && amount >= 0.0) {
                return invalid(format!("back_out amount must be non-negative, got {amount}"));
            }
        }
        if !self.blur_scale.is_finite() {
            return invalid(format!("blur_scale must be finite, got {}", self.blur_scale));
        }

        let spin = self.timing.reel_spin_duration_ms;
        if !spin.is_finite() || spin < 0.0 {
            return invalid(format!("reel_spin_duration_ms must be >= 0, got {spin}"));
        }
        let interval = self.timing.reel_stop_interval_ms;
        if !(interval.is_finite() && interval > 0.0) {
            return invalid(format!("reel_stop_interval_ms must be positive, got {interval}"));
        }

        if self.base_distance == 0 {
            return invalid("base_distance must be at least 1".into());
        }
        if self.reel_count > 1 && self.per_reel_distance == 0 {
            return invalid("per_reel_distance must be positive with several reels".into());
        }
        // Whole laps keep slot `row + 1` landing on visible `row`
        let slots = SLOTS_PER_REEL as u32;
        for (name, distance) in [
            ("base_distance", self.base_distance),
            ("per_reel_distance", self.per_reel_distance),
        ] {
            if distance % slots != 0 {
                return invalid(format!(
                    "{name} must be a multiple of {slots} slots, got {distance}"
                ));
            }
        }

        SymbolSet::new(self.symbols.clone())?;
        Ok(())
    }

    /// Slots travelled by one reel
    pub fn travel_distance(&self, reel_index: usize) -> f64 {
        self.base_distance as f64 + reel_index as f64 * self.per_reel_distance as f64
    }
}

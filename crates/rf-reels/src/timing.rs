//! Timing profiles for reel spins

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ReelError;

/// Timing profile for reel spins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingProfile {
    /// Normal gameplay timing
    Normal,
    /// Fast/Turbo mode
    Turbo,
    /// Mobile optimized (slightly faster)
    Mobile,
    /// Studio mode (short spins for testing)
    Studio,
    /// Custom timing
    Custom,
}

impl Default for TimingProfile {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for TimingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Turbo => "turbo",
            Self::Mobile => "mobile",
            Self::Studio => "studio",
            Self::Custom => "custom",
        };
        f.write_str(name)
    }
}

impl FromStr for TimingProfile {
    type Err = ReelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "turbo" => Ok(Self::Turbo),
            "mobile" => Ok(Self::Mobile),
            "studio" => Ok(Self::Studio),
            "custom" => Ok(Self::Custom),
            other => Err(ReelError::InvalidConfig(format!(
                "unknown timing profile '{other}'"
            ))),
        }
    }
}

/// Reel spin timing
///
/// Missing durations in a config file come from the named profile's preset.
/// A duration that differs from that preset turns the profile into `Custom`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TimingConfigDef")]
pub struct TimingConfig {
    /// Profile type
    pub profile: TimingProfile,

    /// Spin duration of the first reel (ms)
    pub reel_spin_duration_ms: f64,

    /// Extra spin time for each later reel (ms)
    pub reel_stop_interval_ms: f64,
}

impl TimingConfig {
    /// Normal gameplay timing
    pub fn normal() -> Self {
        Self {
            profile: TimingProfile::Normal,
            reel_spin_duration_ms: 2500.0,
            reel_stop_interval_ms: 600.0,
        }
    }

    /// Turbo mode
    pub fn turbo() -> Self {
        Self {
            profile: TimingProfile::Turbo,
            reel_spin_duration_ms: 1200.0,
            reel_stop_interval_ms: 250.0,
        }
    }

    /// Mobile optimized
    pub fn mobile() -> Self {
        Self {
            profile: TimingProfile::Mobile,
            reel_spin_duration_ms: 1800.0,
            reel_stop_interval_ms: 400.0,
        }
    }

    /// Studio mode
    pub fn studio() -> Self {
        Self {
            profile: TimingProfile::Studio,
            reel_spin_duration_ms: 400.0,
            reel_stop_interval_ms: 150.0,
        }
    }

    /// Get config for profile
    pub fn from_profile(profile: TimingProfile) -> Self {
        match profile {
            TimingProfile::Normal => Self::normal(),
            TimingProfile::Turbo => Self::turbo(),
            TimingProfile::Mobile => Self::mobile(),
            TimingProfile::Studio => Self::studio(),
            TimingProfile::Custom => Self::normal(),
        }
    }

    /// Scale timing by factor (< 1.0 = faster)
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            profile: TimingProfile::Custom,
            reel_spin_duration_ms: self.reel_spin_duration_ms * factor,
            reel_stop_interval_ms: self.reel_stop_interval_ms * factor,
        }
    }

    /// Spin duration of one reel
    pub fn reel_duration(&self, reel_index: usize) -> f64 {
        self.reel_spin_duration_ms + reel_index as f64 * self.reel_stop_interval_ms
    }

    /// Calculate total spin duration (all reels stopping)
    pub fn total_spin_duration(&self, reel_count: usize) -> f64 {
        self.reel_duration(reel_count.saturating_sub(1))
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self::normal()
    }
}

/// On-disk form of [`TimingConfig`]
#[derive(Default, Deserialize)]
#[serde(default)]
struct TimingConfigDef {
    profile: TimingProfile,
    reel_spin_duration_ms: Option<f64>,
    reel_stop_interval_ms: Option<f64>,
}

impl From<TimingConfigDef> for TimingConfig {
    fn from(def: TimingConfigDef) -> Self {
        let preset = Self::from_profile(def.profile);
        let config = Self {
            profile: def.profile,
            reel_spin_duration_ms: def
                .reel_spin_duration_ms
                .unwrap_or(preset.reel_spin_duration_ms),
            reel_stop_interval_ms: def
                .reel_stop_interval_ms
                .unwrap_or(preset.reel_stop_interval_ms),
        };

        if config.reel_spin_duration_ms != preset.reel_spin_duration_ms
            || config.reel_stop_interval_ms != preset.reel_stop_interval_ms
        {
            Self {
                profile: TimingProfile::Custom,
                ..config
            }
        } else {
            config
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_profiles() {
        let normal = TimingConfig::normal();
        let turbo = TimingConfig::turbo();
        let mobile = TimingConfig::mobile();
        let studio = TimingConfig::studio();

        assert!(turbo.reel_spin_duration_ms < normal.reel_spin_duration_ms);
        assert!(mobile.reel_spin_duration_ms < normal.reel_spin_duration_ms);
        assert!(turbo.reel_spin_duration_ms < mobile.reel_spin_duration_ms);
        assert!(studio.reel_spin_duration_ms < turbo.reel_spin_duration_ms);

        for config in [normal, turbo, mobile, studio] {
            assert!(config.reel_stop_interval_ms > 0.0);
        }
    }

    #[test]
    fn test_reel_durations_stagger() {
        let config = TimingConfig::normal();
        assert_eq!(config.reel_duration(0), 2500.0);
        assert_eq!(config.reel_duration(2), 3700.0);
        assert_eq!(config.total_spin_duration(3), 3700.0);
        assert_eq!(config.total_spin_duration(0), 2500.0);
    }

    #[test]
    fn test_scaled_is_custom() {
        let half = TimingConfig::normal().scaled(0.5);
        assert_eq!(half.profile, TimingProfile::Custom);
        assert_eq!(half.reel_spin_duration_ms, 1250.0);
        assert_eq!(half.reel_stop_interval_ms, 300.0);
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("Turbo".parse::<TimingProfile>().unwrap(), TimingProfile::Turbo);
        assert_eq!(TimingProfile::Studio.to_string(), "studio");
        assert!("warp".parse::<TimingProfile>().is_err());
    }

    #[test]
    fn test_profile_fills_missing_durations() {
        let turbo: TimingConfig = serde_json::from_str(r#"{"profile": "turbo"}"#).unwrap();
        assert_eq!(turbo, TimingConfig::turbo());

        let studio: TimingConfig = serde_json::from_str(r#"{"profile": "studio"}"#).unwrap();
        assert_eq!(studio, TimingConfig::studio());

        let empty: TimingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, TimingConfig::normal());
    }

    #[test]
    fn test_overridden_duration_is_custom() {
        let json = r#"{"profile": "mobile", "reel_stop_interval_ms": 100}"#;
        let config: TimingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.profile, TimingProfile::Custom);
        assert_eq!(config.reel_spin_duration_ms, 1800.0);
        assert_eq!(config.reel_stop_interval_ms, 100.0);

        // Values equal to the preset keep the profile name
        let json = r#"{"profile": "turbo", "reel_spin_duration_ms": 1200}"#;
        let config: TimingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config, TimingConfig::turbo());
    }
}

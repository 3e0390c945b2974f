//! Card stack tuning: thresholds, geometry, and animation timings.
//!
//! Defaults reproduce the feel of the mobile app. Any subset can be
//! overridden from a TOML file; missing keys keep their defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Errors loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Gesture and animation parameters for a card stack.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackConfig {
    /// Minimum |dx| at release that commits. Exclusive.
    pub commit_threshold: f32,
    /// If set, the threshold is this fraction of `screen_width` instead.
    pub commit_threshold_fraction: Option<f32>,
    /// Width of the drag surface; the rotation range spans ±this.
    pub screen_width: f32,
    /// Rotation at a full-width drag, in degrees.
    pub max_rotation_deg: f32,
    /// Rotation the card reaches as it leaves on commit.
    pub exit_rotation_deg: f32,
    /// |dx| past which the decision overlay starts to show.
    pub overlay_activation: f32,
    pub commit_duration_ms: u64,
    pub settle_duration_ms: u64,
    pub flip_duration_ms: u64,
    pub promote_duration_ms: u64,
    /// Opacity fade while a committed card leaves.
    pub fade_duration_ms: u64,
}

impl Default for StackConfig {
    fn default() -> Self {
        StackConfig {
            commit_threshold: 100.0,
            commit_threshold_fraction: None,
            screen_width: 390.0,
            max_rotation_deg: 15.0,
            exit_rotation_deg: 20.0,
            overlay_activation: 20.0,
            commit_duration_ms: 300,
            settle_duration_ms: 400,
            flip_duration_ms: 500,
            promote_duration_ms: 200,
            fade_duration_ms: 200,
        }
    }
}

impl StackConfig {
    /// Effective commit threshold.
    pub fn threshold(&self) -> f32 {
        match self.commit_threshold_fraction {
            Some(fraction) => fraction * self.screen_width,
            None => self.commit_threshold,
        }
    }

    pub fn commit_duration(&self) -> Duration {
        Duration::from_millis(self.commit_duration_ms)
    }

    pub fn settle_duration(&self) -> Duration {
        Duration::from_millis(self.settle_duration_ms)
    }

    pub fn flip_duration(&self) -> Duration {
        Duration::from_millis(self.flip_duration_ms)
    }

    pub fn promote_duration(&self) -> Duration {
        Duration::from_millis(self.promote_duration_ms)
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    /// Reject values that would make the gesture math degenerate.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.screen_width > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "screen_width must be positive, got {}",
                self.screen_width
            )));
        }
        if !(self.threshold() > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "commit threshold must be positive, got {}",
                self.threshold()
            )));
        }
        if let Some(fraction) = self.commit_threshold_fraction {
            if fraction > 1.0 {
                return Err(ConfigError::Invalid(format!(
                    "commit_threshold_fraction must be at most 1.0, got {}",
                    fraction
                )));
            }
        }
        if !self.overlay_activation.is_finite()
            || self.overlay_activation < 0.0
            || self.overlay_activation >= self.threshold()
        {
            return Err(ConfigError::Invalid(format!(
                "overlay_activation must be in [0, threshold), got {}",
                self.overlay_activation
            )));
        }
        if !(self.max_rotation_deg.is_finite() && self.max_rotation_deg >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_rotation_deg must be a non-negative number, got {}",
                self.max_rotation_deg
            )));
        }
        Ok(())
    }
}

/// Parse a config from TOML text.
pub fn parse_config(text: &str, origin: &str) -> Result<StackConfig, ConfigError> {
    let config: StackConfig = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: origin.to_string(),
        source,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<StackConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text, &path.display().to_string())
}

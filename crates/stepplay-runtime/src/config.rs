#![forbid(unsafe_code)]

//! Playback configuration.
//!
//! # Loading
//!
//! ```toml
//! # stepplay.toml
//! speed_ms = 250
//! manual_step = "ignore"
//!
//! [limits]
//! max_len = 32
//! ```
//!
//! ```rust,ignore
//! let config = PlaybackConfig::from_toml_file("stepplay.toml")?;
//! let config = PlaybackConfig::from_json_str(json)?;
//! ```
//!
//! Loaders run [`PlaybackConfig::validate`] and refuse out-of-range values.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stepplay_core::Limits;

/// What a Step request does while playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManualStepPolicy {
    /// Pause, then perform the step.
    #[default]
    PauseFirst,
    /// Refuse the step and keep playing.
    Ignore,
}

/// Tunables for a [`PlaybackController`](crate::PlaybackController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial interval between auto-advance ticks.
    pub speed_ms: u64,
    /// Lower clamp for speed changes.
    pub min_speed_ms: u64,
    /// Upper clamp for speed changes.
    pub max_speed_ms: u64,
    /// Step-while-playing policy.
    pub manual_step: ManualStepPolicy,
    /// Entries kept by the step log.
    pub log_capacity: usize,
    /// Producer input limits.
    pub limits: Limits,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed_ms: 500,
            min_speed_ms: 10,
            max_speed_ms: 5_000,
            manual_step: ManualStepPolicy::PauseFirst,
            log_capacity: 256,
            limits: Limits::default(),
        }
    }
}

impl PlaybackConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-toml")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-toml")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Fluent speed setter.
    #[must_use]
    pub fn with_speed_ms(mut self, speed_ms: u64) -> Self {
        self.speed_ms = speed_ms;
        self
    }

    /// Fluent policy setter.
    #[must_use]
    pub fn with_manual_step(mut self, policy: ManualStepPolicy) -> Self {
        self.manual_step = policy;
        self
    }

    /// Fluent limits setter.
    #[must_use]
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Validate all parameters.
    ///
    /// Returns a list of violations; empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.min_speed_ms == 0 {
            errors.push("min_speed_ms must be > 0".into());
        }
        if self.min_speed_ms > self.max_speed_ms {
            errors.push(format!(
                "min_speed_ms ({}) must be <= max_speed_ms ({})",
                self.min_speed_ms, self.max_speed_ms
            ));
        }
        if !(self.min_speed_ms..=self.max_speed_ms).contains(&self.speed_ms) {
            errors.push(format!(
                "speed_ms must be in [{}, {}], got {}",
                self.min_speed_ms, self.max_speed_ms, self.speed_ms
            ));
        }
        if self.log_capacity == 0 {
            errors.push("log_capacity must be > 0".into());
        }
        if self.limits.max_len == 0 {
            errors.push("limits.max_len must be > 0".into());
        }
        if self.limits.max_abs_value <= 0 {
            errors.push(format!(
                "limits.max_abs_value must be > 0, got {}",
                self.limits.max_abs_value
            ));
        } else if self.limits.sum_bound().is_none() {
            errors.push(format!(
                "limits.max_len * limits.max_abs_value must fit in i64, got {} * {}",
                self.limits.max_len, self.limits.max_abs_value
            ));
        }
        errors
    }

    /// Clamp `ms` into the configured speed range.
    #[must_use]
    pub fn clamp_speed(&self, ms: u64) -> Duration {
        let lo = self.min_speed_ms.max(1);
        let hi = self.max_speed_ms.max(lo);
        Duration::from_millis(ms.clamp(lo, hi))
    }

    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors that can occur when loading a playback configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-toml")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation errors.
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}

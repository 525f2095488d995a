//! Health engine configuration loading
//!
//! Loads policy constants from `~/.config/buildwatch/health.toml` (or
//! `BUILDWATCH_HEALTH_CONFIG` env). Every field has a default, so an absent or
//! partial file is valid.

use crate::errors::{HealthError, Result};
use chrono::Duration;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Root configuration for the health engine
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct HealthConfig {
    /// Quality score settings
    #[serde(default)]
    pub quality: QualityConfig,

    /// Risk bucket thresholds
    #[serde(default)]
    pub risk: RiskThresholds,

    /// Activity recency settings
    #[serde(default)]
    pub activity: ActivityConfig,
}

/// Quality score configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct QualityConfig {
    /// Base score used when a record carries none
    #[serde(default = "default_base_score")]
    pub default_base_score: f64,

    /// Per-issue deductions by issue type
    #[serde(default)]
    pub deductions: DeductionWeights,
}

fn default_base_score() -> f64 {
    10.0
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            default_base_score: default_base_score(),
            deductions: DeductionWeights::default(),
        }
    }
}

/// Score deducted for each unresolved issue, keyed by issue type
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DeductionWeights {
    #[serde(default = "default_progress_deduction")]
    pub progress: f64,

    #[serde(default = "default_quality_deduction")]
    pub quality: f64,

    #[serde(default = "default_safety_deduction")]
    pub safety: f64,

    #[serde(default = "default_other_deduction")]
    pub other: f64,
}

fn default_progress_deduction() -> f64 {
    0.5
}
fn default_quality_deduction() -> f64 {
    1.0
}
fn default_safety_deduction() -> f64 {
    2.0
}
fn default_other_deduction() -> f64 {
    0.1
}

impl Default for DeductionWeights {
    fn default() -> Self {
        Self {
            progress: default_progress_deduction(),
            quality: default_quality_deduction(),
            safety: default_safety_deduction(),
            other: default_other_deduction(),
        }
    }
}

/// Lower bounds (inclusive) of each risk bucket, evaluated high to low.
/// Scores below `high` are critical.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RiskThresholds {
    #[serde(default = "default_low_threshold")]
    pub low: f64,

    #[serde(default = "default_medium_threshold")]
    pub medium: f64,

    #[serde(default = "default_high_threshold")]
    pub high: f64,
}

fn default_low_threshold() -> f64 {
    8.0
}
fn default_medium_threshold() -> f64 {
    6.0
}
fn default_high_threshold() -> f64 {
    4.0
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: default_low_threshold(),
            medium: default_medium_threshold(),
            high: default_high_threshold(),
        }
    }
}

/// Activity recency configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ActivityConfig {
    /// A project whose latest report is at most this old counts as active
    #[serde(default = "default_recency_window_hours")]
    pub recency_window_hours: i64,
}

fn default_recency_window_hours() -> i64 {
    72
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            recency_window_hours: default_recency_window_hours(),
        }
    }
}

impl ActivityConfig {
    /// The recency window as a duration, saturating at `Duration::MAX`
    pub fn recency_window(&self) -> Duration {
        Duration::try_hours(self.recency_window_hours).unwrap_or(Duration::MAX)
    }
}

impl HealthConfig {
    /// Environment variable for config path override
    pub const ENV_CONFIG_PATH: &'static str = "BUILDWATCH_HEALTH_CONFIG";

    /// Default config filename
    pub const DEFAULT_CONFIG_FILENAME: &'static str = "health.toml";

    /// Load configuration from file
    ///
    /// Resolution order:
    /// 1. `BUILDWATCH_HEALTH_CONFIG` environment variable
    /// 2. `~/.config/buildwatch/health.toml`
    ///
    /// If the config file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let path = Self::resolve_config_path();

        if !path.exists() {
            tracing::info!(
                path = %path.display(),
                "Health config not found, using defaults"
            );
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HealthError::config_with_source(
                format!("failed to read config at {}", path.display()),
                e,
            )
        })?;

        Self::parse(&contents)
    }

    /// Parse configuration from TOML string
    pub fn parse(contents: &str) -> Result<Self> {
        let cfg: HealthConfig = toml::from_str(contents)
            .map_err(|e| HealthError::config_with_source("failed to parse config", e))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve the configuration file path
    fn resolve_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(Self::ENV_CONFIG_PATH) {
            return PathBuf::from(path);
        }

        dirs::home_dir()
            .map(|h| {
                h.join(".config")
                    .join("buildwatch")
                    .join(Self::DEFAULT_CONFIG_FILENAME)
            })
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_CONFIG_FILENAME))
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let d = &self.quality.deductions;
        for (name, weight) in [
            ("progress", d.progress),
            ("quality", d.quality),
            ("safety", d.safety),
            ("other", d.other),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(HealthError::config(format!(
                    "deduction for `{name}` must be a non-negative number, got {weight}"
                )));
            }
        }

        let r = &self.risk;
        let in_range = |v: f64| (0.0..=10.0).contains(&v);
        if !(in_range(r.low) && in_range(r.medium) && in_range(r.high)) {
            return Err(HealthError::config(
                "risk thresholds must lie within [0, 10]",
            ));
        }
        if !(r.low > r.medium && r.medium > r.high) {
            return Err(HealthError::config(format!(
                "risk thresholds must be strictly descending (low > medium > high), got {} / {} / {}",
                r.low, r.medium, r.high
            )));
        }

        let hours = self.activity.recency_window_hours;
        if hours <= 0 {
            return Err(HealthError::config(
                "activity.recency_window_hours must be positive",
            ));
        }
        if Duration::try_hours(hours).is_none() {
            return Err(HealthError::config(format!(
                "activity.recency_window_hours is out of range, got {hours}"
            )));
        }

        if !self.quality.default_base_score.is_finite() {
            return Err(HealthError::config(format!(
                "quality.default_base_score must be a finite number, got {}",
                self.quality.default_base_score
            )));
        }
        if !(0.0..=10.0).contains(&self.quality.default_base_score) {
            tracing::warn!(
                default_base_score = self.quality.default_base_score,
                "Default base score outside [0, 10]; scores will be clamped"
            );
        }

        Ok(())
    }
}

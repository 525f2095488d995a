//! Health engine error types
//!
//! Two tiers:
//! - [`HealthError`] is raised only outside the pure core (config loading,
//!   snapshot parsing).
//! - [`Degradation`] records a problem the core recovered from locally. These
//!   are attached to views and logged, never returned as errors.

use serde::Serialize;
use thiserror::Error;

/// Error category for structured logging and behavior mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// `health.toml` or env misconfigured
    ConfigError,
    /// Record snapshot could not be read or parsed
    InputError,
}

impl ErrorCategory {
    /// Machine-readable code for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigError => "CONFIG_ERROR",
            Self::InputError => "INPUT_ERROR",
        }
    }
}

/// Health engine error with category and context
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("input error: {message}")]
    Input {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl HealthError {
    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config { .. } => ErrorCategory::ConfigError,
            Self::Input { .. } => ErrorCategory::InputError,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an input error with source
    pub fn input_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Input {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type for health engine operations
pub type Result<T> = std::result::Result<T, HealthError>;

/// A malformed input the engine substituted a safe default for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Degradation {
    /// Timestamp was neither a recognized date form nor convertible; the
    /// epoch origin was used instead.
    MalformedTimestamp { field: &'static str },
    /// Label outside its closed set; ranked / weighted as 0.
    UnknownEnumValue { field: &'static str, value: String },
    /// Sort option string not in the closed set; default sort used.
    InvalidSortOption { value: String },
}

impl Degradation {
    /// Machine-readable code for logging
    pub fn code(&self) -> &'static str {
        match self {
            Self::MalformedTimestamp { .. } => "MALFORMED_TIMESTAMP",
            Self::UnknownEnumValue { .. } => "UNKNOWN_ENUM_VALUE",
            Self::InvalidSortOption { .. } => "INVALID_SORT_OPTION",
        }
    }
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedTimestamp { field } => write!(f, "malformed timestamp in `{field}`"),
            Self::UnknownEnumValue { field, value } => {
                write!(f, "unknown value `{value}` in `{field}`")
            }
            Self::InvalidSortOption { value } => write!(f, "invalid sort option `{value}`"),
        }
    }
}

//! Error types for the configuration boundary.
//!
//! The simulation core never fails; only config mutation validates input.

use thiserror::Error;

/// Rejected configuration value. The previous value stays in effect.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value is NaN or infinite.
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },

    /// Value is finite but outside the accepted range.
    #[error("{field} out of range (got {value}): {reason}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Config file could not be parsed.
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Convenience alias for `Result<T, ConfigError>`.
pub type ConfigResult<T> = Result<T, ConfigError>;

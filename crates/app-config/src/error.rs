//! Configuration Error Types

use thiserror::Error;

/// Errors while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Underlying source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// HDI thresholds are not strictly increasing inside (0, 1)
    #[error("Invalid HDI thresholds: medium={medium}, high={high}, very_high={very_high}")]
    InvalidThresholds {
        medium: f64,
        high: f64,
        very_high: f64,
    },

    /// A feature range has min > max or a default outside it
    #[error("Invalid range for {name}: [{min}, {max}] with default {default}")]
    InvalidRange {
        name: String,
        min: f64,
        max: f64,
        default: f64,
    },

    /// Two feature ranges share a name
    #[error("Duplicate feature range: {0}")]
    DuplicateRange(String),

    /// Happiness label table has the wrong number of entries
    #[error("Expected {expected} happiness labels, got {actual}")]
    HappinessLabels { expected: usize, actual: usize },
}

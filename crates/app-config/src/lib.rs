//! Application Configuration
//!
//! Immutable configuration shared by the feature engineer, the predictor and
//! the presentation layer. Built once at startup and passed by reference.

mod error;
mod ranges;
mod settings;
mod thresholds;

pub use error::ConfigError;
pub use ranges::{FeatureRange, PredictionForm};
pub use settings::{AppConfig, LogFormat, LoggingConfig, PathsConfig, Theme};
pub use thresholds::{HappinessLevels, HdiCategory, HdiThresholds};

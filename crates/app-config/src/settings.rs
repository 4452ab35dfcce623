//! Application Settings

use crate::ranges::{default_ranges, happiness_form_fields, hdi_form_fields, validate_ranges};
use crate::{ConfigError, FeatureRange, HappinessLevels, HdiThresholds, PredictionForm};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable prefix, e.g. `DEVPREDICT__LOGGING__LEVEL=debug`
const ENV_PREFIX: &str = "DEVPREDICT";

/// Filesystem locations of model artifacts and the analysis dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of `classification/` and `regression/` artifact directories
    pub models_dir: PathBuf,
    /// Directory holding the exploratory dataset
    pub data_dir: PathBuf,
    /// Dataset file name inside `data_dir`
    pub dataset_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("saved_models"),
            data_dir: PathBuf::from("data"),
            dataset_file: "sample_dataset.csv".to_string(),
        }
    }
}

/// Card and chart colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    /// Main series color
    pub primary: String,
    /// De-emphasized series color
    pub muted: String,
    /// Body text on cards
    pub text: String,
    /// Neutral card background
    pub card_background: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: "#1f77b4".to_string(),
            muted: "#cccccc".to_string(),
            text: "black".to_string(),
            card_background: "#f5f5f5".to_string(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Maximum level (`error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub title: String,
    pub paths: PathsConfig,
    pub theme: Theme,
    pub logging: LoggingConfig,
    /// HDI band boundaries
    pub hdi_thresholds: HdiThresholds,
    /// Labels for happiness levels 1..=8
    pub happiness_levels: HappinessLevels,
    /// Shared indicator ranges; formula fallbacks for absent inputs
    pub feature_ranges: Vec<FeatureRange>,
    /// Fields and defaults of the HDI form
    pub hdi_form: Vec<FeatureRange>,
    /// Fields and defaults of the happiness form
    pub happiness_form: Vec<FeatureRange>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Global Development Predictor".to_string(),
            paths: PathsConfig::default(),
            theme: Theme::default(),
            logging: LoggingConfig::default(),
            hdi_thresholds: HdiThresholds::default(),
            happiness_levels: HappinessLevels::default(),
            feature_ranges: default_ranges(),
            hdi_form: hdi_form_fields(),
            happiness_form: happiness_form_fields(),
        }
    }
}

impl AppConfig {
    /// Load configuration: built-in defaults, then an optional TOML file,
    /// then `DEVPREDICT__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Reading configuration file {}", path.display());
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: AppConfig = builder.build()?.try_deserialize()?;
        settings.validate()?;

        info!(
            "Configuration loaded: {} feature ranges, models in {}",
            settings.feature_ranges.len(),
            settings.paths.models_dir.display()
        );
        Ok(settings)
    }

    /// Check thresholds, label table, shared ranges and form fields
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hdi_thresholds.validate()?;
        self.happiness_levels.validate()?;
        validate_ranges(&self.feature_ranges)?;
        validate_ranges(&self.hdi_form)?;
        validate_ranges(&self.happiness_form)
    }

    /// Fields collected by a prediction form
    pub fn form_fields(&self, form: PredictionForm) -> &[FeatureRange] {
        match form {
            PredictionForm::Hdi => &self.hdi_form,
            PredictionForm::Happiness => &self.happiness_form,
        }
    }

    /// Range for a named indicator
    pub fn feature_range(&self, name: &str) -> Option<&FeatureRange> {
        self.feature_ranges.iter().find(|r| r.name == name)
    }

    /// Form default values as (name, value) pairs
    pub fn feature_defaults(&self) -> impl Iterator<Item = (&str, f64)> {
        self.feature_ranges
            .iter()
            .map(|r| (r.name.as_str(), r.default))
    }

    /// Full path of the exploratory dataset
    pub fn dataset_path(&self) -> PathBuf {
        self.paths.data_dir.join(&self.paths.dataset_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.feature_ranges.len(), 20);
        assert_eq!(config.form_fields(PredictionForm::Hdi).len(), 28);
        assert_eq!(config.form_fields(PredictionForm::Happiness).len(), 20);
        assert_eq!(config.dataset_path(), PathBuf::from("data/sample_dataset.csv"));
    }

    #[test]
    fn test_feature_range_lookup() {
        let config = AppConfig::default();
        let gdp = config.feature_range("GDP_per_Capita_USD").unwrap();
        assert_eq!(gdp.default, 20_000.0);
        assert!(config.feature_range("Olympic_Medals_Count").is_none());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
title = "Test Predictor"

[logging]
level = "debug"
format = "json"

[hdi_thresholds]
medium = 0.5
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.title, "Test Predictor");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.hdi_thresholds.medium, 0.5);
        assert_eq!(config.hdi_thresholds.high, 0.70);
        assert_eq!(config.happiness_levels.len(), 8);
    }

    #[test]
    fn test_load_rejects_bad_thresholds() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[hdi_thresholds]
medium = 0.9
"#
        )
        .unwrap();

        let err = AppConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_duplicate_range_rejected() {
        let mut config = AppConfig::default();
        config
            .feature_ranges
            .push(FeatureRange::new("HDI_Index", 0.0, 1.0, 0.01, 0.5));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DuplicateRange(name)) if name == "HDI_Index"
        ));
    }

    #[test]
    fn test_invalid_form_field_rejected() {
        let mut config = AppConfig::default();
        config
            .hdi_form
            .push(FeatureRange::new("Carbon_Footprint", 0.0, 25.0, 0.1, 30.0));
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.happiness_form[0].default = 2.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRange { name, .. }) if name == "HDI_Index"
        ));
    }

    #[test]
    fn test_theme_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[theme]\nprimary = \"#336699\"").unwrap();
        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.theme.primary, "#336699");
        assert_eq!(config.theme.muted, Theme::default().muted);
    }
}

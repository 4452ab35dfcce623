//! Range Validator for Form Inputs

use crate::error::ValidationError;
use app_config::{AppConfig, FeatureRange};
use feature_engine::RawInput;
use tracing::{debug, warn};

/// Result of validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields that had a configured range
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Checks raw form input against configured feature ranges.
///
/// Indicators without a configured range are accepted as-is.
pub struct Validator {
    ranges: Vec<FeatureRange>,
}

impl Validator {
    /// Create a validator over the configured ranges
    pub fn new(config: &AppConfig) -> Self {
        Self::with_ranges(config.feature_ranges.clone())
    }

    /// Create a validator over explicit ranges
    pub fn with_ranges(ranges: Vec<FeatureRange>) -> Self {
        Self { ranges }
    }

    fn range(&self, field: &str) -> Option<&FeatureRange> {
        self.ranges.iter().find(|r| r.name == field)
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &str,
        value: f64,
        range: &FeatureRange,
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                field: field.to_string(),
                value,
            });
        }
        if !range.contains(value) {
            return Err(ValidationError::OutOfRange {
                field: field.to_string(),
                value,
                min: range.min,
                max: range.max,
            });
        }
        Ok(())
    }

    /// Validate one named indicator; unknown names pass
    pub fn validate_value(&self, field: &str, value: f64) -> Result<(), ValidationError> {
        match self.range(field) {
            Some(range) => self.validate_range(field, value, range),
            None if !value.is_finite() => Err(ValidationError::NonFinite {
                field: field.to_string(),
                value,
            }),
            None => Ok(()),
        }
    }

    /// Validate every indicator in the input
    pub fn validate(&self, input: &RawInput) -> ValidationResult {
        let mut errors = Vec::new();
        let mut fields_checked = 0;

        for (field, value) in input.iter() {
            if self.range(field).is_some() {
                fields_checked += 1;
            }
            if let Err(e) = self.validate_value(field, value) {
                debug!("Validation failed: {}", e);
                errors.push(e);
            }
        }

        if errors.is_empty() {
            ValidationResult::valid(fields_checked)
        } else {
            ValidationResult::invalid(errors, fields_checked)
        }
    }

    /// Clamp ranged indicators into bounds the way a slider would,
    /// returning the names of adjusted fields. Non-finite ranged values
    /// are reset to the field default.
    pub fn clamp(&self, input: &mut RawInput) -> Vec<String> {
        let mut adjusted = Vec::new();

        for (field, value) in input.values_mut() {
            let Some(range) = self.ranges.iter().find(|r| r.name == field) else {
                continue;
            };
            let fixed = if value.is_finite() {
                range.clamp(*value)
            } else {
                range.default
            };
            if fixed != *value {
                warn!("{} adjusted from {} to {}", field, value, fixed);
                *value = fixed;
                adjusted.push(field.to_string());
            }
        }

        adjusted
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

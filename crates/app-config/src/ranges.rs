//! Form Input Ranges

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Allowed range, slider step and form default for one indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    /// Indicator column name
    pub name: String,
    /// Smallest accepted value
    pub min: f64,
    /// Largest accepted value
    pub max: f64,
    /// Widget step
    pub step: f64,
    /// Pre-filled form value
    pub default: f64,
}

impl FeatureRange {
    /// Create a new range
    pub fn new(name: &str, min: f64, max: f64, step: f64, default: f64) -> Self {
        Self {
            name: name.to_string(),
            min,
            max,
            step,
            default,
        }
    }

    /// Whether a value lies inside the range (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value into the range
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.min > self.max || !self.contains(self.default) || self.step < 0.0 {
            return Err(ConfigError::InvalidRange {
                name: self.name.clone(),
                min: self.min,
                max: self.max,
                default: self.default,
            });
        }
        Ok(())
    }
}

/// Prediction form a set of fields belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionForm {
    /// Inputs for the HDI regressor
    Hdi,
    /// Inputs for the happiness classifier
    Happiness,
}

/// Check each range and reject repeated names
pub(crate) fn validate_ranges(ranges: &[FeatureRange]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for range in ranges {
        range.validate()?;
        if !seen.insert(range.name.as_str()) {
            return Err(ConfigError::DuplicateRange(range.name.clone()));
        }
    }
    Ok(())
}

/// Shared indicator ranges, the fallbacks for derived-feature formulas
pub(crate) fn default_ranges() -> Vec<FeatureRange> {
    vec![
        FeatureRange::new("HDI_Index", 0.0, 1.0, 0.01, 0.7),
        FeatureRange::new("GDP_per_Capita_USD", 500.0, 100_000.0, 500.0, 20_000.0),
        FeatureRange::new("Life_Expectancy_years", 40.0, 90.0, 0.5, 75.0),
        FeatureRange::new("Literacy_Rate_pct", 20.0, 100.0, 1.0, 85.0),
        FeatureRange::new("Internet_Access_pct", 0.0, 100.0, 1.0, 70.0),
        FeatureRange::new("Gender_Equality_Index", 0.0, 100.0, 1.0, 70.0),
        FeatureRange::new("Unemployment_Rate_pct", 0.0, 50.0, 0.5, 5.0),
        FeatureRange::new("Days_engaged_in_warfare_per_year", 0.0, 365.0, 1.0, 0.0),
        FeatureRange::new("Higher_Education_Rate", 0.0, 100.0, 1.0, 40.0),
        FeatureRange::new("Medical_Doctors_per_1000", 0.0, 10.0, 0.1, 2.5),
        FeatureRange::new("R_and_D_Expenditure_pct_GDP", 0.0, 10.0, 0.1, 2.0),
        FeatureRange::new("Number_of_Startups", 0.0, 100_000.0, 100.0, 5_000.0),
        FeatureRange::new("Trade_Partners_Count", 0.0, 250.0, 5.0, 100.0),
        FeatureRange::new("Import_Rank_Global", 1.0, 200.0, 1.0, 50.0),
        FeatureRange::new("Export_Rank_Global", 1.0, 200.0, 1.0, 50.0),
        FeatureRange::new("Number_of_Patents", 0.0, 100_000.0, 100.0, 10_000.0),
        FeatureRange::new("Defence_expenditure_on_GDP", 0.0, 15.0, 0.1, 2.0),
        FeatureRange::new("Number_of_PhD_holders_per_million", 0.0, 1500.0, 10.0, 200.0),
        FeatureRange::new("Immigration_Rate", 0.0, 30.0, 0.5, 3.0),
        FeatureRange::new("Migration_Rate", -10.0, 30.0, 0.5, 2.0),
    ]
}

/// Fields of the HDI form, including the indicators only the regressor uses
pub(crate) fn hdi_form_fields() -> Vec<FeatureRange> {
    vec![
        // Economic
        FeatureRange::new("Population", 100_000.0, 1_500_000_000.0, 1_000_000.0, 50_000_000.0),
        FeatureRange::new("GDP_per_Capita_USD", 500.0, 150_000.0, 500.0, 25_000.0),
        FeatureRange::new("Unemployment_Rate_pct", 0.0, 50.0, 0.5, 5.0),
        FeatureRange::new("Trade_Partners_Count", 0.0, 250.0, 5.0, 100.0),
        FeatureRange::new("Import_Rank_Global", 1.0, 200.0, 1.0, 50.0),
        FeatureRange::new("Export_Rank_Global", 1.0, 200.0, 1.0, 50.0),
        // Social
        FeatureRange::new("Life_Expectancy_years", 40.0, 90.0, 0.5, 75.0),
        FeatureRange::new("Medical_Doctors_per_1000", 0.0, 10.0, 0.1, 2.5),
        FeatureRange::new("Gender_Equality_Index", 0.0, 100.0, 1.0, 70.0),
        FeatureRange::new("Days_engaged_in_warfare_per_year", 0.0, 365.0, 1.0, 0.0),
        FeatureRange::new("Immigration_Rate", 0.0, 30.0, 0.5, 3.0),
        FeatureRange::new("Migration_Rate", -10.0, 30.0, 0.5, 2.0),
        // Education
        FeatureRange::new("Literacy_Rate_pct", 20.0, 100.0, 1.0, 85.0),
        FeatureRange::new("Higher_Education_Rate", 0.0, 100.0, 1.0, 40.0),
        FeatureRange::new("Number_of_PhD_holders_per_million", 0.0, 1500.0, 10.0, 200.0),
        FeatureRange::new("Govt_Education_Expenditure_pct_GDP", 0.0, 15.0, 0.1, 5.0),
        // Technology
        FeatureRange::new("Internet_Access_pct", 0.0, 100.0, 1.0, 70.0),
        FeatureRange::new("Number_of_Patents", 0.0, 200_000.0, 100.0, 10_000.0),
        FeatureRange::new("Number_of_Startups", 0.0, 100_000.0, 100.0, 5_000.0),
        FeatureRange::new("R_and_D_Expenditure_pct_GDP", 0.0, 10.0, 0.1, 2.0),
        // 0 none .. 4 leading
        FeatureRange::new("Space_Tech_Level_Ordinal", 0.0, 4.0, 1.0, 2.0),
        // Other
        FeatureRange::new("Carbon_Footprint", 0.0, 25.0, 0.1, 5.0),
        FeatureRange::new("Defence_expenditure_on_GDP", 0.0, 15.0, 0.1, 2.0),
        FeatureRange::new("Nuclear_Power_Status", 0.0, 1.0, 1.0, 0.0),
        FeatureRange::new("Olympic_Medals_Count", 0.0, 3000.0, 5.0, 50.0),
        FeatureRange::new("Number_of_Religion", 1.0, 10.0, 1.0, 4.0),
        // 1 very low .. 5 very high
        FeatureRange::new("Regulation_Strictness_Ordinal", 1.0, 5.0, 1.0, 3.0),
        FeatureRange::new("Happiness_Index_Ordinal", 1.0, 8.0, 1.0, 5.0),
    ]
}

/// Fields of the happiness form
pub(crate) fn happiness_form_fields() -> Vec<FeatureRange> {
    vec![
        FeatureRange::new("HDI_Index", 0.0, 1.0, 0.01, 0.75),
        FeatureRange::new("GDP_per_Capita_USD", 500.0, 150_000.0, 500.0, 25_000.0),
        FeatureRange::new("Life_Expectancy_years", 40.0, 90.0, 0.5, 75.0),
        FeatureRange::new("Literacy_Rate_pct", 20.0, 100.0, 1.0, 85.0),
        FeatureRange::new("Internet_Access_pct", 0.0, 100.0, 1.0, 70.0),
        FeatureRange::new("Gender_Equality_Index", 0.0, 100.0, 1.0, 70.0),
        FeatureRange::new("Unemployment_Rate_pct", 0.0, 50.0, 0.5, 5.0),
        FeatureRange::new("Trade_Partners_Count", 0.0, 250.0, 5.0, 100.0),
        FeatureRange::new("Import_Rank_Global", 1.0, 200.0, 1.0, 50.0),
        FeatureRange::new("Export_Rank_Global", 1.0, 200.0, 1.0, 50.0),
        FeatureRange::new("Defence_expenditure_on_GDP", 0.0, 15.0, 0.1, 2.0),
        FeatureRange::new("Days_engaged_in_warfare_per_year", 0.0, 365.0, 1.0, 0.0),
        FeatureRange::new("Higher_Education_Rate", 0.0, 100.0, 1.0, 40.0),
        FeatureRange::new("Number_of_PhD_holders_per_million", 0.0, 1500.0, 10.0, 200.0),
        FeatureRange::new("R_and_D_Expenditure_pct_GDP", 0.0, 10.0, 0.1, 2.0),
        FeatureRange::new("Medical_Doctors_per_1000", 0.0, 10.0, 0.1, 2.5),
        FeatureRange::new("Number_of_Startups", 0.0, 100_000.0, 100.0, 5_000.0),
        FeatureRange::new("Number_of_Patents", 0.0, 200_000.0, 100.0, 10_000.0),
        FeatureRange::new("Immigration_Rate", 0.0, 30.0, 0.5, 3.0),
        FeatureRange::new("Migration_Rate", -10.0, 30.0, 0.5, 2.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        for range in default_ranges() {
            assert!(range.validate().is_ok(), "{} invalid", range.name);
        }
    }

    #[test]
    fn test_form_tables_are_valid() {
        assert!(validate_ranges(&hdi_form_fields()).is_ok());
        assert!(validate_ranges(&happiness_form_fields()).is_ok());
        assert_eq!(hdi_form_fields().len(), 28);
        assert_eq!(happiness_form_fields().len(), 20);
    }

    #[test]
    fn test_form_defaults_differ_from_shared_ranges() {
        let find = |fields: Vec<FeatureRange>, name: &str| {
            fields.into_iter().find(|r| r.name == name).unwrap()
        };
        let gdp = find(hdi_form_fields(), "GDP_per_Capita_USD");
        assert_eq!(gdp.default, 25_000.0);
        assert_eq!(gdp.max, 150_000.0);
        assert_eq!(find(happiness_form_fields(), "HDI_Index").default, 0.75);
        assert_eq!(find(hdi_form_fields(), "Population").default, 50_000_000.0);
        assert!(happiness_form_fields().iter().all(|r| r.name != "Population"));
    }

    #[test]
    fn test_clamp() {
        let range = FeatureRange::new("Migration_Rate", -10.0, 30.0, 0.5, 2.0);
        assert_eq!(range.clamp(-20.0), -10.0);
        assert_eq!(range.clamp(45.0), 30.0);
        assert_eq!(range.clamp(5.0), 5.0);
        assert!(range.contains(-10.0));
        assert!(!range.contains(30.5));
    }

    #[test]
    fn test_default_outside_range_rejected() {
        let range = FeatureRange::new("HDI_Index", 0.0, 1.0, 0.01, 1.5);
        assert!(range.validate().is_err());
    }
}

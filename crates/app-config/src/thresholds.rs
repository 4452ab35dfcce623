//! HDI Bands and Happiness Labels

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Number of ordinal happiness levels (1..=8)
pub const HAPPINESS_LEVEL_COUNT: usize = 8;

/// Label returned for a level outside the configured table
const UNKNOWN_LABEL: &str = "Unknown";

/// Development band of an HDI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HdiCategory {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl HdiCategory {
    /// All categories from lowest to highest
    pub const ALL: [HdiCategory; 4] = [
        HdiCategory::Low,
        HdiCategory::Medium,
        HdiCategory::High,
        HdiCategory::VeryHigh,
    ];

    /// Display name
    pub fn as_str(&self) -> &'static str {
        match self {
            HdiCategory::Low => "Low",
            HdiCategory::Medium => "Medium",
            HdiCategory::High => "High",
            HdiCategory::VeryHigh => "Very High",
        }
    }

    /// Parse a display name back into a category
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl std::fmt::Display for HdiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of the upper three HDI bands.
///
/// Each band includes its lower bound and excludes the next band's lower
/// bound, so `[0, medium)`, `[medium, high)`, `[high, very_high)` and
/// `[very_high, 1]` partition the unit interval with no gaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdiThresholds {
    /// Start of the Medium band
    pub medium: f64,
    /// Start of the High band
    pub high: f64,
    /// Start of the Very High band
    pub very_high: f64,
}

impl Default for HdiThresholds {
    fn default() -> Self {
        Self {
            medium: 0.55,
            high: 0.70,
            very_high: 0.80,
        }
    }
}

impl HdiThresholds {
    /// Place a value into its band
    pub fn categorize(&self, value: f64) -> HdiCategory {
        if value >= self.very_high {
            HdiCategory::VeryHigh
        } else if value >= self.high {
            HdiCategory::High
        } else if value >= self.medium {
            HdiCategory::Medium
        } else {
            HdiCategory::Low
        }
    }

    /// Inclusive lower and exclusive upper bound of a band (Very High ends at 1.0 inclusive)
    pub fn bounds(&self, category: HdiCategory) -> (f64, f64) {
        match category {
            HdiCategory::Low => (0.0, self.medium),
            HdiCategory::Medium => (self.medium, self.high),
            HdiCategory::High => (self.high, self.very_high),
            HdiCategory::VeryHigh => (self.very_high, 1.0),
        }
    }

    /// Check that the bounds are strictly increasing inside (0, 1)
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ordered = 0.0 < self.medium
            && self.medium < self.high
            && self.high < self.very_high
            && self.very_high < 1.0;
        if ordered {
            Ok(())
        } else {
            Err(ConfigError::InvalidThresholds {
                medium: self.medium,
                high: self.high,
                very_high: self.very_high,
            })
        }
    }
}

/// Display labels for happiness levels 1..=8
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HappinessLevels {
    labels: Vec<String>,
}

impl Default for HappinessLevels {
    fn default() -> Self {
        let labels = [
            "Very Low",
            "Low",
            "Below Average",
            "Average",
            "Above Average",
            "High",
            "Very High",
            "Excellent",
        ];
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
        }
    }
}

impl HappinessLevels {
    /// Build from an explicit label list, level 1 first
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Label for a level, "Unknown" outside the table
    pub fn label(&self, level: i64) -> &str {
        usize::try_from(level)
            .ok()
            .and_then(|l| l.checked_sub(1))
            .and_then(|idx| self.labels.get(idx))
            .map(String::as_str)
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// Iterate over (level, label) pairs
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.labels
            .iter()
            .enumerate()
            .map(|(idx, label)| (idx as i64 + 1, label.as_str()))
    }

    /// Number of configured levels
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Check the table covers exactly eight levels
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.labels.len() == HAPPINESS_LEVEL_COUNT {
            Ok(())
        } else {
            Err(ConfigError::HappinessLabels {
                expected: HAPPINESS_LEVEL_COUNT,
                actual: self.labels.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_band_edges() {
        let t = HdiThresholds::default();
        assert_eq!(t.categorize(0.0), HdiCategory::Low);
        assert_eq!(t.categorize(0.549), HdiCategory::Low);
        assert_eq!(t.categorize(0.5495), HdiCategory::Low);
        assert_eq!(t.categorize(0.55), HdiCategory::Medium);
        assert_eq!(t.categorize(0.699), HdiCategory::Medium);
        assert_eq!(t.categorize(0.70), HdiCategory::High);
        assert_eq!(t.categorize(0.7999), HdiCategory::High);
        assert_eq!(t.categorize(0.80), HdiCategory::VeryHigh);
        assert_eq!(t.categorize(1.0), HdiCategory::VeryHigh);
    }

    #[test]
    fn test_invalid_thresholds() {
        let t = HdiThresholds {
            medium: 0.7,
            high: 0.6,
            very_high: 0.8,
        };
        assert!(t.validate().is_err());
        assert!(HdiThresholds::default().validate().is_ok());
    }

    #[test]
    fn test_happiness_labels() {
        let levels = HappinessLevels::default();
        assert_eq!(levels.label(1), "Very Low");
        assert_eq!(levels.label(8), "Excellent");
        assert_eq!(levels.label(0), "Unknown");
        assert_eq!(levels.label(9), "Unknown");
        assert_eq!(levels.label(-3), "Unknown");
        assert!(levels.validate().is_ok());
        assert!(HappinessLevels::new(vec!["only".into()]).validate().is_err());
    }

    #[test]
    fn test_category_names() {
        for category in HdiCategory::ALL {
            assert_eq!(HdiCategory::from_name(category.as_str()), Some(category));
        }
        assert_eq!(HdiCategory::from_name("Unknown"), None);
    }

    proptest! {
        #[test]
        fn prop_value_lies_within_its_band(v in 0.0f64..=1.0) {
            let t = HdiThresholds::default();
            let category = t.categorize(v);
            let (low, high) = t.bounds(category);
            prop_assert!(v >= low);
            if category == HdiCategory::VeryHigh {
                prop_assert!(v <= high);
            } else {
                prop_assert!(v < high);
            }
            let containing = HdiCategory::ALL
                .iter()
                .filter(|c| {
                    let (lo, hi) = t.bounds(**c);
                    v >= lo && (v < hi || (**c == HdiCategory::VeryHigh && v <= hi))
                })
                .count();
            prop_assert_eq!(containing, 1);
        }
    }
}

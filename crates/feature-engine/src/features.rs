//! Derived Feature Computation

use crate::{FeatureTable, MissingFeatureError, RawInput};
use app_config::AppConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Fallbacks the regression model was trained with for absent indicators
pub const REGRESSION_DEFAULTS: [(&str, f64); 9] = [
    ("Days_engaged_in_warfare_per_year", 0.0),
    ("Internet_Access_pct", 50.0),
    ("Life_Expectancy_years", 70.0),
    ("Medical_Doctors_per_1000", 2.0),
    ("Gender_Equality_Index", 50.0),
    ("Trade_Partners_Count", 100.0),
    ("R_and_D_Expenditure_pct_GDP", 1.0),
    ("Number_of_Patents", 1000.0),
    ("Happiness_Index_Ordinal", 5.0),
];

/// Skewed indicators that get a `<name>_log` column when present
const LOG_COLUMNS: [&str; 4] = [
    "Population",
    "GDP_per_Capita_USD",
    "Olympic_Medals_Count",
    "Carbon_Footprint",
];

/// Which model's feature set to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelTarget {
    /// Happiness level classifier
    Classification,
    /// HDI regressor
    Regression,
}

impl ModelTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelTarget::Classification => "classification",
            ModelTarget::Regression => "regression",
        }
    }
}

impl std::fmt::Display for ModelTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a raw column from the row, then from the optional-field defaults
struct Columns<'a> {
    table: &'a FeatureTable,
    defaults: &'a BTreeMap<String, f64>,
    target: ModelTarget,
}

impl Columns<'_> {
    fn get(&self, name: &str) -> Result<f64, MissingFeatureError> {
        self.table
            .get(name)
            .or_else(|| self.defaults.get(name).copied())
            .ok_or_else(|| MissingFeatureError {
                feature: name.to_string(),
                target: self.target,
            })
    }
}

/// Builds model-ready feature rows.
///
/// Raw columns referenced by a formula fall back to a documented default
/// when absent from the input: the configured form defaults for the
/// classification set and [`REGRESSION_DEFAULTS`] for the regression set.
/// A referenced column with no default is a [`MissingFeatureError`].
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    classification_defaults: BTreeMap<String, f64>,
    regression_defaults: BTreeMap<String, f64>,
}

impl FeatureEngineer {
    /// Create an engineer using the configured form defaults
    pub fn new(config: &AppConfig) -> Self {
        let classification_defaults = config
            .feature_defaults()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        let regression_defaults = REGRESSION_DEFAULTS
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect();
        Self::with_defaults(classification_defaults, regression_defaults)
    }

    /// Create an engineer with explicit optional-field defaults
    pub fn with_defaults(
        classification_defaults: BTreeMap<String, f64>,
        regression_defaults: BTreeMap<String, f64>,
    ) -> Self {
        Self {
            classification_defaults,
            regression_defaults,
        }
    }

    /// Append the sixteen derived columns used by the happiness classifier
    pub fn engineer_classification_features(
        &self,
        table: &FeatureTable,
    ) -> Result<FeatureTable, MissingFeatureError> {
        let c = Columns {
            table,
            defaults: &self.classification_defaults,
            target: ModelTarget::Classification,
        };

        let hdi = c.get("HDI_Index")?;
        let gdp = c.get("GDP_per_Capita_USD")?;
        let life = c.get("Life_Expectancy_years")?;
        let literacy = c.get("Literacy_Rate_pct")?;
        let unemployment = c.get("Unemployment_Rate_pct")?;
        let internet = c.get("Internet_Access_pct")?;
        let higher_ed = c.get("Higher_Education_Rate")?;
        let war_days = c.get("Days_engaged_in_warfare_per_year")?;
        let doctors = c.get("Medical_Doctors_per_1000")?;
        let rnd = c.get("R_and_D_Expenditure_pct_GDP")?;
        let startups = c.get("Number_of_Startups")?;
        let partners = c.get("Trade_Partners_Count")?;
        let import_rank = c.get("Import_Rank_Global")?;
        let export_rank = c.get("Export_Rank_Global")?;
        let patents = c.get("Number_of_Patents")?;
        let defence = c.get("Defence_expenditure_on_GDP")?;
        let phd = c.get("Number_of_PhD_holders_per_million")?;
        let gender = c.get("Gender_Equality_Index")?;
        let immigration = c.get("Immigration_Rate")?;
        let migration = c.get("Migration_Rate")?;

        let mut out = table.clone();

        // Interactions
        out.set("HDI_GDP_interaction", hdi * gdp / 10_000.0);
        out.set("Life_Literacy_interaction", life * literacy / 100.0);

        // Composite indices
        out.set(
            "Economic_Health",
            (gdp / 65_000.0) * (1.0 - unemployment / 100.0),
        );
        out.set(
            "Social_Development",
            (literacy + internet + higher_ed) / 3.0,
        );
        out.set(
            "Stability_Index",
            (100.0 - unemployment) * (365.0 - war_days) / 365.0,
        );
        out.set("Healthcare_Quality", life * doctors);
        out.set("Innovation_Score", (rnd + startups / 5000.0 * 10.0) / 2.0);
        out.set(
            "Trade_Openness",
            partners / (import_rank + export_rank + 1.0),
        );
        out.set("Wellbeing_Score", hdi * life / 80.0);
        out.set("Education_Quality", literacy * higher_ed / 100.0);
        out.set("Digital_Progress", internet * patents / 50_001.0);
        out.set("Economic_Stability", gdp / (unemployment + 1.0));
        out.set(
            "Peace_Index",
            (365.0 - war_days) / 365.0 * (1.0 - defence / 10.0),
        );
        out.set("Human_Capital", phd * literacy / 100.0);
        out.set("Gender_Development", gender * higher_ed);
        out.set("Migration_Balance", immigration - migration);

        debug!(
            "Classification features engineered: {} -> {} columns",
            table.len(),
            out.len()
        );
        Ok(out)
    }

    /// Append log transforms and normalized indices used by the HDI regressor
    pub fn engineer_regression_features(
        &self,
        table: &FeatureTable,
    ) -> Result<FeatureTable, MissingFeatureError> {
        let c = Columns {
            table,
            defaults: &self.regression_defaults,
            target: ModelTarget::Regression,
        };

        let mut out = table.clone();

        // Log transforms only for indicators actually supplied
        for name in LOG_COLUMNS {
            if let Some(value) = table.get(name) {
                out.set(&format!("{name}_log"), value.ln_1p());
            }
        }

        let war_days = c.get("Days_engaged_in_warfare_per_year")?;
        out.set("Peace_Index", (365.0 - war_days) / 365.0);
        out.set("Is_Conflict_Free", if war_days == 0.0 { 1.0 } else { 0.0 });
        out.set("Digital_Index", c.get("Internet_Access_pct")? / 100.0);
        out.set(
            "Healthcare_Index",
            (c.get("Life_Expectancy_years")? - 40.0) / 50.0,
        );
        out.set(
            "Medical_Doctors_norm",
            c.get("Medical_Doctors_per_1000")? / 5.0,
        );
        out.set("Gender_Index", c.get("Gender_Equality_Index")? / 100.0);
        out.set("Trade_Openness", c.get("Trade_Partners_Count")? / 250.0);
        out.set(
            "Innovation_Index",
            (c.get("R_and_D_Expenditure_pct_GDP")? + c.get("Number_of_Patents")? / 100_000.0)
                / 2.0,
        );
        out.set("Happiness_Norm", c.get("Happiness_Index_Ordinal")? / 8.0);

        debug!(
            "Regression features engineered: {} -> {} columns",
            table.len(),
            out.len()
        );
        Ok(out)
    }

    /// Build the exact feature row a model expects.
    ///
    /// Columns in `required_features` that were not produced are set to 0,
    /// columns produced but not required are dropped, and any infinite or
    /// NaN cell is replaced with 0.
    pub fn prepare_input(
        &self,
        raw_input: &RawInput,
        required_features: &[String],
        target: ModelTarget,
    ) -> Result<FeatureTable, MissingFeatureError> {
        let table = FeatureTable::from_raw(raw_input);

        let engineered = match target {
            ModelTarget::Classification => self.engineer_classification_features(&table)?,
            ModelTarget::Regression => self.engineer_regression_features(&table)?,
        };

        let absent: Vec<&str> = required_features
            .iter()
            .filter(|name| !engineered.contains(name))
            .map(String::as_str)
            .collect();
        if !absent.is_empty() {
            debug!("{} required features absent, filled with 0: {:?}", absent.len(), absent);
        }

        let mut prepared = engineered.reindex(required_features);
        let repaired = prepared.sanitize();
        if !repaired.is_empty() {
            warn!("Non-finite feature values replaced with 0: {:?}", repaired);
        }

        Ok(prepared)
    }
}

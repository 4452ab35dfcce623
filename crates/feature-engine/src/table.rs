//! Raw Input and Single-Row Feature Table

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Indicator values collected from a prediction form, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawInput(BTreeMap<String, f64>);

impl RawInput {
    /// Create an empty input
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an indicator value, replacing any previous one
    pub fn insert(&mut self, name: impl Into<String>, value: f64) -> Option<f64> {
        self.0.insert(name.into(), value)
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    /// Look up an indicator
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Remove an indicator
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Overlay `other` on top of `self`; values in `other` win
    pub fn merge(&mut self, other: &RawInput) {
        for (name, value) in other.iter() {
            self.0.insert(name.to_string(), value);
        }
    }

    /// Iterate over (name, value) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Mutable access to values, used by range clamping
    pub fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut f64)> {
        self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Form defaults from the configured feature ranges
    pub fn from_defaults(config: &app_config::AppConfig) -> Self {
        config.feature_defaults().collect()
    }

    /// Defaults of every field a prediction form collects
    pub fn from_form(config: &app_config::AppConfig, form: app_config::PredictionForm) -> Self {
        config
            .form_fields(form)
            .iter()
            .map(|r| (r.name.as_str(), r.default))
            .collect()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for RawInput {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<BTreeMap<String, f64>> for RawInput {
    fn from(map: BTreeMap<String, f64>) -> Self {
        Self(map)
    }
}

/// One row of named feature values with a stable column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureTable {
    columns: Vec<String>,
    values: Vec<f64>,
}

impl FeatureTable {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap raw input into a row, columns in name order
    pub fn from_raw(input: &RawInput) -> Self {
        let (columns, values) = input.iter().map(|(k, v)| (k.to_string(), v)).unzip();
        Self { columns, values }
    }

    /// Value of a column
    pub fn get(&self, name: &str) -> Option<f64> {
        self.position(name).map(|idx| self.values[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Overwrite an existing column or append a new one at the end
    pub fn set(&mut self, name: &str, value: f64) {
        match self.position(name) {
            Some(idx) => self.values[idx] = value,
            None => {
                self.columns.push(name.to_string());
                self.values.push(value);
            }
        }
    }

    /// Column names in order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Values in column order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Iterate over (column, value) pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Select exactly `required` columns in that order. Columns absent from
    /// the row are created with value 0; columns not required are dropped.
    pub fn reindex(&self, required: &[String]) -> FeatureTable {
        let values = required
            .iter()
            .map(|name| self.get(name).unwrap_or(0.0))
            .collect();
        FeatureTable {
            columns: required.to_vec(),
            values,
        }
    }

    /// Replace infinite and NaN cells with 0, returning the repaired column names
    pub fn sanitize(&mut self) -> Vec<String> {
        let mut repaired = Vec::new();
        for (name, value) in self.columns.iter().zip(self.values.iter_mut()) {
            if !value.is_finite() {
                *value = 0.0;
                repaired.push(name.clone());
            }
        }
        repaired
    }

    /// Whether every cell is finite
    pub fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_in_place() {
        let mut table = FeatureTable::new();
        table.set("a", 1.0);
        table.set("b", 2.0);
        table.set("a", 3.0);
        assert_eq!(table.columns(), &["a".to_string(), "b".to_string()]);
        assert_eq!(table.values(), &[3.0, 2.0]);
    }

    #[test]
    fn test_reindex_fills_and_drops() {
        let input = RawInput::new().with("x", 1.5).with("extra", 9.0);
        let table = FeatureTable::from_raw(&input);
        let required = vec!["y".to_string(), "x".to_string()];
        let reindexed = table.reindex(&required);
        assert_eq!(reindexed.columns(), required.as_slice());
        assert_eq!(reindexed.values(), &[0.0, 1.5]);
    }

    #[test]
    fn test_sanitize_reports_repaired_columns() {
        let mut table = FeatureTable::new();
        table.set("ok", 1.0);
        table.set("inf", f64::INFINITY);
        table.set("neg_inf", f64::NEG_INFINITY);
        table.set("nan", f64::NAN);

        let repaired = table.sanitize();
        assert_eq!(repaired, vec!["inf", "neg_inf", "nan"]);
        assert!(table.is_finite());
        assert_eq!(table.values(), &[1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_raw_input_json_shape() {
        let input: RawInput =
            serde_json::from_str(r#"{"GDP_per_Capita_USD": 25000, "HDI_Index": 0.75}"#).unwrap();
        assert_eq!(input.get("GDP_per_Capita_USD"), Some(25000.0));
        assert_eq!(input.len(), 2);
    }

    #[test]
    fn test_form_defaults_cover_form_fields() {
        use app_config::{AppConfig, PredictionForm};
        let config = AppConfig::default();
        let hdi = RawInput::from_form(&config, PredictionForm::Hdi);
        assert_eq!(hdi.len(), 28);
        assert_eq!(hdi.get("Olympic_Medals_Count"), Some(50.0));
        assert_eq!(hdi.get("GDP_per_Capita_USD"), Some(25_000.0));

        let happiness = RawInput::from_form(&config, PredictionForm::Happiness);
        assert_eq!(happiness.get("HDI_Index"), Some(0.75));
        assert_eq!(happiness.get("Population"), None);
    }

    #[test]
    fn test_merge_prefers_overlay() {
        let mut base = RawInput::new().with("a", 1.0).with("b", 2.0);
        base.merge(&RawInput::new().with("b", 5.0).with("c", 7.0));
        assert_eq!(base.get("a"), Some(1.0));
        assert_eq!(base.get("b"), Some(5.0));
        assert_eq!(base.get("c"), Some(7.0));
    }
}

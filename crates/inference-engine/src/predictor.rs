//! Unified Predictor

use crate::model::{ClassificationModel, LoadedModel, ModelKind, RegressionModel};
use crate::InferenceError;
use app_config::{AppConfig, HappinessLevels, HdiCategory, HdiThresholds};
use feature_engine::{FeatureEngineer, ModelTarget, RawInput};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of one prediction, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// HDI score in [0, 1], or the happiness level
    pub value: f64,
    /// Band or level label
    pub category: String,
    /// Probability of the predicted class (classification only)
    pub confidence: Option<f64>,
    /// "Level {n}" -> probability (classification only)
    pub probabilities: Option<BTreeMap<String, f64>>,
    /// Human-readable explanation
    pub interpretation: Option<String>,
}

impl PredictionResult {
    /// The value as an integer happiness level
    pub fn level(&self) -> i64 {
        self.value.round() as i64
    }

    /// HDI band, when the category names one
    pub fn hdi_category(&self) -> Option<HdiCategory> {
        HdiCategory::from_name(&self.category)
    }
}

/// Interpretation for an HDI score in its band
pub fn hdi_interpretation(value: f64, category: HdiCategory) -> String {
    match category {
        HdiCategory::VeryHigh => format!(
            "With an HDI of {value:.3}, this represents very high human development. \
             Countries at this level typically have excellent healthcare, education, and living standards."
        ),
        HdiCategory::High => format!(
            "An HDI of {value:.3} indicates high human development. \
             There's good access to education and healthcare with a decent standard of living."
        ),
        HdiCategory::Medium => format!(
            "An HDI of {value:.3} suggests medium human development. \
             There are opportunities for growth in education, healthcare, and economic development."
        ),
        HdiCategory::Low => format!(
            "An HDI of {value:.3} indicates low human development. \
             Significant investments in education, healthcare, and economic development are needed."
        ),
    }
}

/// Interpretation for a happiness level
pub fn happiness_interpretation(level: i64) -> &'static str {
    if level >= 7 {
        "Excellent happiness levels indicating strong social support, economic stability, and quality of life."
    } else if level >= 5 {
        "Above average happiness with good overall well-being indicators."
    } else if level >= 3 {
        "Moderate happiness levels with room for improvement in various areas."
    } else {
        "Lower happiness levels suggesting challenges in economic, social, or political factors."
    }
}

/// Runs one loaded model against raw form input.
///
/// Feature preparation, scaling and inference errors are returned as-is;
/// nothing is retried and no result is cached.
pub struct Predictor {
    model: Arc<LoadedModel>,
    engineer: FeatureEngineer,
    thresholds: HdiThresholds,
    happiness_levels: HappinessLevels,
}

impl Predictor {
    /// Create a predictor for a shared model
    pub fn new(model: Arc<LoadedModel>, config: &AppConfig) -> Self {
        info!(
            "Creating {} predictor over {} features",
            model.target(),
            model.feature_names.len()
        );
        Self {
            engineer: FeatureEngineer::new(config),
            thresholds: config.hdi_thresholds,
            happiness_levels: config.happiness_levels.clone(),
            model,
        }
    }

    /// Feature set of the wrapped model
    pub fn target(&self) -> ModelTarget {
        self.model.target()
    }

    pub fn model(&self) -> &LoadedModel {
        &self.model
    }

    /// Predict from raw form input
    pub fn predict(&self, raw_input: &RawInput) -> Result<PredictionResult, InferenceError> {
        match &self.model.kind {
            ModelKind::Classification(model) => self.predict_classification(model, raw_input),
            ModelKind::Regression(model) => self.predict_regression(model, raw_input),
        }
    }

    fn predict_classification(
        &self,
        model: &ClassificationModel,
        raw_input: &RawInput,
    ) -> Result<PredictionResult, InferenceError> {
        let features = self.engineer.prepare_input(
            raw_input,
            &self.model.feature_names,
            ModelTarget::Classification,
        )?;

        let scaled = model.scaler.transform(features.values())?;
        let index = model.estimator.predict(&scaled)?;
        let proba = model.estimator.predict_proba(&scaled)?;

        let classes = model.label_encoder.classes();
        if proba.len() != classes.len() {
            return Err(InferenceError::shape(
                "class probabilities",
                classes.len(),
                proba.len(),
            ));
        }

        let level = model.label_encoder.inverse_transform(index)?;
        let confidence = proba.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let probabilities = classes
            .iter()
            .zip(&proba)
            .map(|(class, p)| (format!("Level {class}"), *p))
            .collect();

        debug!("Happiness prediction: level={} (conf={:.3})", level, confidence);

        Ok(PredictionResult {
            value: level as f64,
            category: self.happiness_levels.label(level).to_string(),
            confidence: Some(confidence),
            probabilities: Some(probabilities),
            interpretation: Some(happiness_interpretation(level).to_string()),
        })
    }

    fn predict_regression(
        &self,
        model: &RegressionModel,
        raw_input: &RawInput,
    ) -> Result<PredictionResult, InferenceError> {
        let features = self.engineer.prepare_input(
            raw_input,
            &self.model.feature_names,
            ModelTarget::Regression,
        )?;

        let raw = model.estimator.predict(features.values())?;
        if raw.is_nan() {
            return Err(InferenceError::InferenceFailed(
                "regressor returned NaN".to_string(),
            ));
        }

        let value = raw.clamp(0.0, 1.0);
        if value != raw {
            warn!("HDI prediction {:.4} outside [0, 1], clamped to {}", raw, value);
        }

        let category = self.thresholds.categorize(value);
        debug!("HDI prediction: {:.3} ({})", value, category);

        Ok(PredictionResult {
            value,
            category: category.as_str().to_string(),
            confidence: None,
            probabilities: None,
            interpretation: Some(hdi_interpretation(value, category)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, FeatureScaler, Regressor};
    use crate::{ClassLabels, StandardScaler};
    use proptest::prelude::*;

    struct ConstantRegressor(f64);

    impl Regressor for ConstantRegressor {
        fn predict(&self, _row: &[f64]) -> Result<f64, InferenceError> {
            Ok(self.0)
        }
    }

    struct FixedClassifier(Vec<f64>);

    impl Classifier for FixedClassifier {
        fn predict_proba(&self, _row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Ok(self.0.clone())
        }
    }

    struct FailingScaler;

    impl FeatureScaler for FailingScaler {
        fn transform(&self, _row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Err(InferenceError::InferenceFailed("scaler corrupt".to_string()))
        }
    }

    struct RecordingScaler(std::sync::Mutex<usize>);

    impl FeatureScaler for RecordingScaler {
        fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            *self.0.lock().unwrap() += 1;
            Ok(row.to_vec())
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn regression_predictor(output: f64) -> Predictor {
        let model = LoadedModel::regression(
            Box::new(ConstantRegressor(output)),
            names(&["GDP_per_Capita_USD_log", "Healthcare_Index"]),
        );
        Predictor::new(Arc::new(model), &AppConfig::default())
    }

    fn classification_predictor(proba: Vec<f64>, classes: Vec<i64>) -> Predictor {
        let model = LoadedModel::classification(
            Box::new(FixedClassifier(proba)),
            Box::new(StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0])),
            Box::new(ClassLabels::new(classes)),
            names(&["HDI_Index", "Wellbeing_Score"]),
        );
        Predictor::new(Arc::new(model), &AppConfig::default())
    }

    #[test]
    fn test_regression_clamps_output() {
        let low = regression_predictor(-5.0).predict(&RawInput::new()).unwrap();
        assert_eq!(low.value, 0.0);
        assert_eq!(low.category, "Low");

        let high = regression_predictor(5.0).predict(&RawInput::new()).unwrap();
        assert_eq!(high.value, 1.0);
        assert_eq!(high.category, "Very High");
        assert!(high.confidence.is_none());
        assert!(high.probabilities.is_none());
    }

    #[test]
    fn test_regression_interpretation() {
        let result = regression_predictor(0.72).predict(&RawInput::new()).unwrap();
        assert_eq!(result.category, "High");
        assert_eq!(result.hdi_category(), Some(HdiCategory::High));
        assert!(result
            .interpretation
            .unwrap()
            .starts_with("An HDI of 0.720 indicates high human development."));
    }

    #[test]
    fn test_regression_nan_is_an_error() {
        let err = regression_predictor(f64::NAN)
            .predict(&RawInput::new())
            .unwrap_err();
        assert!(matches!(err, InferenceError::InferenceFailed(_)));
    }

    #[test]
    fn test_classification_result() {
        let proba = vec![0.05, 0.05, 0.1, 0.1, 0.1, 0.5, 0.05, 0.05];
        let predictor = classification_predictor(proba, (1..=8).collect());
        let result = predictor
            .predict(&RawInput::new().with("HDI_Index", 0.75))
            .unwrap();

        assert_eq!(result.level(), 6);
        assert_eq!(result.category, "High");
        assert_eq!(result.confidence, Some(0.5));
        let probabilities = result.probabilities.unwrap();
        assert_eq!(probabilities.len(), 8);
        assert_eq!(probabilities.get("Level 6"), Some(&0.5));
        assert_eq!(
            result.interpretation.as_deref(),
            Some("Above average happiness with good overall well-being indicators.")
        );
    }

    #[test]
    fn test_classification_unknown_label() {
        let predictor = classification_predictor(vec![0.2, 0.8], vec![3, 12]);
        let result = predictor.predict(&RawInput::new()).unwrap();
        assert_eq!(result.level(), 12);
        assert_eq!(result.category, "Unknown");
    }

    #[test]
    fn test_probability_count_mismatch() {
        let predictor = classification_predictor(vec![0.2, 0.8], vec![1, 2, 3]);
        let err = predictor.predict(&RawInput::new()).unwrap_err();
        assert!(matches!(err, InferenceError::InvalidInputShape { .. }));
    }

    #[test]
    fn test_scaler_failure_propagates() {
        let model = LoadedModel::classification(
            Box::new(FixedClassifier(vec![1.0])),
            Box::new(FailingScaler),
            Box::new(ClassLabels::new(vec![1])),
            names(&["HDI_Index"]),
        );
        let predictor = Predictor::new(Arc::new(model), &AppConfig::default());
        let err = predictor.predict(&RawInput::new()).unwrap_err();
        assert_eq!(err.to_string(), "Inference failed: scaler corrupt");
    }

    #[test]
    fn test_scaler_applied_once_per_classification() {
        let scaler = Arc::new(RecordingScaler(std::sync::Mutex::new(0)));

        struct Shared(Arc<RecordingScaler>);
        impl FeatureScaler for Shared {
            fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
                self.0.transform(row)
            }
        }

        let model = LoadedModel::classification(
            Box::new(FixedClassifier(vec![0.3, 0.7])),
            Box::new(Shared(Arc::clone(&scaler))),
            Box::new(ClassLabels::new(vec![1, 2])),
            names(&["HDI_Index"]),
        );
        let predictor = Predictor::new(Arc::new(model), &AppConfig::default());
        predictor.predict(&RawInput::new()).unwrap();
        predictor.predict(&RawInput::new()).unwrap();
        assert_eq!(*scaler.0.lock().unwrap(), 2);
    }

    #[test]
    fn test_missing_feature_propagates() {
        let mut config = AppConfig::default();
        config.feature_ranges.clear();
        let model = LoadedModel::classification(
            Box::new(FixedClassifier(vec![1.0])),
            Box::new(StandardScaler::new(vec![0.0], vec![1.0])),
            Box::new(ClassLabels::new(vec![1])),
            names(&["HDI_Index"]),
        );
        let predictor = Predictor::new(Arc::new(model), &config);
        let err = predictor.predict(&RawInput::new()).unwrap_err();
        assert!(matches!(err, InferenceError::MissingFeature(_)));
    }

    #[test]
    fn test_happiness_interpretation_bands() {
        assert!(happiness_interpretation(8).starts_with("Excellent"));
        assert!(happiness_interpretation(7).starts_with("Excellent"));
        assert!(happiness_interpretation(6).starts_with("Above average"));
        assert!(happiness_interpretation(5).starts_with("Above average"));
        assert!(happiness_interpretation(4).starts_with("Moderate"));
        assert!(happiness_interpretation(3).starts_with("Moderate"));
        assert!(happiness_interpretation(2).starts_with("Lower"));
        assert!(happiness_interpretation(1).starts_with("Lower"));
    }

    fn arb_proba() -> impl Strategy<Value = Vec<f64>> {
        proptest::collection::vec(0.001f64..1.0, 8).prop_map(|weights| {
            let total: f64 = weights.iter().sum();
            weights.into_iter().map(|w| w / total).collect()
        })
    }

    proptest! {
        #[test]
        fn prop_regression_always_in_unit_interval(output in -1.0e6f64..1.0e6) {
            let result = regression_predictor(output).predict(&RawInput::new()).unwrap();
            prop_assert!((0.0..=1.0).contains(&result.value));
            prop_assert!(HdiCategory::from_name(&result.category).is_some());
        }

        #[test]
        fn prop_confidence_is_max_probability(proba in arb_proba()) {
            let predictor = classification_predictor(proba, (1..=8).collect());
            let result = predictor.predict(&RawInput::new()).unwrap();
            let probabilities = result.probabilities.as_ref().unwrap();
            let max = probabilities.values().copied().fold(f64::NEG_INFINITY, f64::max);
            let sum: f64 = probabilities.values().sum();
            prop_assert_eq!(result.confidence, Some(max));
            prop_assert!((sum - 1.0).abs() < 1e-9);
            prop_assert!((1..=8).contains(&result.level()));
        }

        #[test]
        fn prop_hdi_interpretation_is_pure(v in 0.0f64..=1.0) {
            let category = HdiThresholds::default().categorize(v);
            prop_assert_eq!(hdi_interpretation(v, category), hdi_interpretation(v, category));
        }
    }
}

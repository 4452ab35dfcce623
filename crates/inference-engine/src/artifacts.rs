//! JSON Model Artifacts
//!
//! Serialized forms of the fitted estimators. Each implements the matching
//! contract from the model module.

use crate::model::{Classifier, FeatureScaler, LabelEncoder, Regressor};
use crate::InferenceError;
use serde::{Deserialize, Serialize};

/// Linear regression: `intercept + coefficients · row`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self {
            coefficients,
            intercept,
        }
    }

    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError> {
        if row.len() != self.coefficients.len() {
            return Err(InferenceError::shape(
                "linear regressor",
                self.coefficients.len(),
                row.len(),
            ));
        }
        Ok(self.intercept + dot(&self.coefficients, row))
    }
}

/// Multinomial logistic regression with one weight row per class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoftmaxClassifier {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl SoftmaxClassifier {
    pub fn new(coefficients: Vec<Vec<f64>>, intercepts: Vec<f64>) -> Self {
        Self {
            coefficients,
            intercepts,
        }
    }

    pub fn n_classes(&self) -> usize {
        self.coefficients.len()
    }

    /// Width of the weight rows; `None` when rows disagree or intercepts are missing
    pub fn n_features(&self) -> Option<usize> {
        let width = self.coefficients.first().map(Vec::len)?;
        let consistent = self.coefficients.iter().all(|w| w.len() == width)
            && self.intercepts.len() == self.coefficients.len();
        consistent.then_some(width)
    }
}

impl Classifier for SoftmaxClassifier {
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        let width = self.n_features().ok_or_else(|| {
            InferenceError::InferenceFailed("inconsistent softmax weights".to_string())
        })?;
        if row.len() != width {
            return Err(InferenceError::shape("softmax classifier", width, row.len()));
        }

        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(w, b)| b + dot(w, row))
            .collect();

        // Shift by the max logit so exp() cannot overflow
        let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = logits.iter().map(|l| (l - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        if !total.is_finite() || total <= 0.0 {
            return Err(InferenceError::InferenceFailed(
                "softmax normalizer is not finite".to_string(),
            ));
        }
        Ok(exps.into_iter().map(|e| e / total).collect())
    }
}

/// Standardization: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Self {
        Self { mean, scale }
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if self.mean.len() != self.scale.len() {
            return Err(InferenceError::shape(
                "scaler scale",
                self.mean.len(),
                self.scale.len(),
            ));
        }
        if row.len() != self.mean.len() {
            return Err(InferenceError::shape("scaler", self.mean.len(), row.len()));
        }
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // Zero-variance columns were fitted with unit scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}

/// Ordered domain labels of a classifier's classes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLabels {
    pub classes: Vec<i64>,
}

impl ClassLabels {
    pub fn new(classes: Vec<i64>) -> Self {
        Self { classes }
    }
}

impl LabelEncoder for ClassLabels {
    fn classes(&self) -> &[i64] {
        &self.classes
    }
}

/// Regressor artifact tagged by estimator kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RegressorArtifact {
    Linear(LinearRegressor),
}

impl RegressorArtifact {
    pub fn n_features(&self) -> usize {
        match self {
            RegressorArtifact::Linear(m) => m.n_features(),
        }
    }

    pub fn into_estimator(self) -> Box<dyn Regressor> {
        match self {
            RegressorArtifact::Linear(m) => Box::new(m),
        }
    }
}

/// Classifier artifact tagged by estimator kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ClassifierArtifact {
    Softmax(SoftmaxClassifier),
}

impl ClassifierArtifact {
    pub fn n_features(&self) -> Option<usize> {
        match self {
            ClassifierArtifact::Softmax(m) => m.n_features(),
        }
    }

    pub fn n_classes(&self) -> usize {
        match self {
            ClassifierArtifact::Softmax(m) => m.n_classes(),
        }
    }

    pub fn into_estimator(self) -> Box<dyn Classifier> {
        match self {
            ClassifierArtifact::Softmax(m) => Box::new(m),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

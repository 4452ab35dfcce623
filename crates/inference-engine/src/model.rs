//! Model Contracts

use crate::InferenceError;
use feature_engine::ModelTarget;
use serde_json::{Map, Value};

/// Continuous-score estimator (one value per row)
pub trait Regressor: Send + Sync {
    /// Predict the score for one feature row
    fn predict(&self, row: &[f64]) -> Result<f64, InferenceError>;
}

/// Discrete-label estimator with per-class probabilities
pub trait Classifier: Send + Sync {
    /// Class probabilities for one row, in class-index order
    fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;

    /// Internal index of the most likely class
    fn predict(&self, row: &[f64]) -> Result<usize, InferenceError> {
        let proba = self.predict_proba(row)?;
        proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(idx, _)| idx)
            .ok_or_else(|| InferenceError::InferenceFailed("empty probability vector".to_string()))
    }
}

/// Maps raw feature values into the space a classifier was trained on
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, row: &[f64]) -> Result<Vec<f64>, InferenceError>;
}

/// Maps internal class indices back to domain labels
pub trait LabelEncoder: Send + Sync {
    /// Domain labels in class-index order
    fn classes(&self) -> &[i64];

    /// Domain label of an internal class index
    fn inverse_transform(&self, index: usize) -> Result<i64, InferenceError> {
        self.classes().get(index).copied().ok_or_else(|| {
            InferenceError::InferenceFailed(format!(
                "class index {index} outside {} known classes",
                self.classes().len()
            ))
        })
    }
}

/// Components of the happiness classifier
pub struct ClassificationModel {
    pub estimator: Box<dyn Classifier>,
    pub scaler: Box<dyn FeatureScaler>,
    pub label_encoder: Box<dyn LabelEncoder>,
}

/// Components of the HDI regressor
pub struct RegressionModel {
    pub estimator: Box<dyn Regressor>,
}

/// The two supported model families, each with the components it needs
pub enum ModelKind {
    Classification(ClassificationModel),
    Regression(RegressionModel),
}

impl ModelKind {
    /// Feature set this model was trained on
    pub fn target(&self) -> ModelTarget {
        match self {
            ModelKind::Classification(_) => ModelTarget::Classification,
            ModelKind::Regression(_) => ModelTarget::Regression,
        }
    }
}

/// A loaded, immutable model bundle
pub struct LoadedModel {
    /// Estimator and its companions
    pub kind: ModelKind,
    /// Training-time feature schema, in order
    pub feature_names: Vec<String>,
    /// Free-form training metadata
    pub metadata: Map<String, Value>,
}

impl LoadedModel {
    /// Bundle a regressor with its feature schema
    pub fn regression(estimator: Box<dyn Regressor>, feature_names: Vec<String>) -> Self {
        Self {
            kind: ModelKind::Regression(RegressionModel { estimator }),
            feature_names,
            metadata: Map::new(),
        }
    }

    /// Bundle a classifier, scaler and label encoder with their feature schema
    pub fn classification(
        estimator: Box<dyn Classifier>,
        scaler: Box<dyn FeatureScaler>,
        label_encoder: Box<dyn LabelEncoder>,
        feature_names: Vec<String>,
    ) -> Self {
        Self {
            kind: ModelKind::Classification(ClassificationModel {
                estimator,
                scaler,
                label_encoder,
            }),
            feature_names,
            metadata: Map::new(),
        }
    }

    /// Attach metadata
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn target(&self) -> ModelTarget {
        self.kind.target()
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("target", &self.target())
            .field("feature_names", &self.feature_names)
            .field("metadata", &self.metadata)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<f64>);

    impl Classifier for Fixed {
        fn predict_proba(&self, _row: &[f64]) -> Result<Vec<f64>, InferenceError> {
            Ok(self.0.clone())
        }
    }

    struct Labels(Vec<i64>);

    impl LabelEncoder for Labels {
        fn classes(&self) -> &[i64] {
            &self.0
        }
    }

    #[test]
    fn test_default_predict_is_argmax() {
        let clf = Fixed(vec![0.1, 0.6, 0.3]);
        assert_eq!(clf.predict(&[]).unwrap(), 1);
        assert!(Fixed(vec![]).predict(&[]).is_err());
    }

    #[test]
    fn test_inverse_transform_bounds() {
        let labels = Labels(vec![3, 5, 7]);
        assert_eq!(labels.inverse_transform(2).unwrap(), 7);
        assert!(labels.inverse_transform(3).is_err());
    }
}

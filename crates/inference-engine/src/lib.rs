//! Model Inference
//!
//! Contracts for the pre-trained estimators, a loader for their JSON
//! artifacts, and the [`Predictor`] that turns raw form input into a
//! uniform [`PredictionResult`] for either model.

mod artifacts;
mod loader;
mod model;
mod predictor;

pub use artifacts::{
    ClassLabels, ClassifierArtifact, LinearRegressor, RegressorArtifact, SoftmaxClassifier,
    StandardScaler,
};
pub use loader::{ModelLoader, ModelRegistry};
pub use model::{
    ClassificationModel, Classifier, FeatureScaler, LabelEncoder, LoadedModel, ModelKind,
    RegressionModel, Regressor,
};
pub use predictor::{
    happiness_interpretation, hdi_interpretation, PredictionResult, Predictor,
};

use feature_engine::MissingFeatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors during model loading or inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected}, got {actual}")]
    InvalidInputShape { expected: String, actual: String },
    #[error(transparent)]
    MissingFeature(#[from] MissingFeatureError),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl InferenceError {
    /// Shape mismatch between a row and what a component was fitted on
    pub(crate) fn shape(component: &str, expected: usize, actual: usize) -> Self {
        InferenceError::InvalidInputShape {
            expected: format!("{expected} values for {component}"),
            actual: actual.to_string(),
        }
    }
}

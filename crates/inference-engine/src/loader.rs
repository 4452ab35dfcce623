//! Artifact Loading
//!
//! Directory layout under the models root:
//!
//! ```text
//! classification/model.json          softmax weights
//! classification/scaler.json         standard scaler
//! classification/label_encoder.json  class labels
//! classification/feature_names.json  feature schema
//! classification/model_info.json     optional metadata
//! regression/hdi_model.json          {model, feature_names, metadata}
//! ```

use crate::artifacts::{ClassLabels, ClassifierArtifact, RegressorArtifact, StandardScaler};
use crate::model::LoadedModel;
use crate::InferenceError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

/// File name of the packaged regression artifact
pub const REGRESSION_PACKAGE: &str = "hdi_model.json";

/// Packaged regression artifact
#[derive(Debug, Deserialize)]
struct RegressionPackage {
    model: RegressorArtifact,
    feature_names: Vec<String>,
    #[serde(default)]
    metadata: Map<String, Value>,
}

/// Reads model artifacts from a models directory
#[derive(Debug, Clone)]
pub struct ModelLoader {
    models_dir: PathBuf,
}

impl ModelLoader {
    /// Create a loader rooted at `models_dir`
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    /// Load the happiness classifier with its scaler and label encoder
    pub fn load_classification(&self) -> Result<LoadedModel, InferenceError> {
        self.try_load_classification()
            .map(|model| {
                info!(
                    "Classification model loaded: {} features",
                    model.feature_names.len()
                );
                model
            })
            .map_err(|e| {
                error!("Error loading classification model: {}", e);
                e
            })
    }

    /// Load the HDI regressor package
    pub fn load_regression(&self) -> Result<LoadedModel, InferenceError> {
        self.try_load_regression()
            .map(|model| {
                info!(
                    "Regression model loaded: {} features",
                    model.feature_names.len()
                );
                model
            })
            .map_err(|e| {
                error!("Error loading regression model: {}", e);
                e
            })
    }

    fn try_load_classification(&self) -> Result<LoadedModel, InferenceError> {
        let dir = self.models_dir.join("classification");
        debug!("Loading classification artifacts from {}", dir.display());

        let estimator: ClassifierArtifact = read_json(&dir.join("model.json"))?;
        let scaler: StandardScaler = read_json(&dir.join("scaler.json"))?;
        let labels: ClassLabels = read_json(&dir.join("label_encoder.json"))?;
        let feature_names: Vec<String> = read_json(&dir.join("feature_names.json"))?;

        let info_path = dir.join("model_info.json");
        let metadata: Map<String, Value> = if info_path.exists() {
            read_json(&info_path)?
        } else {
            Map::new()
        };

        let n_features = feature_names.len();
        match estimator.n_features() {
            Some(width) if width == n_features => {}
            Some(width) => return Err(InferenceError::shape("classifier weights", n_features, width)),
            None => {
                return Err(InferenceError::ModelLoadError(
                    "classifier weight rows have inconsistent widths".to_string(),
                ))
            }
        }
        if scaler.n_features() != n_features || scaler.scale.len() != n_features {
            return Err(InferenceError::shape("scaler", n_features, scaler.n_features()));
        }
        if labels.classes.len() != estimator.n_classes() {
            return Err(InferenceError::shape(
                "label encoder classes",
                estimator.n_classes(),
                labels.classes.len(),
            ));
        }

        Ok(LoadedModel::classification(
            estimator.into_estimator(),
            Box::new(scaler),
            Box::new(labels),
            feature_names,
        )
        .with_metadata(metadata))
    }

    fn try_load_regression(&self) -> Result<LoadedModel, InferenceError> {
        let path = self.models_dir.join("regression").join(REGRESSION_PACKAGE);
        debug!("Loading regression package {}", path.display());

        let package: RegressionPackage = read_json(&path)?;
        if package.model.n_features() != package.feature_names.len() {
            return Err(InferenceError::shape(
                "regressor coefficients",
                package.feature_names.len(),
                package.model.n_features(),
            ));
        }

        Ok(
            LoadedModel::regression(package.model.into_estimator(), package.feature_names)
                .with_metadata(package.metadata),
        )
    }
}

/// Both models, loaded once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    classification: Arc<LoadedModel>,
    regression: Arc<LoadedModel>,
}

impl ModelRegistry {
    /// Load every model the dashboard uses
    pub fn load(loader: &ModelLoader) -> Result<Self, InferenceError> {
        info!("Loading models from {}", loader.models_dir().display());
        Ok(Self {
            classification: Arc::new(loader.load_classification()?),
            regression: Arc::new(loader.load_regression()?),
        })
    }

    /// Happiness classifier handle
    pub fn classification(&self) -> Arc<LoadedModel> {
        Arc::clone(&self.classification)
    }

    /// HDI regressor handle
    pub fn regression(&self) -> Arc<LoadedModel> {
        Arc::clone(&self.regression)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, InferenceError> {
    let bytes = std::fs::read(path).map_err(|source| InferenceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| InferenceError::Artifact {
        path: path.to_path_buf(),
        source,
    })
}

//! Feature Engineering Error Types

use crate::ModelTarget;
use thiserror::Error;

/// A derived-feature formula needed a raw column that is neither in the
/// input nor in the list of optional fields with documented defaults.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Missing feature `{feature}` required by the {target} feature set")]
pub struct MissingFeatureError {
    /// Raw column name
    pub feature: String,
    /// Feature set that referenced it
    pub target: ModelTarget,
}

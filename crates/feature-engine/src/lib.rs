//! Feature Engineering Engine
//!
//! Turns a raw indicator mapping collected from a form into the single
//! feature row a trained model expects, with derived columns computed and
//! the column set aligned to the model's training schema.

mod error;
mod features;
mod table;

pub use error::MissingFeatureError;
pub use features::{FeatureEngineer, ModelTarget, REGRESSION_DEFAULTS};
pub use table::{FeatureTable, RawInput};

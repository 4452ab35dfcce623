//! Form Input Validation
//!
//! Range checking and slider-style clamping of raw indicator values
//! against the configured feature ranges.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationResult, Validator};

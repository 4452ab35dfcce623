//! Result Presentation
//!
//! Turns prediction results and analysis reports into HTML cards and
//! Plotly-compatible chart specs.

mod cards;
pub mod charts;
mod style;

pub use cards::{percent, Comparison, HappinessCard, HdiCard};
pub use style::{level_color, level_emoji, recommendations, CategoryStyle};

use thiserror::Error;

/// Errors while building a card
#[derive(Debug, Error, PartialEq)]
pub enum CardError {
    #[error("Not an HDI result: category {0:?}")]
    NotHdi(String),
    #[error("Not a classification result: missing {0}")]
    NotClassification(&'static str),
}

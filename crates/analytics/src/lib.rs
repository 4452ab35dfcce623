//! Dataset Analytics
//!
//! Loads the country indicator dataset and computes the summaries behind
//! the exploratory dashboard: overview metrics, descriptive statistics,
//! distributions, correlations and relationships.

mod dataset;
mod report;
mod statistics;

pub use dataset::{ColumnKind, Dataset};
pub use report::{
    analyze, box_plots, describe, feature_distributions, gdp_vs_hdi, hdi_category_counts,
    scatter_pairs, top_correlations_with_hdi, AnalysisReport, BoxPlot, CategoryCount,
    ColumnDescription, CorrelationMatrix, DatasetOverview, FeatureCorrelation,
    FeatureDistribution, ScatterPair, TrendlineScatter, GDP_COLUMN, HDI_COLUMN,
    IMPORTANT_COLUMNS,
};
pub use statistics::{pearson, BoxStats, ColumnSummary, Histogram, OlsFit};

use std::path::PathBuf;
use thiserror::Error;

/// Errors during dataset analysis
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Column not found: {0}")]
    MissingColumn(String),
    #[error("Not enough data: {0}")]
    NotEnoughData(String),
}

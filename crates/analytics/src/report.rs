//! Analysis Report

use crate::dataset::{ColumnKind, Dataset};
use crate::statistics::{pearson, BoxStats, ColumnSummary, Histogram, OlsFit};
use crate::AnalyticsError;
use app_config::HdiCategory;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Target column of the dataset
pub const HDI_COLUMN: &str = "HDI_Index";
/// Income column used for the overview and trendline
pub const GDP_COLUMN: &str = "GDP_per_Capita_USD";

/// Columns considered for the correlation matrix, in display order
pub const IMPORTANT_COLUMNS: [&str; 12] = [
    "HDI_Index",
    "GDP_per_Capita_USD",
    "Life_Expectancy_years",
    "Literacy_Rate_pct",
    "Internet_Access_pct",
    "Unemployment_Rate_pct",
    "Higher_Education_Rate",
    "Medical_Doctors_per_1000",
    "Gender_Equality_Index",
    "R_and_D_Expenditure_pct_GDP",
    "Days_engaged_in_warfare_per_year",
    "Trade_Partners_Count",
];

const DISTRIBUTION_FEATURES: [(&str, &str); 4] = [
    ("Life_Expectancy_years", "Life Expectancy"),
    ("Literacy_Rate_pct", "Literacy Rate"),
    ("GDP_per_Capita_USD", "GDP per Capita"),
    ("Unemployment_Rate_pct", "Unemployment Rate"),
];

const BOX_FEATURES: [&str; 5] = [
    "HDI_Index",
    "Life_Expectancy_years",
    "Literacy_Rate_pct",
    "Internet_Access_pct",
    "Unemployment_Rate_pct",
];

const SCATTER_FEATURES: [&str; 4] = [
    "HDI_Index",
    "GDP_per_Capita_USD",
    "Life_Expectancy_years",
    "Literacy_Rate_pct",
];

const HDI_BINS: usize = 30;
const DISTRIBUTION_BINS: usize = 25;
const CORRELATION_TOP_N: usize = 12;
const HDI_CORRELATION_TOP_N: usize = 10;
const SAMPLE_ROWS: usize = 10;

/// Headline metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub records: usize,
    pub features: usize,
    /// Mean HDI, `None` when the column is absent
    pub avg_hdi: Option<f64>,
    /// Mean GDP per capita, `None` when the column is absent
    pub avg_gdp: Option<f64>,
}

impl DatasetOverview {
    pub fn compute(dataset: &Dataset) -> Self {
        Self {
            records: dataset.len(),
            features: dataset.width(),
            avg_hdi: column_mean(dataset, HDI_COLUMN),
            avg_gdp: column_mean(dataset, GDP_COLUMN),
        }
    }
}

/// Descriptive statistics for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub column: String,
    #[serde(flatten)]
    pub summary: ColumnSummary,
}

/// Number of records per HDI category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: HdiCategory,
    pub count: usize,
}

/// Histogram of one key feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureDistribution {
    pub feature: String,
    pub display_name: String,
    pub histogram: Histogram,
}

/// Box statistics of one key feature
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxPlot {
    pub feature: String,
    pub label: String,
    pub stats: BoxStats,
}

/// Pairwise Pearson correlations
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major; `None` where a pair has no defined correlation
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlate the important columns present in the dataset, at most `top_n`
    pub fn compute(dataset: &Dataset, top_n: usize) -> Result<Self, AnalyticsError> {
        let columns: Vec<&str> = IMPORTANT_COLUMNS
            .iter()
            .copied()
            .filter(|c| dataset.has_numeric(c))
            .take(top_n)
            .collect();
        Self::over(dataset, &columns)
    }

    /// Correlate an explicit column list
    pub fn over(dataset: &Dataset, columns: &[&str]) -> Result<Self, AnalyticsError> {
        if columns.len() < 2 {
            return Err(AnalyticsError::NotEnoughData(format!(
                "correlation matrix needs at least 2 numeric columns, found {}",
                columns.len()
            )));
        }

        let cells = columns
            .iter()
            .map(|c| {
                dataset
                    .numeric(c)
                    .ok_or_else(|| AnalyticsError::MissingColumn(c.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let values = cells
            .iter()
            .map(|a| cells.iter().map(|b| pearson(a, b)).collect())
            .collect();

        Ok(Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            values,
        })
    }

    /// Correlation between two named columns
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}

/// Absolute correlation of a feature with HDI
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCorrelation {
    pub feature: String,
    pub correlation: f64,
}

/// GDP against HDI with an OLS trendline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendlineScatter {
    pub x_feature: String,
    pub y_feature: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub fit: OlsFit,
}

/// One lower-triangle panel of the key-feature scatter matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPair {
    pub x_feature: String,
    pub y_feature: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Everything the exploratory dashboard renders
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub overview: DatasetOverview,
    pub hdi_histogram: Option<Histogram>,
    pub hdi_categories: Option<Vec<CategoryCount>>,
    pub distributions: Vec<FeatureDistribution>,
    pub box_plots: Vec<BoxPlot>,
    pub correlation_matrix: Option<CorrelationMatrix>,
    pub top_correlations: Option<Vec<FeatureCorrelation>>,
    pub gdp_vs_hdi: Option<TrendlineScatter>,
    pub scatter_pairs: Vec<ScatterPair>,
    pub describe: Vec<ColumnDescription>,
    pub missing_values: Vec<(String, usize)>,
    pub column_types: Vec<(String, ColumnKind)>,
    pub sample_columns: Vec<String>,
    pub sample: Vec<Vec<String>>,
}

/// Build the full report; sections whose columns are absent are left empty
pub fn analyze(dataset: &Dataset) -> AnalysisReport {
    info!(
        "Analyzing dataset: {} rows, {} columns",
        dataset.len(),
        dataset.width()
    );

    let hdi_histogram = dataset
        .values(HDI_COLUMN)
        .and_then(|v| Histogram::compute(&v, HDI_BINS));
    let report = AnalysisReport {
        overview: DatasetOverview::compute(dataset),
        hdi_histogram: section("HDI distribution", hdi_histogram),
        hdi_categories: section("HDI categories", hdi_category_counts(dataset)),
        distributions: feature_distributions(dataset),
        box_plots: box_plots(dataset),
        correlation_matrix: section(
            "correlation matrix",
            CorrelationMatrix::compute(dataset, CORRELATION_TOP_N),
        ),
        top_correlations: section(
            "HDI correlations",
            top_correlations_with_hdi(dataset, HDI_CORRELATION_TOP_N),
        ),
        gdp_vs_hdi: section("GDP vs HDI", gdp_vs_hdi(dataset)),
        scatter_pairs: scatter_pairs(dataset),
        describe: describe(dataset),
        missing_values: dataset.missing_values(),
        column_types: dataset.column_types(),
        sample_columns: dataset.column_names().map(str::to_string).collect(),
        sample: dataset.head(SAMPLE_ROWS),
    };

    debug!(
        "Report built: {} distributions, {} box plots, {} scatter pairs",
        report.distributions.len(),
        report.box_plots.len(),
        report.scatter_pairs.len()
    );
    report
}

fn section<T>(name: &str, result: Result<T, AnalyticsError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping {}: {}", name, e);
            None
        }
    }
}

fn column_mean(dataset: &Dataset, name: &str) -> Option<f64> {
    let values = dataset.values(name).ok()?;
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Descriptive statistics for every numeric column
pub fn describe(dataset: &Dataset) -> Vec<ColumnDescription> {
    dataset
        .numeric_columns()
        .filter_map(|name| {
            let values = dataset.values(name).ok()?;
            ColumnSummary::compute(&values).map(|summary| ColumnDescription {
                column: name.to_string(),
                summary,
            })
        })
        .collect()
}

/// HDI category counts over the bins (0, 0.55], (0.55, 0.70],
/// (0.70, 0.80], (0.80, 1.0]. Values outside (0, 1] are not counted.
pub fn hdi_category_counts(dataset: &Dataset) -> Result<Vec<CategoryCount>, AnalyticsError> {
    let values = dataset.values(HDI_COLUMN)?;
    let mut counts = [0usize; 4];
    for v in values {
        let idx = if v <= 0.0 || v > 1.0 {
            continue;
        } else if v <= 0.55 {
            0
        } else if v <= 0.70 {
            1
        } else if v <= 0.80 {
            2
        } else {
            3
        };
        counts[idx] += 1;
    }

    Ok(HdiCategory::ALL
        .iter()
        .zip(counts)
        .map(|(&category, count)| CategoryCount { category, count })
        .collect())
}

/// Histograms of the key features present in the dataset
pub fn feature_distributions(dataset: &Dataset) -> Vec<FeatureDistribution> {
    let distributions: Vec<_> = DISTRIBUTION_FEATURES
        .iter()
        .filter_map(|&(feature, display_name)| {
            let values = dataset.values(feature).ok()?;
            let histogram = Histogram::compute(&values, DISTRIBUTION_BINS).ok()?;
            Some(FeatureDistribution {
                feature: feature.to_string(),
                display_name: display_name.to_string(),
                histogram,
            })
        })
        .collect();
    if distributions.is_empty() {
        warn!("No key features found for distribution plots");
    }
    distributions
}

/// Box statistics of the key features present in the dataset
pub fn box_plots(dataset: &Dataset) -> Vec<BoxPlot> {
    BOX_FEATURES
        .iter()
        .filter_map(|&feature| {
            let values = dataset.values(feature).ok()?;
            let stats = BoxStats::compute(&values)?;
            Some(BoxPlot {
                feature: feature.to_string(),
                label: feature.replace('_', " ").replace(" pct", " %"),
                stats,
            })
        })
        .collect()
}

/// Numeric features ranked by absolute correlation with HDI
pub fn top_correlations_with_hdi(
    dataset: &Dataset,
    top_n: usize,
) -> Result<Vec<FeatureCorrelation>, AnalyticsError> {
    let hdi = dataset
        .numeric(HDI_COLUMN)
        .ok_or_else(|| AnalyticsError::MissingColumn(HDI_COLUMN.to_string()))?;

    let mut ranked: Vec<FeatureCorrelation> = dataset
        .numeric_columns()
        .filter(|name| *name != HDI_COLUMN)
        .filter_map(|name| {
            let r = pearson(hdi, dataset.numeric(name)?)?;
            Some(FeatureCorrelation {
                feature: name.to_string(),
                correlation: r.abs(),
            })
        })
        .collect();

    ranked.sort_by(|a, b| b.correlation.total_cmp(&a.correlation));
    ranked.truncate(top_n);
    Ok(ranked)
}

/// GDP per capita against HDI with the least-squares line
pub fn gdp_vs_hdi(dataset: &Dataset) -> Result<TrendlineScatter, AnalyticsError> {
    let (x, y) = complete_pairs(dataset, GDP_COLUMN, HDI_COLUMN)?;
    let fit = OlsFit::fit(&x, &y)?;
    Ok(TrendlineScatter {
        x_feature: GDP_COLUMN.to_string(),
        y_feature: HDI_COLUMN.to_string(),
        x,
        y,
        fit,
    })
}

/// Lower-triangle pairs over the key features present in the dataset
pub fn scatter_pairs(dataset: &Dataset) -> Vec<ScatterPair> {
    let available: Vec<&str> = SCATTER_FEATURES
        .iter()
        .copied()
        .filter(|f| dataset.has_numeric(f))
        .collect();
    if available.len() < 2 {
        return Vec::new();
    }

    let mut pairs = Vec::new();
    for (row, y_feature) in available.iter().enumerate() {
        for x_feature in &available[..row] {
            if let Ok((x, y)) = complete_pairs(dataset, x_feature, y_feature) {
                pairs.push(ScatterPair {
                    x_feature: x_feature.to_string(),
                    y_feature: y_feature.to_string(),
                    x,
                    y,
                });
            }
        }
    }
    pairs
}

fn complete_pairs(
    dataset: &Dataset,
    x: &str,
    y: &str,
) -> Result<(Vec<f64>, Vec<f64>), AnalyticsError> {
    let xs = dataset
        .numeric(x)
        .ok_or_else(|| AnalyticsError::MissingColumn(x.to_string()))?;
    let ys = dataset
        .numeric(y)
        .ok_or_else(|| AnalyticsError::MissingColumn(y.to_string()))?;
    Ok(xs
        .iter()
        .zip(ys)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Country,HDI_Index,GDP_per_Capita_USD,Life_Expectancy_years,Literacy_Rate_pct,Region
A,0.40,1000,55,50,X
B,0.60,5000,65,70,X
C,0.75,15000,72,90,Y
D,0.90,50000,82,99,Y
E,0.55,3000,60,,Z
";

    fn dataset() -> Dataset {
        Dataset::from_reader(CSV.as_bytes()).unwrap()
    }

    #[test]
    fn test_overview() {
        let overview = DatasetOverview::compute(&dataset());
        assert_eq!(overview.records, 5);
        assert_eq!(overview.features, 6);
        assert!((overview.avg_hdi.unwrap() - 0.64).abs() < 1e-12);
        assert!((overview.avg_gdp.unwrap() - 14_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_category_counts_right_closed() {
        let counts = hdi_category_counts(&dataset()).unwrap();
        let counts: Vec<usize> = counts.iter().map(|c| c.count).collect();
        // 0.55 falls in the lowest bin
        assert_eq!(counts, vec![2, 1, 1, 1]);
    }

    #[test]
    fn test_correlation_matrix() {
        let matrix = CorrelationMatrix::compute(&dataset(), 12).unwrap();
        assert_eq!(
            matrix.columns,
            vec![
                "HDI_Index",
                "GDP_per_Capita_USD",
                "Life_Expectancy_years",
                "Literacy_Rate_pct"
            ]
        );
        for c in &matrix.columns {
            assert!((matrix.get(c, c).unwrap() - 1.0).abs() < 1e-12);
        }
        assert_eq!(
            matrix.get("HDI_Index", "Literacy_Rate_pct"),
            matrix.get("Literacy_Rate_pct", "HDI_Index")
        );

        let limited = CorrelationMatrix::compute(&dataset(), 1);
        assert!(matches!(limited, Err(AnalyticsError::NotEnoughData(_))));
    }

    #[test]
    fn test_top_correlations_sorted() {
        let top = top_correlations_with_hdi(&dataset(), 10).unwrap();
        assert_eq!(top.len(), 3);
        assert!(top.iter().all(|c| c.feature != HDI_COLUMN));
        assert!(top.windows(2).all(|w| w[0].correlation >= w[1].correlation));
        assert_eq!(top_correlations_with_hdi(&dataset(), 1).unwrap().len(), 1);
    }

    #[test]
    fn test_gdp_trendline_positive() {
        let scatter = gdp_vs_hdi(&dataset()).unwrap();
        assert_eq!(scatter.x.len(), 5);
        assert!(scatter.fit.slope > 0.0);
        assert!(scatter.fit.r_squared > 0.0 && scatter.fit.r_squared <= 1.0);
    }

    #[test]
    fn test_plots_over_available_features() {
        let ds = dataset();
        assert_eq!(feature_distributions(&ds).len(), 3);

        let boxes = box_plots(&ds);
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes[2].label, "Literacy Rate %");

        let pairs = scatter_pairs(&ds);
        assert_eq!(pairs.len(), 6);
        // Literacy is missing for one row
        let literacy = pairs
            .iter()
            .find(|p| p.y_feature == "Literacy_Rate_pct" && p.x_feature == HDI_COLUMN)
            .unwrap();
        assert_eq!(literacy.x.len(), 4);
    }

    #[test]
    fn test_report_without_hdi() {
        let ds = Dataset::from_reader("Country,Population\nA,10\nB,20\n".as_bytes()).unwrap();
        let report = analyze(&ds);
        assert!(report.overview.avg_hdi.is_none());
        assert!(report.hdi_histogram.is_none());
        assert!(report.hdi_categories.is_none());
        assert!(report.correlation_matrix.is_none());
        assert!(report.top_correlations.is_none());
        assert!(report.gdp_vs_hdi.is_none());
        assert!(report.scatter_pairs.is_empty());
        assert_eq!(report.describe.len(), 1);
    }

    #[test]
    fn test_full_report_serializes() {
        let report = analyze(&dataset());
        assert_eq!(report.sample.len(), 5);
        assert_eq!(report.missing_values, vec![("Literacy_Rate_pct".to_string(), 1)]);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["hdi_categories"][3]["category"], "Very High");
        assert_eq!(json["describe"][0]["column"], "HDI_Index");
        assert!(json["describe"][0]["mean"].is_number());
        assert_eq!(json["overview"]["records"], 5);
    }
}

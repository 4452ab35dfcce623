//! Prediction Dashboard
//!
//! Wires configuration, validation, inference and presentation together
//! for the command-line front end.

use analytics::{AnalysisReport, AnalyticsError, Dataset};
use app_config::{AppConfig, ConfigError, LogFormat, LoggingConfig, PredictionForm, Theme};
use data_validator::Validator;
use feature_engine::{ModelTarget, RawInput};
use inference_engine::{InferenceError, ModelLoader, ModelRegistry, PredictionResult, Predictor};
use result_cards::{charts, CardError, Comparison, HappinessCard, HdiCard};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Errors surfaced to the command line
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
    #[error(transparent)]
    Card(#[from] CardError),
    #[error("Failed to read input {path}: {source}")]
    InputIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Input {path} is not a JSON object of numbers: {source}")]
    InputFormat {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Failed to install log subscriber: {0}")]
    Logging(String),
}

/// How prediction output is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Result card markup
    #[default]
    Html,
    /// Result and chart spec as JSON
    Json,
}

/// Initialize logging from configuration; logs go to stderr
pub fn init_logging(config: &LoggingConfig) -> Result<(), DashboardError> {
    let (level, unknown) = match config.level.parse::<Level>() {
        Ok(level) => (level, false),
        Err(_) => (Level::INFO, true),
    };

    let result = match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(
            FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(true)
                .with_writer(std::io::stderr)
                .finish(),
        ),
        LogFormat::Json => tracing::subscriber::set_global_default(
            FmtSubscriber::builder()
                .with_max_level(level)
                .with_target(true)
                .with_writer(std::io::stderr)
                .json()
                .finish(),
        ),
    };
    result.map_err(|e| DashboardError::Logging(e.to_string()))?;

    if unknown {
        warn!("Unknown log level {:?}, using info", config.level);
    }
    Ok(())
}

/// Read a JSON object of indicator values
pub fn read_input(path: &Path) -> Result<RawInput, DashboardError> {
    let bytes = std::fs::read(path).map_err(|source| DashboardError::InputIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| DashboardError::InputFormat {
        path: path.to_path_buf(),
        source,
    })
}

/// Form collecting the inputs of a model
pub fn form_for(target: ModelTarget) -> PredictionForm {
    match target {
        ModelTarget::Regression => PredictionForm::Hdi,
        ModelTarget::Classification => PredictionForm::Happiness,
    }
}

/// Form values: the form's defaults overlaid with user entries, validated
/// and clamped into the form's slider ranges
pub fn form_input(config: &AppConfig, form: PredictionForm, entries: &RawInput) -> RawInput {
    let mut input = RawInput::from_form(config, form);
    input.merge(entries);

    let validator = Validator::with_ranges(config.form_fields(form).to_vec());
    let result = validator.validate(&input);
    for error in &result.errors {
        warn!("Invalid input: {}", error);
    }
    if !result.valid {
        let adjusted = validator.clamp(&mut input);
        info!("Clamped {} fields into range", adjusted.len());
    }
    input
}

/// Prediction plus everything needed to render it
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutput {
    pub target: ModelTarget,
    pub result: PredictionResult,
    pub chart: Value,
}

/// Run one model over the form input
pub fn predict(
    config: &AppConfig,
    registry: &ModelRegistry,
    target: ModelTarget,
    entries: &RawInput,
) -> Result<PredictionOutput, DashboardError> {
    let model = match target {
        ModelTarget::Classification => registry.classification(),
        ModelTarget::Regression => registry.regression(),
    };
    let input = form_input(config, form_for(target), entries);
    let result = Predictor::new(model, config).predict(&input)?;
    let chart = prediction_chart(config, target, &result)?;
    info!("{} prediction: {} ({})", target, result.value, result.category);

    Ok(PredictionOutput {
        target,
        result,
        chart,
    })
}

fn prediction_chart(
    config: &AppConfig,
    target: ModelTarget,
    result: &PredictionResult,
) -> Result<Value, DashboardError> {
    match target {
        ModelTarget::Regression => {
            let card = HdiCard::from_result(result)?;
            Ok(charts::hdi_gauge(
                result.value,
                card.category,
                &config.hdi_thresholds,
            ))
        }
        ModelTarget::Classification => Ok(result
            .probabilities
            .as_ref()
            .map(|probs| charts::happiness_probability_chart(probs, &config.theme))
            .unwrap_or(Value::Null)),
    }
}

/// Render a prediction for printing
pub fn render_prediction(
    output: &PredictionOutput,
    format: OutputFormat,
    theme: &Theme,
) -> Result<String, DashboardError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Html => match output.target {
            ModelTarget::Regression => {
                Ok(HdiCard::from_result(&output.result)?.render_html(theme))
            }
            ModelTarget::Classification => {
                Ok(HappinessCard::from_result(&output.result)?.render_html(theme))
            }
        },
    }
}

/// Latest prediction of each model, either of which may be absent
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComparisonOutput {
    pub hdi: Option<PredictionOutput>,
    pub happiness: Option<PredictionOutput>,
}

/// Run the models whose entries were supplied, for the side-by-side view
pub fn compare(
    config: &AppConfig,
    registry: &ModelRegistry,
    hdi_entries: Option<&RawInput>,
    happiness_entries: Option<&RawInput>,
) -> Result<ComparisonOutput, DashboardError> {
    let hdi = hdi_entries
        .map(|entries| predict(config, registry, ModelTarget::Regression, entries))
        .transpose()?;
    let happiness = happiness_entries
        .map(|entries| predict(config, registry, ModelTarget::Classification, entries))
        .transpose()?;
    Ok(ComparisonOutput { hdi, happiness })
}

/// Render a comparison for printing
pub fn render_comparison(
    output: &ComparisonOutput,
    format: OutputFormat,
    theme: &Theme,
) -> Result<String, DashboardError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(output)?),
        OutputFormat::Html => {
            let hdi = output
                .hdi
                .as_ref()
                .map(|o| HdiCard::from_result(&o.result))
                .transpose()?;
            let happiness = output
                .happiness
                .as_ref()
                .map(|o| HappinessCard::from_result(&o.result))
                .transpose()?;
            Ok(Comparison::new(hdi, happiness).render_html(theme))
        }
    }
}

/// Load models from the configured directory
pub fn load_models(config: &AppConfig) -> Result<ModelRegistry, DashboardError> {
    Ok(ModelRegistry::load(&ModelLoader::new(&config.paths.models_dir))?)
}

/// Analyze a dataset and attach chart specs for every available section
pub fn analyze_dataset(config: &AppConfig, path: &Path) -> Result<Value, DashboardError> {
    let dataset = Dataset::from_path(path)?;
    let report = analytics::analyze(&dataset);
    let charts = analysis_charts(config, &report);
    Ok(json!({ "report": report, "charts": charts }))
}

fn analysis_charts(config: &AppConfig, report: &AnalysisReport) -> Value {
    let thresholds = &config.hdi_thresholds;
    let theme = &config.theme;
    let mut out = serde_json::Map::new();
    if let Some(hist) = &report.hdi_histogram {
        out.insert("hdi_histogram".into(), charts::hdi_histogram(hist, thresholds, theme));
    }
    if let Some(counts) = &report.hdi_categories {
        out.insert("hdi_categories".into(), charts::hdi_category_pie(counts));
    }
    if let Some(matrix) = &report.correlation_matrix {
        out.insert("correlation_matrix".into(), charts::correlation_heatmap(matrix));
    }
    if let Some(top) = &report.top_correlations {
        out.insert("top_correlations".into(), charts::top_correlations_chart(top, theme));
    }
    if let Some(scatter) = &report.gdp_vs_hdi {
        out.insert("gdp_vs_hdi".into(), charts::gdp_vs_hdi_scatter(scatter, theme));
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn models_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../saved_models")
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.paths.models_dir = models_dir();
        config
    }

    #[test]
    fn test_form_input_clamps() {
        let config = AppConfig::default();
        let entries = RawInput::new()
            .with("HDI_Index", 1.5)
            .with("Number_of_Patents", 150_000.0);
        let input = form_input(&config, PredictionForm::Happiness, &entries);
        assert_eq!(input.get("HDI_Index"), Some(1.0));
        assert_eq!(input.get("Number_of_Patents"), Some(150_000.0));
        assert_eq!(input.get("GDP_per_Capita_USD"), Some(25_000.0));
        assert_eq!(input.get("Population"), None);
    }

    #[test]
    fn test_hdi_form_uses_its_own_ranges() {
        let config = AppConfig::default();
        let entries = RawInput::new()
            .with("GDP_per_Capita_USD", 120_000.0)
            .with("Olympic_Medals_Count", 5_000.0);
        let input = form_input(&config, PredictionForm::Hdi, &entries);
        assert_eq!(input.get("GDP_per_Capita_USD"), Some(120_000.0));
        assert_eq!(input.get("Olympic_Medals_Count"), Some(3_000.0));
        assert_eq!(input.get("Population"), Some(5.0e7));
        assert_eq!(input.get("Carbon_Footprint"), Some(5.0));
    }

    #[test]
    fn test_hdi_form_defaults_fill_log_columns() {
        let config = config();
        let registry = load_models(&config).unwrap();
        let model = registry.regression();
        let input = form_input(&config, form_for(ModelTarget::Regression), &RawInput::new());
        let prepared = feature_engine::FeatureEngineer::new(&config)
            .prepare_input(&input, &model.feature_names, model.target())
            .unwrap();
        for column in ["Population_log", "Olympic_Medals_Count_log", "Carbon_Footprint_log"] {
            assert!(prepared.get(column).unwrap() > 0.0, "{column}");
        }
    }

    #[test]
    fn test_read_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.json");
        std::fs::write(&path, r#"{"GDP_per_Capita_USD": 42000, "HDI_Index": 0.9}"#).unwrap();
        let input = read_input(&path).unwrap();
        assert_eq!(input.get("GDP_per_Capita_USD"), Some(42_000.0));

        std::fs::write(&path, r#"{"HDI_Index": "high"}"#).unwrap();
        assert!(matches!(read_input(&path), Err(DashboardError::InputFormat { .. })));
        assert!(matches!(
            read_input(&dir.path().join("absent.json")),
            Err(DashboardError::InputIo { .. })
        ));
    }

    #[test]
    fn test_predict_hdi_html_and_json() {
        let config = config();
        let registry = load_models(&config).unwrap();
        let output = predict(&config, &registry, ModelTarget::Regression, &RawInput::new()).unwrap();
        assert!((0.0..=1.0).contains(&output.result.value));
        assert_eq!(output.chart["data"][0]["type"], "indicator");

        let theme = &config.theme;
        let html = render_prediction(&output, OutputFormat::Html, theme).unwrap();
        assert!(html.contains("HDI Prediction Result"));
        let json: Value =
            serde_json::from_str(&render_prediction(&output, OutputFormat::Json, theme).unwrap())
                .unwrap();
        assert_eq!(json["target"], "regression");
    }

    #[test]
    fn test_predict_happiness() {
        let config = config();
        let registry = load_models(&config).unwrap();
        let output = predict(
            &config,
            &registry,
            ModelTarget::Classification,
            &RawInput::new().with("HDI_Index", 0.9),
        )
        .unwrap();
        assert_eq!(output.chart["data"][0]["x"].as_array().unwrap().len(), 8);
        assert_eq!(output.chart["data"][0]["marker"]["color"].as_array().unwrap().len(), 8);
        let html = render_prediction(&output, OutputFormat::Html, &config.theme).unwrap();
        assert!(html.contains("Happiness Level:"));
    }

    #[test]
    fn test_compare() {
        let config = config();
        let registry = load_models(&config).unwrap();

        let only_hdi = compare(&config, &registry, Some(&RawInput::new()), None).unwrap();
        assert!(only_hdi.hdi.is_some() && only_hdi.happiness.is_none());
        let html = render_comparison(&only_hdi, OutputFormat::Html, &config.theme).unwrap();
        assert!(html.contains("HDI Score"));
        assert!(html.contains("Run Happiness prediction to see results"));

        let both = compare(
            &config,
            &registry,
            Some(&RawInput::new()),
            Some(&RawInput::new().with("HDI_Index", 0.9)),
        )
        .unwrap();
        let html = render_comparison(&both, OutputFormat::Html, &config.theme).unwrap();
        assert!(!html.contains("to see results"));
        let json: Value =
            serde_json::from_str(&render_comparison(&both, OutputFormat::Json, &config.theme).unwrap())
                .unwrap();
        assert_eq!(json["hdi"]["target"], "regression");
        assert_eq!(json["happiness"]["target"], "classification");
    }

    #[test]
    fn test_analyze_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(
            &path,
            "Country,HDI_Index,GDP_per_Capita_USD\nA,0.5,2000\nB,0.7,9000\nC,0.9,40000\n",
        )
        .unwrap();
        let value = analyze_dataset(&AppConfig::default(), &path).unwrap();
        assert_eq!(value["report"]["overview"]["records"], 3);
        assert!(value["charts"]["gdp_vs_hdi"].is_object());
        assert!(value["charts"]["hdi_categories"].is_object());
    }
}

//! Global Development Predictor - Main Entry Point

use anyhow::Context;
use app_config::AppConfig;
use clap::{Parser, Subcommand};
use dashboard::{
    analyze_dataset, compare, init_logging, load_models, predict, read_input, render_comparison,
    render_prediction, OutputFormat,
};
use feature_engine::{ModelTarget, RawInput};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "dashboard")]
#[command(about = "HDI and happiness predictions with dataset analysis")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, short, global = true, help = "Configuration file (TOML)")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Predict the Human Development Index")]
    PredictHdi {
        #[arg(long, help = "JSON object of indicator values; omitted fields use form defaults")]
        input: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },

    #[command(about = "Predict the happiness level")]
    PredictHappiness {
        #[arg(long, help = "JSON object of indicator values; omitted fields use form defaults")]
        input: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },

    #[command(about = "Compare HDI and happiness predictions side by side")]
    Compare {
        #[arg(long, help = "HDI form entries; the HDI column is empty when omitted")]
        hdi_input: Option<PathBuf>,

        #[arg(long, help = "Happiness form entries; the happiness column is empty when omitted")]
        happiness_input: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Html)]
        format: OutputFormat,
    },

    #[command(about = "Print the exploratory analysis report as JSON")]
    Analyze {
        #[arg(long, help = "CSV dataset; defaults to the configured dataset")]
        dataset: Option<PathBuf>,
    },
}

fn run_prediction(
    config: &AppConfig,
    target: ModelTarget,
    input: Option<PathBuf>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let entries = match input {
        Some(path) => read_input(&path)?,
        None => RawInput::new(),
    };
    let registry = load_models(config).context("loading models")?;
    let output = predict(config, &registry, target, &entries)?;
    println!("{}", render_prediction(&output, format, &config.theme)?);
    if format == OutputFormat::Html {
        println!("{}", serde_json::to_string_pretty(&output.chart)?);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref()).context("loading configuration")?;
    init_logging(&config.logging)?;

    info!("=== {} v{} ===", config.title, env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::PredictHdi { input, format } => {
            run_prediction(&config, ModelTarget::Regression, input, format)
        }
        Command::PredictHappiness { input, format } => {
            run_prediction(&config, ModelTarget::Classification, input, format)
        }
        Command::Compare {
            hdi_input,
            happiness_input,
            format,
        } => {
            let hdi = hdi_input.as_deref().map(read_input).transpose()?;
            let happiness = happiness_input.as_deref().map(read_input).transpose()?;
            let registry = load_models(&config).context("loading models")?;
            let output = compare(&config, &registry, hdi.as_ref(), happiness.as_ref())?;
            println!("{}", render_comparison(&output, format, &config.theme)?);
            Ok(())
        }
        Command::Analyze { dataset } => {
            let path = dataset.unwrap_or_else(|| config.dataset_path());
            let value = analyze_dataset(&config, &path)
                .with_context(|| format!("analyzing {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

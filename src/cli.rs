use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tabled::Tabled;

use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::output::{print_items, print_report, OutputMode};

#[derive(Parser)]
#[command(name = "medrisk")]
#[command(version)]
#[command(about = "Disease risk prediction from symptom indicators", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration directory
    #[arg(short, long, default_value = "config", env = "MEDRISK_CONFIG_DIR")]
    pub config: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API (default)
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Run one prediction and print the result
    Predict {
        /// Comma-separated symptom identifiers or display names
        #[arg(short, long, value_delimiter = ',')]
        symptoms: Vec<String>,
        /// Comma-separated 0/1 feature vector; prints the single predicted label
        #[arg(long, value_delimiter = ',', conflicts_with = "symptoms")]
        vector: Option<Vec<i64>>,
        /// Print JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// List known symptoms
    Symptoms {
        #[arg(long)]
        json: bool,
    },
    /// List disease classes in model output order
    Classes {
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration as TOML
    Show,
    /// Validate configuration and artifacts
    Validate,
}

#[derive(Tabled)]
struct ClassRow {
    index: usize,
    disease: String,
}

pub fn run_predict(
    ctx: &ServiceContext,
    symptoms: &[String],
    vector: Option<&[i64]>,
    mode: OutputMode,
) -> Result<()> {
    if let Some(vector) = vector {
        let label = ctx.predict_label_vector(vector)?;
        match mode {
            OutputMode::Json => println!("{}", serde_json::json!({ "prediction": label })),
            OutputMode::Table => println!("Prediction: {label}"),
        }
        return Ok(());
    }
    let report = ctx.assess_symptoms(symptoms)?;
    print_report(&report, mode)
}

pub fn list_symptoms(ctx: &ServiceContext, mode: OutputMode) -> Result<()> {
    print_items(&ctx.symptoms()?, mode)
}

pub fn list_classes(ctx: &ServiceContext, mode: OutputMode) -> Result<()> {
    let rows: Vec<ClassRow> = ctx
        .classes()?
        .into_iter()
        .enumerate()
        .map(|(index, disease)| ClassRow { index, disease })
        .collect();
    match mode {
        OutputMode::Json => {
            let labels: Vec<&str> = rows.iter().map(|r| r.disease.as_str()).collect();
            println!("{}", serde_json::to_string_pretty(&labels)?);
            Ok(())
        }
        OutputMode::Table => {
            println!("{}", tabled::Table::new(&rows));
            Ok(())
        }
    }
}

pub fn show_config(config: &AppConfig) -> Result<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Check configuration values, then try a strict artifact load.
pub fn validate_config(config: &AppConfig) -> Result<()> {
    if let Err(errors) = config.validate() {
        for e in &errors {
            println!("✗ {e}");
        }
        bail!("{} configuration error(s)", errors.len());
    }
    println!("✓ Configuration values are valid");

    let mut strict = config.clone();
    strict.artifacts.require_model = true;
    let ctx = ServiceContext::load(&strict)?;
    let engine = ctx.engine()?;
    println!(
        "✓ Artifacts loaded: {} symptoms, {} classes, {} model",
        engine.encoder().catalog().len(),
        engine.classes().len(),
        engine.model_kind()
    );
    if ctx.reference().is_empty() {
        println!("! No reference data loaded; top predictions will not be enriched");
    } else {
        println!("✓ Reference data for {} diseases", ctx.reference().len());
    }
    Ok(())
}

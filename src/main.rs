use anyhow::{bail, Context};
use clap::Parser;
use medrisk::cli::{self, Cli, Commands, ConfigCommands};
use medrisk::config::AppConfig;
use medrisk::context::ServiceContext;
use medrisk::output::OutputMode;
use medrisk::server::start_api_server;
use std::sync::Arc;
use tracing::info;

mod main_runtime;

use main_runtime::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config)
        .with_context(|| format!("failed to load configuration from '{}'", cli.config))?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            init_logging(&config.logging);
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Predict {
            symptoms,
            vector,
            json,
        } => {
            init_logging_simple();
            let ctx = ServiceContext::load(&config)?;
            cli::run_predict(
                &ctx,
                &symptoms,
                vector.as_deref(),
                OutputMode::from_json_flag(json),
            )?;
        }
        Commands::Symptoms { json } => {
            init_logging_simple();
            let ctx = ServiceContext::load(&config)?;
            cli::list_symptoms(&ctx, OutputMode::from_json_flag(json))?;
        }
        Commands::Classes { json } => {
            init_logging_simple();
            let ctx = ServiceContext::load(&config)?;
            cli::list_classes(&ctx, OutputMode::from_json_flag(json))?;
        }
        Commands::Config(ConfigCommands::Show) => {
            cli::show_config(&config)?;
        }
        Commands::Config(ConfigCommands::Validate) => {
            init_logging_simple();
            cli::validate_config(&config)?;
        }
    }

    Ok(())
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    if let Err(errors) = config.validate() {
        for e in &errors {
            tracing::error!("Config error: {}", e);
        }
        bail!("invalid configuration ({} error(s))", errors.len());
    }

    info!(
        model = %config.artifacts.model_path.display(),
        format = %config.artifacts.model_format,
        "Loading prediction artifacts"
    );
    let ctx = Arc::new(ServiceContext::load(&config)?);
    match ctx.status() {
        medrisk::ModelStatus::Ready { model } => info!(model, "Prediction engine ready"),
        medrisk::ModelStatus::Unavailable { reason } => {
            tracing::warn!(%reason, "Starting without a model; readiness will report 503")
        }
    }

    start_api_server(ctx, &config.server).await?;
    Ok(())
}

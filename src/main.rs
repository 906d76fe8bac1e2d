use anyhow::Context;
use breedscan::api::start_api_server;
use breedscan::api::types::PredictionResponse;
use breedscan::cli::{Cli, Commands};
use breedscan::config::AppConfig;
use breedscan::services::Predictor;
use clap::Parser;
use tracing::info;

mod main_runtime;

use main_runtime::{init_logging, init_logging_simple, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(&cli.config_dir)
        .with_context(|| format!("loading config from {}", cli.config_dir.display()))?;
    cli.apply_overrides(&mut config);

    match &cli.command {
        None | Some(Commands::Serve(_)) => {
            init_logging(&config.logging);
            run_server(config).await?;
        }
        Some(Commands::Predict { file }) => {
            init_logging_simple();
            let bytes = tokio::fs::read(file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let predictor = Predictor::load(&config.model);
            let prediction =
                tokio::task::spawn_blocking(move || predictor.predict_bytes(&bytes)).await??;
            println!(
                "{}",
                serde_json::to_string_pretty(&PredictionResponse::from(&prediction))?
            );
        }
        Some(Commands::Check) => {
            init_logging_simple();
            let predictor = Predictor::load(&config.model);
            println!(
                "model  {} ({})",
                if predictor.model_loaded() { "ok" } else { "FAILED" },
                config.model.path.display()
            );
            println!(
                "labels {} ({}, {} classes)",
                if predictor.labels_loaded() { "ok" } else { "FAILED" },
                config.model.labels_path.display(),
                predictor.labels().len()
            );
            if !predictor.is_ready() {
                anyhow::bail!("model or class names failed to load");
            }
        }
    }

    Ok(())
}

async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    info!(
        model = %config.model.path.display(),
        labels = %config.model.labels_path.display(),
        "Starting breedscan v{}",
        env!("CARGO_PKG_VERSION")
    );

    let model_config = config.model.clone();
    let predictor = tokio::task::spawn_blocking(move || Predictor::try_load(&model_config))
        .await
        .context("model loader task panicked")??;

    start_api_server(&config.server, predictor, async {
        shutdown_signal().await;
        info!("Shutdown signal received, draining connections");
    })
    .await?;

    Ok(())
}

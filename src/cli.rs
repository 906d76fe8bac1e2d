use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "breedscan")]
#[command(version)]
#[command(about = "Pet breed image-classification service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory (default.toml, <BREEDSCAN_ENV>.toml)
    #[arg(short, long, default_value = "config", env = "BREEDSCAN_CONFIG_DIR")]
    pub config_dir: PathBuf,

    /// ONNX model path (overrides model.path)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Class-name JSON path (overrides model.labels_path)
    #[arg(long, global = true)]
    pub labels: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP prediction server (default)
    Serve(ServeArgs),
    /// Classify a single image file and print the JSON result
    Predict {
        /// Image file to classify
        file: PathBuf,
    },
    /// Load the model and labels and report what loaded
    Check,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Bind address (overrides server.host)
    #[arg(long)]
    pub host: Option<String>,
    /// Listen port (overrides server.port)
    #[arg(short, long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.model.path = model.clone();
        }
        if let Some(labels) = &self.labels {
            config.model.labels_path = labels.clone();
        }
        if let Some(Commands::Serve(args)) = &self.command {
            if let Some(host) = &args.host {
                config.server.host = host.clone();
            }
            if let Some(port) = args.port {
                config.server.port = port;
            }
        }
    }
}

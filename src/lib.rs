pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod ml;
pub mod services;

pub use config::AppConfig;
pub use error::{BreedScanError, Result};
pub use ml::{ImageClassifier, InputSpec, LabelList, Prediction};
pub use services::{Metrics, Predictor};

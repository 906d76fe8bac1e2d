use thiserror::Error;

/// Message returned when the service started without a usable model or label list.
pub const NOT_LOADED_MESSAGE: &str = "Model or class names not loaded";

/// Main error type for the classification service
#[derive(Error, Debug)]
pub enum BreedScanError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // Image decoding errors surface the decoder's own message
    #[error("{0}")]
    Image(#[from] image::ImageError),

    // Startup errors
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Label list load failed: {0}")]
    LabelLoad(String),

    #[error("{}", NOT_LOADED_MESSAGE)]
    NotLoaded,

    // Inference errors
    #[error("Inference failed: {0}")]
    Inference(String),

    // Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for BreedScanError
pub type Result<T> = std::result::Result<T, BreedScanError>;

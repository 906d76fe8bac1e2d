mod metrics;
mod predictor;

pub use metrics::{Metrics, ServiceGauges};
pub use predictor::Predictor;

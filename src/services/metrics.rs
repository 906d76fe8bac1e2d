use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Request counters for the prediction endpoint
#[derive(Debug, Default)]
pub struct Metrics {
    /// Successful predictions
    pub predictions: AtomicU64,
    /// Requests answered with a 5xx
    pub prediction_failures: AtomicU64,
    /// Requests answered with a 4xx
    pub client_errors: AtomicU64,
    /// Cumulative time spent in decode + inference
    inference_micros: AtomicU64,
}

/// Point-in-time copy of the service gauges that live outside [`Metrics`].
#[derive(Debug, Clone, Copy)]
pub struct ServiceGauges {
    pub ready: bool,
    pub model_loaded: bool,
    pub uptime_seconds: u64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_predictions(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_prediction_failures(&self) {
        self.prediction_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_client_errors(&self) {
        self.client_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_inference(&self, elapsed: Duration) {
        self.inference_micros
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn inference_seconds_total(&self) -> f64 {
        self.inference_micros.load(Ordering::Relaxed) as f64 / 1_000_000.0
    }

    /// Prometheus text exposition
    pub fn render(&self, gauges: ServiceGauges) -> String {
        format!(
            r#"# HELP breedscan_up Readiness (1=model and labels loaded, 0=degraded)
# TYPE breedscan_up gauge
breedscan_up {}

# HELP breedscan_uptime_seconds Uptime in seconds
# TYPE breedscan_uptime_seconds counter
breedscan_uptime_seconds {}

# HELP breedscan_model_loaded Model artifact load status
# TYPE breedscan_model_loaded gauge
breedscan_model_loaded {}

# HELP breedscan_predictions_total Successful predictions
# TYPE breedscan_predictions_total counter
breedscan_predictions_total {}

# HELP breedscan_prediction_failures_total Predictions that ended in a server error
# TYPE breedscan_prediction_failures_total counter
breedscan_prediction_failures_total {}

# HELP breedscan_client_errors_total Rejected prediction requests
# TYPE breedscan_client_errors_total counter
breedscan_client_errors_total {}

# HELP breedscan_inference_seconds_total Time spent decoding and classifying
# TYPE breedscan_inference_seconds_total counter
breedscan_inference_seconds_total {:.6}
"#,
            gauges.ready as u8,
            gauges.uptime_seconds,
            gauges.model_loaded as u8,
            self.predictions.load(Ordering::Relaxed),
            self.prediction_failures.load(Ordering::Relaxed),
            self.client_errors.load(Ordering::Relaxed),
            self.inference_seconds_total(),
        )
    }
}

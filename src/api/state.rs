use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{Metrics, Predictor, ServiceGauges};

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Model + labels, read-only after startup
    pub predictor: Predictor,

    /// Request counters
    pub metrics: Arc<Metrics>,

    /// Application start time
    pub start_time: DateTime<Utc>,

    /// Request body limit enforced by the router
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor,
            metrics: Arc::new(Metrics::new()),
            start_time: Utc::now(),
            max_body_bytes: ServerConfig::default().max_body_bytes,
        }
    }

    /// Get system uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }

    pub fn gauges(&self) -> ServiceGauges {
        ServiceGauges {
            ready: self.predictor.is_ready(),
            model_loaded: self.predictor.model_loaded(),
            uptime_seconds: self.uptime_seconds(),
        }
    }
}

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::context::ServiceContext;
use crate::error::MedriskError;
use crate::services::Metrics;

/// Shared application state for API handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalogs, model and reference data, loaded once at startup
    pub ctx: Arc<ServiceContext>,

    /// Request counters
    pub metrics: Arc<Metrics>,

    /// Application start time
    pub start_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self {
            ctx,
            metrics: Arc::new(Metrics::new()),
            start_time: Utc::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        (Utc::now() - self.start_time).num_seconds().max(0) as u64
    }

    /// Count the outcome of a prediction and convert its error for the response.
    pub fn track<T>(&self, result: Result<T, MedriskError>) -> Result<T, ApiError> {
        match result {
            Ok(value) => {
                self.metrics.inc_predictions();
                Ok(value)
            }
            Err(e) => {
                self.metrics.record_error(&e);
                Err(ApiError::from(e))
            }
        }
    }
}

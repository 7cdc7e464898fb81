use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::MedriskError;

/// Request counters for observability
#[derive(Debug, Default)]
pub struct Metrics {
    /// Prediction requests received
    pub requests: AtomicU64,
    /// Predictions returned successfully
    pub predictions: AtomicU64,
    /// Requests rejected as malformed or unknown input
    pub validation_errors: AtomicU64,
    /// Model calls that failed
    pub inference_errors: AtomicU64,
    /// Requests rejected because the model is not loaded
    pub unavailable: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_predictions(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_validation_errors(&self) {
        self.validation_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a failed request under the matching error counter.
    pub fn record_error(&self, err: &MedriskError) {
        let counter = match err {
            MedriskError::ModelUnavailable(_) => &self.unavailable,
            MedriskError::Inference(_) => &self.inference_errors,
            e if e.is_client_error() => &self.validation_errors,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Export metrics in Prometheus format
    pub fn prometheus(&self, ready: bool, uptime_seconds: u64) -> String {
        format!(
            r#"# HELP medrisk_up Prediction engine ready (1=ready, 0=model unavailable)
# TYPE medrisk_up gauge
medrisk_up {}

# HELP medrisk_uptime_seconds Uptime in seconds
# TYPE medrisk_uptime_seconds counter
medrisk_uptime_seconds {}

# HELP medrisk_requests_total Prediction requests received
# TYPE medrisk_requests_total counter
medrisk_requests_total {}

# HELP medrisk_predictions_total Predictions returned
# TYPE medrisk_predictions_total counter
medrisk_predictions_total {}

# HELP medrisk_validation_errors_total Requests rejected as malformed
# TYPE medrisk_validation_errors_total counter
medrisk_validation_errors_total {}

# HELP medrisk_inference_errors_total Failed model calls
# TYPE medrisk_inference_errors_total counter
medrisk_inference_errors_total {}

# HELP medrisk_unavailable_total Requests rejected while the model is unavailable
# TYPE medrisk_unavailable_total counter
medrisk_unavailable_total {}
"#,
            u8::from(ready),
            uptime_seconds,
            self.requests.load(Ordering::Relaxed),
            self.predictions.load(Ordering::Relaxed),
            self.validation_errors.load(Ordering::Relaxed),
            self.inference_errors.load(Ordering::Relaxed),
            self.unavailable.load(Ordering::Relaxed),
        )
    }
}

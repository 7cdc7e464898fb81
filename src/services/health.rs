//! Health summary for liveness/readiness probes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::context::{ModelStatus, ServiceContext};

/// Health status for a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

/// Component health check result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Overall service health response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub version: String,
    pub components: Vec<ComponentHealth>,
}

impl HealthResponse {
    /// The model decides readiness; missing reference data only degrades.
    pub fn from_context(ctx: &ServiceContext) -> Self {
        let mut components = Vec::with_capacity(2);

        let model = match ctx.status() {
            ModelStatus::Ready { model } => ComponentHealth {
                name: "model".to_string(),
                status: HealthStatus::Healthy,
                message: Some(format!("{model} classifier loaded")),
            },
            ModelStatus::Unavailable { reason } => ComponentHealth {
                name: "model".to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(reason),
            },
        };
        let mut overall = model.status;
        components.push(model);

        let reference = if ctx.reference().is_empty() {
            if overall == HealthStatus::Healthy {
                overall = HealthStatus::Degraded;
            }
            ComponentHealth {
                name: "reference_data".to_string(),
                status: HealthStatus::Degraded,
                message: Some("No disease descriptions loaded".to_string()),
            }
        } else {
            ComponentHealth {
                name: "reference_data".to_string(),
                status: HealthStatus::Healthy,
                message: Some(format!("{} diseases", ctx.reference().len())),
            }
        };
        components.push(reference);

        let uptime = (Utc::now() - ctx.loaded_at()).num_seconds().max(0) as u64;

        Self {
            status: overall,
            timestamp: Utc::now(),
            uptime_seconds: uptime,
            version: env!("CARGO_PKG_VERSION").to_string(),
            components,
        }
    }
}

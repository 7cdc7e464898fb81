pub mod health;
pub mod metrics;

pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use metrics::Metrics;

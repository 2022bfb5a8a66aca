//! API layer
//!
//! JSON and machine-facing endpoints:
//! - Health check (`/api/health`)
//! - Metrics (Prometheus)

pub mod health;
pub mod metrics;

pub use health::{HealthReport, OverallStatus, ServiceStatus, health_router};
pub use metrics::metrics_router;

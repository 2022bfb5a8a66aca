//! Health check endpoint
//!
//! Always answers 200. A failing dependency is reported in the body as
//! `"degraded"` instead of an error status.

use std::time::Instant;

use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::AppState;
use crate::auth::SessionClient;
use crate::metrics::HEALTH_CHECKS_TOTAL;

/// Status of a single dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Error,
    /// The dependency was not probed
    Unknown,
}

/// Overall status; `Healthy` only when every dependency is healthy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

impl OverallStatus {
    fn label(self) -> &'static str {
        match self {
            OverallStatus::Healthy => "healthy",
            OverallStatus::Degraded => "degraded",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Services {
    pub supabase: ServiceStatus,
}

/// Body of `GET /api/health`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: OverallStatus,
    pub timestamp: String,
    /// Time spent probing dependencies, e.g. `"12ms"`
    pub response_time: String,
    pub services: Services,
    pub version: &'static str,
}

impl HealthReport {
    fn new(supabase: ServiceStatus, started: Instant) -> Self {
        let status = if supabase == ServiceStatus::Healthy {
            OverallStatus::Healthy
        } else {
            OverallStatus::Degraded
        };

        Self {
            status,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            response_time: format!("{}ms", started.elapsed().as_millis()),
            services: Services { supabase },
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// Create health router
///
/// Routes:
/// - GET /health - Health report
///
/// Nested under `/api` by `build_router`.
pub fn health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Issue one bounded query against the configured table.
///
/// The query uses the anon key so a stale session cookie on the caller
/// cannot make a healthy backend look broken.
async fn probe_supabase(client: &SessionClient, table: &str) -> ServiceStatus {
    if table.is_empty() {
        return ServiceStatus::Unknown;
    }

    match client
        .from_anon(table)
        .select("count")
        .limit(1)
        .execute()
        .await
    {
        Ok(_) => ServiceStatus::Healthy,
        Err(error) => {
            tracing::warn!(%error, table, "Supabase health probe failed");
            ServiceStatus::Error
        }
    }
}

/// GET /api/health
async fn health_check(State(state): State<AppState>, client: SessionClient) -> impl IntoResponse {
    let started = Instant::now();
    let supabase = probe_supabase(&client, &state.config.supabase.health_table).await;
    let report = HealthReport::new(supabase, started);

    HEALTH_CHECKS_TOTAL
        .with_label_values(&[report.status.label()])
        .inc();

    Json(report)
}

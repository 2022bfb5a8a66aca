//! Prometheus scrape endpoint

use anyhow::Context;
use axum::{
    Router,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::{Encoder, TextEncoder};

use crate::error::AppError;
use crate::metrics::REGISTRY;

/// GET /metrics
///
/// Renders every registered instrument in the Prometheus text format.
async fn scrape() -> Result<Response, AppError> {
    let encoder = TextEncoder::new();
    let families = REGISTRY.gather();

    let body = encoder
        .encode_to_string(&families)
        .context("Failed to encode metrics")?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, encoder.format_type().to_string())],
        body,
    )
        .into_response())
}

/// Create metrics router
///
/// Only mounted when `metrics.enabled` is set.
pub fn metrics_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(scrape))
}

//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Auth Metrics
    pub static ref AUTH_CALLBACKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("vibekit_auth_callbacks_total", "OAuth callback requests by outcome"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref SIGN_INS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("vibekit_sign_ins_total", "Sign-in attempts by method and outcome"),
        &["method", "outcome"]
    ).expect("metric can be created");

    // Backend Metrics
    pub static ref BACKEND_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("vibekit_backend_requests_total", "Requests sent to Supabase"),
        &["operation", "outcome"]
    ).expect("metric can be created");
    pub static ref BACKEND_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "vibekit_backend_request_duration_seconds",
            "Supabase request duration in seconds"
        ).buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["operation"]
    ).expect("metric can be created");

    // Health Metrics
    pub static ref HEALTH_CHECKS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("vibekit_health_checks_total", "Health checks by reported status"),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("vibekit_errors_total", "Total number of error responses"),
        &["error_type"]
    ).expect("metric can be created");
}

/// Initialize metrics registry.
pub fn init_metrics() {
    REGISTRY
        .register(Box::new(AUTH_CALLBACKS_TOTAL.clone()))
        .expect("AUTH_CALLBACKS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(SIGN_INS_TOTAL.clone()))
        .expect("SIGN_INS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(BACKEND_REQUESTS_TOTAL.clone()))
        .expect("BACKEND_REQUESTS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(BACKEND_REQUEST_DURATION_SECONDS.clone()))
        .expect("BACKEND_REQUEST_DURATION_SECONDS can be registered");
    REGISTRY
        .register(Box::new(HEALTH_CHECKS_TOTAL.clone()))
        .expect("HEALTH_CHECKS_TOTAL can be registered");
    REGISTRY
        .register(Box::new(ERRORS_TOTAL.clone()))
        .expect("ERRORS_TOTAL can be registered");

    tracing::info!("Metrics registry initialized");
}

/// Record the outcome and latency of one Supabase call.
pub fn observe_backend_request(operation: &str, started: std::time::Instant, ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    BACKEND_REQUESTS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
    BACKEND_REQUEST_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(started.elapsed().as_secs_f64());
}

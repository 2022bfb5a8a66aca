//! Vibekit - Server-rendered web starter backed by Supabase
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Layer (Axum)                       │
//! │  - Pages: home, login, signup, dashboard                    │
//! │  - Auth flows: password, OAuth, callback, logout            │
//! │  - API: health check, metrics                               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Session Client (per request)                │
//! │  - Reads and writes the session cookies                     │
//! │  - Refreshes expired access tokens                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Supabase (remote)                       │
//! │  - GoTrue auth API                                          │
//! │  - PostgREST data API                                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: Health check and metrics endpoints
//! - `auth`: Sign-in flows, OAuth callback, per-request session client
//! - `pages`: Server-rendered HTML pages
//! - `supabase`: Supabase HTTP client
//! - `utils`: Class-name merging, date and text helpers
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod metrics;
pub mod pages;
pub mod supabase;
pub mod utils;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// Holds no per-user data. Everything tied to a visitor lives in their
/// cookies and is accessed through `auth::SessionClient`.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Supabase API
    pub backend: Arc<dyn supabase::SupabaseApi>,
}

impl AppState {
    /// Initialize application state with the HTTP Supabase client
    ///
    /// # Errors
    /// Returns error if the Supabase client cannot be built from the
    /// configuration
    pub fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        let backend = supabase::SupabaseClient::new(&config.supabase)?;
        tracing::info!(url = %config.supabase.url, "Supabase client initialized");

        Ok(Self::with_backend(config, Arc::new(backend)))
    }

    /// Build state around an existing backend implementation.
    pub fn with_backend(
        config: config::AppConfig,
        backend: Arc<dyn supabase::SupabaseApi>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            backend,
        }
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower::ServiceBuilder;
    use tower_http::{compression::CompressionLayer, trace::TraceLayer};

    let cors_layer = build_cors_layer(&state.config.server);
    let metrics_enabled = state.config.metrics.enabled;

    let router = Router::new()
        .merge(pages::pages_router())
        .merge(auth::auth_router())
        .nest("/api", api::health_router())
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer)
                .layer(CompressionLayer::new()),
        )
        .with_state(state);

    if metrics_enabled {
        router.merge(api::metrics_router())
    } else {
        router
    }
}

fn build_cors_layer(server: &config::ServerConfig) -> tower_http::cors::CorsLayer {
    use axum::http::HeaderValue;
    use tower_http::cors::{Any, CorsLayer};

    if !server.protocol.eq_ignore_ascii_case("https") {
        return CorsLayer::permissive();
    }

    let allowed_origin = server.base_url();
    match HeaderValue::from_str(&allowed_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin([origin])
            .allow_methods(Any)
            .allow_headers(Any),
        Err(error) => {
            tracing::error!(
                %error,
                origin = %allowed_origin,
                "Failed to parse CORS origin from server base URL; denying cross-origin requests"
            );
            CorsLayer::new().allow_methods(Any).allow_headers(Any)
        }
    }
}

async fn not_found() -> error::AppError {
    error::AppError::NotFound
}

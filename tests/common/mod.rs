//! Common test utilities for E2E tests
//!
//! Every `TestServer` runs the real router against an in-process fake
//! Supabase that speaks just enough of the GoTrue and PostgREST wire
//! formats for the flows under test.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use vibekit::{AppState, config};

pub const ANON_KEY: &str = "test-anon-key";
pub const VALID_CODE: &str = "valid-code";
pub const ACCESS_TOKEN: &str = "access-token";
pub const REFRESH_TOKEN: &str = "refresh-token";
pub const REFRESHED_ACCESS_TOKEN: &str = "access-refreshed";
pub const ROTATED_REFRESH_TOKEN: &str = "refresh-rotated";
pub const USER_EMAIL: &str = "ada@example.com";
pub const USER_PASSWORD: &str = "correct-horse";
pub const USER_ID: &str = "8d0b7f0e-2c1a-4a57-9d7b-3f1f5f4a2b10";
pub const PUBLIC_ORIGIN: &str = "https://app.example.com";

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub supabase: Arc<FakeSupabase>,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server backed by a fresh fake Supabase
    pub async fn new() -> Self {
        let supabase = Arc::new(FakeSupabase::default());
        let supabase_url = spawn(fake_supabase_router(supabase.clone())).await;
        Self::start(supabase, &supabase_url).await
    }

    /// Create a test server whose Supabase URL points at nothing
    pub async fn with_unreachable_supabase() -> Self {
        // Bind and drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        Self::start(Arc::new(FakeSupabase::default()), &format!("http://{addr}")).await
    }

    async fn start(supabase: Arc<FakeSupabase>, supabase_url: &str) -> Self {
        let config = test_config(supabase_url);
        let state = AppState::new(config).unwrap();

        // Redirects are asserted on, never followed
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        let addr = spawn(vibekit::build_router(state.clone())).await;

        Self {
            addr,
            state,
            supabase,
            client,
        }
    }

    /// Get base URL for requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// GET with the given cookies attached
    pub async fn get_with_cookies(
        &self,
        path: &str,
        cookies: &[(&str, &str)],
    ) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header(reqwest::header::COOKIE, cookie_header(cookies))
            .send()
            .await
            .unwrap()
    }
}

pub fn test_config(supabase_url: &str) -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            domain: "app.example.com".to_string(),
            protocol: "https".to_string(),
        },
        supabase: config::SupabaseConfig {
            url: supabase_url.to_string(),
            anon_key: ANON_KEY.to_string(),
            health_table: "profiles".to_string(),
            request_timeout_seconds: 5,
        },
        auth: config::AuthConfig {
            cookie_prefix: "sb".to_string(),
            session_max_age: 604800,
            providers: vec!["github".to_string(), "google".to_string()],
        },
        app: config::AppInfoConfig {
            name: "Vibe Coding Template".to_string(),
            description: "Test instance".to_string(),
        },
        metrics: config::MetricsConfig { enabled: true },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

// =============================================================================
// Cookie helpers
// =============================================================================

pub fn cookie_header(cookies: &[(&str, &str)]) -> String {
    cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// All `Set-Cookie` headers of a response
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

/// Value set for `name`, if the response sets it
pub fn set_cookie_value(response: &reqwest::Response, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    set_cookies(response).into_iter().find_map(|cookie| {
        cookie
            .strip_prefix(&prefix)
            .map(|rest| rest.split(';').next().unwrap_or_default().to_string())
    })
}

/// True when the response expires cookie `name`
pub fn clears_cookie(response: &reqwest::Response, name: &str) -> bool {
    let prefix = format!("{name}=");
    set_cookies(response)
        .iter()
        .any(|cookie| cookie.starts_with(&prefix) && cookie.contains("Max-Age=0"))
}

pub fn location(response: &reqwest::Response) -> String {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

// =============================================================================
// Fake Supabase
// =============================================================================

/// Knobs and recordings of the fake Supabase
#[derive(Default)]
pub struct FakeSupabase {
    /// Make table queries fail with 503
    pub data_api_down: AtomicBool,
    /// Answer sign-ups with a bare user (email confirmation pending)
    pub require_email_confirmation: AtomicBool,
    /// Verifiers received by the PKCE token grant
    pub code_verifiers: Mutex<Vec<String>>,
    /// Access tokens revoked through `/logout`
    pub revoked: Mutex<Vec<String>>,
}

fn fake_supabase_router(fake: Arc<FakeSupabase>) -> Router {
    Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/user", get(user))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/logout", post(logout))
        .route("/rest/v1/:table", get(select))
        .with_state(fake)
}

pub fn user_json() -> Value {
    json!({
        "id": USER_ID,
        "aud": "authenticated",
        "role": "authenticated",
        "email": USER_EMAIL,
        "created_at": "2024-06-01T12:00:00.000000Z",
        "app_metadata": { "provider": "github", "providers": ["github"] },
        "user_metadata": { "full_name": "Ada Lovelace" }
    })
}

fn session_json(access_token: &str, refresh_token: &str) -> Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_900_000_000,
        "refresh_token": refresh_token,
        "user": user_json()
    })
}

fn gotrue_error(status: StatusCode, error_code: &str, msg: &str) -> Response {
    (
        status,
        Json(json!({ "code": status.as_u16(), "error_code": error_code, "msg": msg })),
    )
        .into_response()
}

fn has_api_key(headers: &HeaderMap) -> bool {
    headers.get("apikey").and_then(|v| v.to_str().ok()) == Some(ANON_KEY)
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[derive(Deserialize)]
struct GrantQuery {
    grant_type: String,
}

async fn token(
    State(fake): State<Arc<FakeSupabase>>,
    headers: HeaderMap,
    Query(query): Query<GrantQuery>,
    Json(body): Json<Value>,
) -> Response {
    if !has_api_key(&headers) {
        return gotrue_error(StatusCode::UNAUTHORIZED, "no_api_key", "No API key found in request");
    }

    match query.grant_type.as_str() {
        "pkce" => {
            let verifier = body["code_verifier"].as_str().unwrap_or_default().to_string();
            fake.code_verifiers.lock().unwrap().push(verifier.clone());

            if body["auth_code"] == VALID_CODE && !verifier.is_empty() {
                Json(session_json(ACCESS_TOKEN, REFRESH_TOKEN)).into_response()
            } else {
                gotrue_error(
                    StatusCode::NOT_FOUND,
                    "flow_state_not_found",
                    "invalid flow state, no valid flow state found",
                )
            }
        }
        "password" => {
            if body["email"] == USER_EMAIL && body["password"] == USER_PASSWORD {
                Json(session_json(ACCESS_TOKEN, REFRESH_TOKEN)).into_response()
            } else {
                gotrue_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_credentials",
                    "Invalid login credentials",
                )
            }
        }
        "refresh_token" => {
            if body["refresh_token"] == REFRESH_TOKEN {
                Json(session_json(REFRESHED_ACCESS_TOKEN, ROTATED_REFRESH_TOKEN)).into_response()
            } else {
                gotrue_error(
                    StatusCode::BAD_REQUEST,
                    "refresh_token_not_found",
                    "Invalid Refresh Token: Refresh Token Not Found",
                )
            }
        }
        other => gotrue_error(
            StatusCode::BAD_REQUEST,
            "validation_failed",
            &format!("unsupported grant_type {other}"),
        ),
    }
}

async fn user(headers: HeaderMap) -> Response {
    match bearer(&headers) {
        Some(ACCESS_TOKEN) | Some(REFRESHED_ACCESS_TOKEN) if has_api_key(&headers) => {
            Json(user_json()).into_response()
        }
        _ => gotrue_error(
            StatusCode::UNAUTHORIZED,
            "bad_jwt",
            "invalid JWT: unable to parse or verify signature, token has invalid claims: token is expired",
        ),
    }
}

async fn signup(State(fake): State<Arc<FakeSupabase>>, Json(body): Json<Value>) -> Response {
    if body["email"] == "taken@example.com" {
        return gotrue_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "user_already_exists",
            "User already registered",
        );
    }

    if fake.require_email_confirmation.load(Ordering::SeqCst) {
        Json(user_json()).into_response()
    } else {
        Json(session_json(ACCESS_TOKEN, REFRESH_TOKEN)).into_response()
    }
}

async fn logout(State(fake): State<Arc<FakeSupabase>>, headers: HeaderMap) -> StatusCode {
    if let Some(token) = bearer(&headers) {
        fake.revoked.lock().unwrap().push(token.to_string());
    }
    StatusCode::NO_CONTENT
}

async fn select(
    State(fake): State<Arc<FakeSupabase>>,
    Path(table): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !has_api_key(&headers) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "No API key found in request" })),
        )
            .into_response();
    }
    let known_jwt = bearer(&headers)
        .is_none_or(|token| [ANON_KEY, ACCESS_TOKEN, REFRESHED_ACCESS_TOKEN].contains(&token));
    if !known_jwt {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": "PGRST301", "message": "JWT expired" })),
        )
            .into_response();
    }
    if fake.data_api_down.load(Ordering::SeqCst) {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "message": "Service Unavailable" })),
        )
            .into_response();
    }
    if table != "profiles" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({
                "code": "42P01",
                "message": format!("relation \"public.{table}\" does not exist")
            })),
        )
            .into_response();
    }

    Json(json!([{ "count": 1 }])).into_response()
}

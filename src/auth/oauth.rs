//! Sign-in flows
//!
//! Every flow delegates to Supabase through the per-request
//! [`SessionClient`]; this module only validates input, picks the
//! redirect and forwards cookie changes.

use axum::{
    Form, Router,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;

use super::SessionClient;
use super::callback::callback;
use super::redirect::resolve_redirect;
use crate::AppState;
use crate::error::AppError;
use crate::metrics::SIGN_INS_TOTAL;
use crate::pages::{login_page, signup_page};
use crate::supabase::SignUpOutcome;

/// Minimum password length enforced by Supabase's default policy
const MIN_PASSWORD_LEN: usize = 6;

/// Create authentication router
///
/// Routes:
/// - GET /login - Login page
/// - POST /login - Email/password sign-in
/// - GET /signup - Signup page
/// - POST /signup - Email/password registration
/// - GET /auth/oauth/:provider - Redirect to the OAuth provider
/// - GET /callback - OAuth / email confirmation callback
/// - POST /logout - Logout
pub fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(password_login))
        .route("/signup", get(signup_page).post(password_signup))
        .route("/auth/oauth/:provider", get(oauth_redirect))
        .route("/callback", get(callback))
        .route("/logout", post(logout))
}

/// Relative location with percent-encoded query parameters.
fn location_with(path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

// =============================================================================
// Email + password
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
    #[serde(default)]
    redirect: Option<String>,
}

/// POST /login
async fn password_login(mut client: SessionClient, Form(form): Form<LoginForm>) -> Response {
    let target = resolve_redirect(form.redirect.as_deref());
    let email = form.email.trim();

    if email.is_empty() || form.password.is_empty() {
        let location = location_with(
            "/login",
            &[
                ("error", "Email and password are required"),
                ("redirect", target.as_str()),
            ],
        );
        return Redirect::to(&location).into_response();
    }

    match client.sign_in_with_password(email, &form.password).await {
        Ok(session) => {
            SIGN_INS_TOTAL.with_label_values(&["password", "ok"]).inc();
            tracing::info!(user_id = %session.user.id, "Signed in with password");
            (client.into_jar(), Redirect::to(&target)).into_response()
        }
        Err(error) => {
            SIGN_INS_TOTAL
                .with_label_values(&["password", "error"])
                .inc();
            tracing::warn!(%error, "Password sign-in failed");
            let location = location_with(
                "/login",
                &[
                    ("error", error.to_string().as_str()),
                    ("redirect", target.as_str()),
                ],
            );
            (client.into_jar(), Redirect::to(&location)).into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignUpForm {
    email: String,
    password: String,
}

/// POST /signup
async fn password_signup(
    State(state): State<AppState>,
    mut client: SessionClient,
    Form(form): Form<SignUpForm>,
) -> Response {
    let email = form.email.trim();

    if email.is_empty() {
        return Redirect::to(&location_with("/signup", &[("error", "Email is required")]))
            .into_response();
    }
    if form.password.chars().count() < MIN_PASSWORD_LEN {
        let message = format!("Password must be at least {MIN_PASSWORD_LEN} characters");
        return Redirect::to(&location_with("/signup", &[("error", message.as_str())]))
            .into_response();
    }

    let email_redirect_to = format!("{}/callback", state.config.server.base_url());
    match client
        .sign_up(email, &form.password, &email_redirect_to)
        .await
    {
        Ok(SignUpOutcome::SignedIn(session)) => {
            tracing::info!(user_id = %session.user.id, "Signed up and signed in");
            (client.into_jar(), Redirect::to(super::redirect::DEFAULT_REDIRECT)).into_response()
        }
        Ok(SignUpOutcome::ConfirmationSent(user)) => {
            tracing::info!(user_id = %user.id, "Sign-up confirmation email sent");
            let location = location_with(
                "/signup",
                &[("message", "Check your email to confirm your account")],
            );
            (client.into_jar(), Redirect::to(&location)).into_response()
        }
        Err(error) => {
            tracing::warn!(%error, "Sign-up failed");
            let location = location_with("/signup", &[("error", error.to_string().as_str())]);
            (client.into_jar(), Redirect::to(&location)).into_response()
        }
    }
}

// =============================================================================
// OAuth
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OAuthStartQuery {
    redirect: Option<String>,
}

/// GET /auth/oauth/:provider
///
/// Redirects the user to the provider via Supabase.
///
/// # Steps
/// 1. Check the provider is enabled
/// 2. Store a PKCE verifier in a cookie
/// 3. Redirect to Supabase's authorize endpoint, which bounces to the provider
async fn oauth_redirect(
    State(state): State<AppState>,
    Path(provider): Path<String>,
    Query(query): Query<OAuthStartQuery>,
    mut client: SessionClient,
) -> Result<Response, AppError> {
    if !state.config.auth.providers.iter().any(|p| *p == provider) {
        return Err(AppError::Validation(format!(
            "Unsupported OAuth provider: {provider}"
        )));
    }

    let target = resolve_redirect(query.redirect.as_deref());
    let redirect_to = format!(
        "{}/callback?redirect={}",
        state.config.server.base_url(),
        urlencoding::encode(&target)
    );

    let authorize_url = client.begin_oauth(&provider, &redirect_to)?;
    tracing::debug!(%provider, "Starting OAuth sign-in");

    Ok((client.into_jar(), Redirect::to(authorize_url.as_str())).into_response())
}

// =============================================================================
// Logout
// =============================================================================

/// POST /logout
///
/// Revokes the session upstream, clears session cookies and redirects to login.
async fn logout(mut client: SessionClient) -> impl IntoResponse {
    client.sign_out().await;
    (client.into_jar(), Redirect::to("/login"))
}

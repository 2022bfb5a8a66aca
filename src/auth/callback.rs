//! OAuth / email-confirmation callback
//!
//! Supabase redirects the browser here with either `code` or `error`.
//! The request is resolved in strict order:
//!
//! 1. `error` present: redirect to `/login?error=<description or error>`
//! 2. `code` present: exchange it; on failure redirect to
//!    `/login?error=<message>`, on success redirect to the target path
//! 3. neither: redirect to `/login`
//!
//! Exchanges are never retried. The session cookies are written by
//! [`SessionClient::exchange_code_for_session`].

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::AppState;
use crate::auth::SessionClient;
use crate::auth::redirect::resolve_redirect;
use crate::metrics::AUTH_CALLBACKS_TOTAL;

/// Query parameters Supabase appends to the callback URL
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub redirect: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// How a callback request was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackOutcome {
    /// The provider reported an error (declined, cancelled, ...)
    ProviderError(String),
    /// The code could not be exchanged
    ExchangeFailed(String),
    /// Session established; continue to this same-origin path
    SignedIn(String),
    /// Neither `code` nor `error` was supplied
    MissingCode,
}

impl CallbackOutcome {
    /// Absolute redirect location under `origin`.
    pub fn location(&self, origin: &str) -> String {
        match self {
            CallbackOutcome::ProviderError(message) | CallbackOutcome::ExchangeFailed(message) => {
                format!("{origin}/login?error={}", urlencoding::encode(message))
            }
            CallbackOutcome::SignedIn(target) => format!("{origin}{target}"),
            CallbackOutcome::MissingCode => format!("{origin}/login"),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            CallbackOutcome::ProviderError(_) => "provider_error",
            CallbackOutcome::ExchangeFailed(_) => "exchange_failed",
            CallbackOutcome::SignedIn(_) => "signed_in",
            CallbackOutcome::MissingCode => "missing_code",
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolve a callback request against the session client.
pub async fn resolve_callback(
    client: &mut SessionClient,
    query: &CallbackQuery,
) -> CallbackOutcome {
    if let Some(error) = non_empty(&query.error) {
        let description = non_empty(&query.error_description);
        tracing::error!(error, error_description = ?description, "OAuth error");
        return CallbackOutcome::ProviderError(description.unwrap_or(error).to_string());
    }

    if let Some(code) = non_empty(&query.code) {
        return match client.exchange_code_for_session(code).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Signed in via callback");
                CallbackOutcome::SignedIn(resolve_redirect(query.redirect.as_deref()))
            }
            Err(error) => {
                tracing::error!(%error, "Code exchange error");
                CallbackOutcome::ExchangeFailed(error.to_string())
            }
        };
    }

    CallbackOutcome::MissingCode
}

/// GET /callback
pub async fn callback(
    State(state): State<AppState>,
    mut client: SessionClient,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let outcome = resolve_callback(&mut client, &query).await;
    AUTH_CALLBACKS_TOTAL
        .with_label_values(&[outcome.label()])
        .inc();

    let location = outcome.location(&state.config.server.base_url());
    (client.into_jar(), Redirect::temporary(&location)).into_response()
}

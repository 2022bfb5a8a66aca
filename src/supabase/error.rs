//! Errors returned by Supabase calls.
//!
//! `Display` is the human-readable message that ends up in
//! `/login?error=...`, so variants carry the upstream `msg` verbatim.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    /// Non-success answer from GoTrue or PostgREST
    #[error("{message}")]
    Api {
        status: StatusCode,
        code: Option<String>,
        message: String,
    },

    /// The browser has no PKCE verifier cookie for this exchange
    #[error("PKCE code verifier not found in storage. Please restart the sign-in flow.")]
    MissingCodeVerifier,

    /// The request never produced a response
    #[error("Unable to reach the authentication service: {0}")]
    Transport(#[from] reqwest::Error),

    /// A request URL could not be built
    #[error("Invalid Supabase URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Table names are path segments and must be plain identifiers
    #[error("Invalid table name: {0:?}")]
    InvalidTable(String),

    /// The response body did not have the expected shape
    #[error("Unexpected response from Supabase: {0}")]
    Decode(String),
}

impl BackendError {
    /// Build an `Api` error from a non-success status and raw body.
    ///
    /// GoTrue answers with `{code, error_code, msg}` on current versions
    /// and `{error, error_description}` on older ones; PostgREST uses
    /// `{code, message, details, hint}`.
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();

        let message = parsed
            .msg
            .or(parsed.error_description)
            .or(parsed.message)
            .or_else(|| parsed.error.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Request failed")
                    .to_string()
            });

        let code = parsed.error_code.or(parsed.error).or(match parsed.code {
            Some(serde_json::Value::String(code)) => Some(code),
            _ => None,
        });

        BackendError::Api {
            status,
            code,
            message,
        }
    }

    /// True when the access token was rejected (expired, revoked or malformed).
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            BackendError::Api { status, .. }
                if *status == StatusCode::UNAUTHORIZED || *status == StatusCode::FORBIDDEN
        )
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    code: Option<serde_json::Value>,
    error_code: Option<String>,
    msg: Option<String>,
    message: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

//! Supabase integration
//!
//! Supabase owns sessions, token exchange and row-level security. This
//! module only describes the calls made to it (`SupabaseApi`) and the
//! HTTP implementation of those calls (`SupabaseClient`).

mod client;
pub mod error;
mod types;

use async_trait::async_trait;
use url::Url;

pub use client::SupabaseClient;
pub use error::BackendError;
pub use types::{
    AppMetadata, PasswordCredentials, Session, SignUpOutcome, SignUpRequest, TableQuery, User,
    UserMetadata,
};

/// Capabilities the application needs from Supabase.
///
/// Handlers never hold an implementation directly; they go through the
/// per-request `auth::SessionClient`, which owns the cookies.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupabaseApi: Send + Sync {
    /// Resolve the user behind an access token.
    async fn get_user(&self, access_token: &str) -> Result<User, BackendError>;

    /// Trade a single-use authorization code (PKCE flow) for a session.
    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session, BackendError>;

    async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<Session, BackendError>;

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, BackendError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError>;

    /// Revoke the refresh tokens behind an access token.
    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    /// URL the browser is sent to in order to start an OAuth sign-in.
    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<Url, BackendError>;

    /// Run a read-only table query.
    async fn select(&self, query: &TableQuery) -> Result<serde_json::Value, BackendError>;
}

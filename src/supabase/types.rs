//! Wire types for the Supabase auth and data APIs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user as reported by `GET /auth/v1/user`
///
/// Only the fields the pages read are modelled; the rest of the
/// payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub app_metadata: AppMetadata,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl User {
    /// Name reported by the OAuth provider, if any.
    pub fn display_name(&self) -> Option<&str> {
        self.user_metadata
            .full_name
            .as_deref()
            .or(self.user_metadata.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }

    /// Sign-in provider, `email` when the user signed up with a password.
    pub fn provider(&self) -> &str {
        self.app_metadata
            .provider
            .as_deref()
            .filter(|provider| !provider.is_empty())
            .unwrap_or("email")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppMetadata {
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub providers: Vec<String>,
}

/// Profile fields copied from the OAuth identity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Token pair issued by the token endpoint
#[derive(Clone, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("expires_at", &self.expires_at)
            .field("user", &self.user.id)
            .finish_non_exhaustive()
    }
}

/// Email + password sign-in
#[derive(Clone, Serialize)]
pub struct PasswordCredentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for PasswordCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordCredentials")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Email + password registration using the PKCE flow
#[derive(Clone)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    /// Where the confirmation email should land (our `/callback`)
    pub email_redirect_to: String,
    pub code_challenge: String,
}

impl std::fmt::Debug for SignUpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpRequest")
            .field("email", &self.email)
            .field("email_redirect_to", &self.email_redirect_to)
            .finish_non_exhaustive()
    }
}

/// Result of a registration
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    /// Auto-confirmed project: the user is signed in immediately
    SignedIn(Session),
    /// A confirmation email was sent
    ConfirmationSent(User),
}

/// `GET /rest/v1/<table>?select=<columns>&limit=<n>`
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub table: String,
    pub columns: String,
    pub limit: Option<u32>,
    /// Caller's access token; the anon key is used when absent
    pub access_token: Option<String>,
}

impl TableQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            limit: None,
            access_token: None,
        }
    }
}

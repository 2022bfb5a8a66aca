//! Per-request session client
//!
//! `SessionClient` is built for every request from the shared Supabase
//! handle and the request's cookies. Session tokens live only in the
//! browser's cookies; nothing about a user is kept server-side.
//!
//! Handlers that may change the session must return [`SessionClient::into_jar`]
//! as part of their response so the `Set-Cookie` headers are emitted.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use url::Url;

use crate::AppState;
use crate::auth::pkce::PkcePair;
use crate::supabase::{
    BackendError, PasswordCredentials, Session, SignUpOutcome, SignUpRequest, SupabaseApi,
    TableQuery, User,
};

/// Lifetime of the PKCE verifier cookie
const CODE_VERIFIER_MAX_AGE_SECS: i64 = 600;

/// Cookie names and attributes for one deployment
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub prefix: String,
    pub secure: bool,
    pub max_age_secs: i64,
}

impl CookieSettings {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            prefix: state.config.auth.cookie_prefix.clone(),
            secure: state.config.should_use_secure_cookies(),
            max_age_secs: state.config.auth.session_max_age,
        }
    }

    pub fn access_token_name(&self) -> String {
        format!("{}-access-token", self.prefix)
    }

    pub fn refresh_token_name(&self) -> String {
        format!("{}-refresh-token", self.prefix)
    }

    pub fn code_verifier_name(&self) -> String {
        format!("{}-code-verifier", self.prefix)
    }

    fn build(&self, name: String, value: String, max_age_secs: i64) -> Cookie<'static> {
        Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(time::Duration::seconds(max_age_secs))
            .build()
    }

    fn removal(&self, name: String) -> Cookie<'static> {
        Cookie::build(name).path("/").build()
    }
}

/// Handle to Supabase scoped to the current request
pub struct SessionClient {
    backend: Arc<dyn SupabaseApi>,
    jar: CookieJar,
    cookies: CookieSettings,
}

impl SessionClient {
    pub fn new(backend: Arc<dyn SupabaseApi>, jar: CookieJar, cookies: CookieSettings) -> Self {
        Self {
            backend,
            jar,
            cookies,
        }
    }

    /// Cookie changes made while handling the request.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn cookie_value(&self, name: &str) -> Option<String> {
        self.jar
            .get(name)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }

    fn access_token(&self) -> Option<String> {
        self.cookie_value(&self.cookies.access_token_name())
    }

    fn store_session(&mut self, session: &Session) {
        let access = self.cookies.build(
            self.cookies.access_token_name(),
            session.access_token.clone(),
            self.cookies.max_age_secs,
        );
        let refresh = self.cookies.build(
            self.cookies.refresh_token_name(),
            session.refresh_token.clone(),
            self.cookies.max_age_secs,
        );
        self.jar = self.jar.clone().add(access).add(refresh);
    }

    fn clear_session(&mut self) {
        let access = self.cookies.removal(self.cookies.access_token_name());
        let refresh = self.cookies.removal(self.cookies.refresh_token_name());
        self.jar = self.jar.clone().remove(access).remove(refresh);
    }

    fn take_code_verifier(&mut self) -> Option<String> {
        let name = self.cookies.code_verifier_name();
        let verifier = self.cookie_value(&name);
        if self.jar.get(&name).is_some() {
            let removal = self.cookies.removal(name);
            self.jar = self.jar.clone().remove(removal);
        }
        verifier
    }

    fn store_code_verifier(&mut self, verifier: String) {
        let cookie = self.cookies.build(
            self.cookies.code_verifier_name(),
            verifier,
            CODE_VERIFIER_MAX_AGE_SECS,
        );
        self.jar = self.jar.clone().add(cookie);
    }

    /// Current user, if the request carries a usable session.
    ///
    /// A rejected access token is refreshed once using the refresh-token
    /// cookie. If that fails the session cookies are cleared.
    pub async fn get_user(&mut self) -> Option<User> {
        let access_token = self.access_token()?;

        match self.backend.get_user(&access_token).await {
            Ok(user) => Some(user),
            Err(error) if error.is_unauthorized() => self.refresh().await,
            Err(error) => {
                tracing::warn!(%error, "Failed to load user from Supabase");
                None
            }
        }
    }

    async fn refresh(&mut self) -> Option<User> {
        let Some(refresh_token) = self.cookie_value(&self.cookies.refresh_token_name()) else {
            self.clear_session();
            return None;
        };

        match self.backend.refresh_session(&refresh_token).await {
            Ok(session) => {
                tracing::debug!(user_id = %session.user.id, "Session refreshed");
                self.store_session(&session);
                Some(session.user)
            }
            Err(error) => {
                tracing::info!(%error, "Session refresh failed; clearing session cookies");
                self.clear_session();
                None
            }
        }
    }

    /// Exchange an authorization code for a session.
    ///
    /// The PKCE verifier cookie is consumed whether or not the exchange
    /// succeeds; a code is never exchanged twice.
    pub async fn exchange_code_for_session(&mut self, code: &str) -> Result<Session, BackendError> {
        let verifier = self
            .take_code_verifier()
            .ok_or(BackendError::MissingCodeVerifier)?;

        let session = self
            .backend
            .exchange_code_for_session(code, &verifier)
            .await?;
        self.store_session(&session);
        Ok(session)
    }

    pub async fn sign_in_with_password(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let credentials = PasswordCredentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session = self.backend.sign_in_with_password(&credentials).await?;
        self.store_session(&session);
        Ok(session)
    }

    /// Register with email and password.
    ///
    /// `email_redirect_to` is where the confirmation link lands; a PKCE
    /// verifier cookie is stored so that link can be exchanged on
    /// `/callback`.
    pub async fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        email_redirect_to: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        let pkce = PkcePair::generate();
        let request = SignUpRequest {
            email: email.to_string(),
            password: password.to_string(),
            email_redirect_to: email_redirect_to.to_string(),
            code_challenge: pkce.challenge,
        };

        let outcome = self.backend.sign_up(&request).await?;
        match &outcome {
            SignUpOutcome::SignedIn(session) => self.store_session(session),
            SignUpOutcome::ConfirmationSent(_) => self.store_code_verifier(pkce.verifier),
        }
        Ok(outcome)
    }

    /// Start an OAuth sign-in and return the provider URL to redirect to.
    pub fn begin_oauth(&mut self, provider: &str, redirect_to: &str) -> Result<Url, BackendError> {
        let pkce = PkcePair::generate();
        let url = self
            .backend
            .authorize_url(provider, redirect_to, &pkce.challenge)?;
        self.store_code_verifier(pkce.verifier);
        Ok(url)
    }

    /// Revoke the session upstream (best effort) and drop the cookies.
    pub async fn sign_out(&mut self) {
        if let Some(access_token) = self.access_token() {
            if let Err(error) = self.backend.sign_out(&access_token).await {
                tracing::warn!(%error, "Supabase sign-out failed; clearing cookies anyway");
            }
        }
        self.clear_session();
    }

    /// Start a table query, e.g. `client.from("profiles").select("count").limit(1)`.
    pub fn from(&self, table: &str) -> QueryBuilder<'_> {
        let mut builder = self.from_anon(table);
        builder.query.access_token = self.access_token();
        builder
    }

    /// Start a table query authorized by the anon key only, ignoring any
    /// session cookie on the request.
    pub fn from_anon(&self, table: &str) -> QueryBuilder<'_> {
        QueryBuilder {
            backend: self.backend.as_ref(),
            query: TableQuery::new(table),
        }
    }
}

/// Builder for a read-only table query
pub struct QueryBuilder<'a> {
    backend: &'a dyn SupabaseApi,
    query: TableQuery,
}

impl QueryBuilder<'_> {
    pub fn select(mut self, columns: &str) -> Self {
        self.query.columns = columns.to_string();
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.query.limit = Some(limit);
        self
    }

    pub async fn execute(self) -> Result<serde_json::Value, BackendError> {
        self.backend.select(&self.query).await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionClient
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let cookies = CookieSettings::from_state(&app_state);

        Ok(SessionClient::new(app_state.backend.clone(), jar, cookies))
    }
}

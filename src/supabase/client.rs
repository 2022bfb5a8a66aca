//! HTTP implementation of `SupabaseApi`
//!
//! Talks to GoTrue under `/auth/v1` and PostgREST under `/rest/v1`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use super::{
    BackendError, PasswordCredentials, Session, SignUpOutcome, SignUpRequest, SupabaseApi,
    TableQuery, User,
};
use crate::config::SupabaseConfig;
use crate::metrics::observe_backend_request;

/// Reqwest-backed Supabase client
///
/// Holds no user state, so one instance is shared by all requests.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: Url,
    anon_key: String,
}

impl SupabaseClient {
    /// Build a client for the configured project.
    ///
    /// # Errors
    /// Returns error if the project URL does not parse or the HTTP client
    /// cannot be constructed.
    pub fn new(config: &SupabaseConfig) -> Result<Self, BackendError> {
        let mut base = config.url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let mut headers = HeaderMap::new();
        let api_key = HeaderValue::from_str(&config.anon_key)
            .map_err(|_| BackendError::Decode("anon key is not a valid header value".into()))?;
        headers.insert("apikey", api_key);

        let http = reqwest::Client::builder()
            .user_agent(concat!("vibekit/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url,
            anon_key: config.anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.base_url.join(path)?)
    }

    fn token_endpoint(&self, grant_type: &str) -> Result<Url, BackendError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);
        Ok(url)
    }

    async fn post_token<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        grant_type: &str,
        body: serde_json::Value,
    ) -> Result<T, BackendError> {
        let url = self.token_endpoint(grant_type)?;
        let started = Instant::now();
        let result: Result<T, BackendError> = async {
            let response = self
                .http
                .post(url)
                .bearer_auth(&self.anon_key)
                .json(&body)
                .send()
                .await?;
            read_json(response).await
        }
        .await;
        observe_backend_request(operation, started, result.is_ok());
        result
    }
}

#[async_trait]
impl SupabaseApi for SupabaseClient {
    async fn get_user(&self, access_token: &str) -> Result<User, BackendError> {
        let url = self.endpoint("auth/v1/user")?;
        let started = Instant::now();
        let result: Result<User, BackendError> = async {
            let response = self
                .http
                .get(url)
                .bearer_auth(access_token)
                .send()
                .await?;
            read_json(response).await
        }
        .await;
        observe_backend_request("get_user", started, result.is_ok());
        result
    }

    async fn exchange_code_for_session(
        &self,
        auth_code: &str,
        code_verifier: &str,
    ) -> Result<Session, BackendError> {
        self.post_token(
            "exchange_code",
            "pkce",
            json!({ "auth_code": auth_code, "code_verifier": code_verifier }),
        )
        .await
    }

    async fn sign_in_with_password(
        &self,
        credentials: &PasswordCredentials,
    ) -> Result<Session, BackendError> {
        let body = serde_json::to_value(credentials)
            .map_err(|e| BackendError::Decode(e.to_string()))?;
        self.post_token("sign_in_password", "password", body).await
    }

    async fn sign_up(&self, request: &SignUpRequest) -> Result<SignUpOutcome, BackendError> {
        let mut url = self.endpoint("auth/v1/signup")?;
        url.query_pairs_mut()
            .append_pair("redirect_to", &request.email_redirect_to);

        let body = json!({
            "email": request.email,
            "password": request.password,
            "data": {},
            "code_challenge": request.code_challenge,
            "code_challenge_method": "s256",
        });

        let started = Instant::now();
        let result: Result<SignUpResponse, BackendError> = async {
            let response = self
                .http
                .post(url)
                .bearer_auth(&self.anon_key)
                .json(&body)
                .send()
                .await?;
            read_json(response).await
        }
        .await;
        observe_backend_request("sign_up", started, result.is_ok());

        Ok(match result? {
            SignUpResponse::Session(session) => SignUpOutcome::SignedIn(session),
            SignUpResponse::User(user) => SignUpOutcome::ConfirmationSent(user),
        })
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        self.post_token(
            "refresh_session",
            "refresh_token",
            json!({ "refresh_token": refresh_token }),
        )
        .await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let url = self.endpoint("auth/v1/logout")?;
        let started = Instant::now();
        let result: Result<(), BackendError> = async {
            let response = self
                .http
                .post(url)
                .bearer_auth(access_token)
                .send()
                .await?;
            let status = response.status();
            if status.is_success() {
                return Ok(());
            }
            let body = response.text().await.unwrap_or_default();
            Err(BackendError::from_response(status, &body))
        }
        .await;
        observe_backend_request("sign_out", started, result.is_ok());
        result
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<Url, BackendError> {
        let mut url = self.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to)
            .append_pair("code_challenge", code_challenge)
            .append_pair("code_challenge_method", "s256");
        Ok(url)
    }

    async fn select(&self, query: &TableQuery) -> Result<serde_json::Value, BackendError> {
        if !is_valid_table_name(&query.table) {
            return Err(BackendError::InvalidTable(query.table.clone()));
        }

        let mut url = self.endpoint("rest/v1/")?.join(&query.table)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &query.columns);
            if let Some(limit) = query.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        let bearer = query.access_token.as_deref().unwrap_or(&self.anon_key);
        let started = Instant::now();
        let result: Result<serde_json::Value, BackendError> = async {
            let response = self
                .http
                .get(url)
                .header(AUTHORIZATION, format!("Bearer {bearer}"))
                .send()
                .await?;
            read_json(response).await
        }
        .await;
        observe_backend_request("select", started, result.is_ok());
        result
    }
}

/// `POST /signup` answers with a session when the project auto-confirms
/// users, and with the bare user when a confirmation email was sent.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(Session),
    User(User),
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BackendError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()));
    }

    let body = response.text().await.unwrap_or_default();
    Err(BackendError::from_response(status, &body))
}

fn is_valid_table_name(table: &str) -> bool {
    !table.is_empty() && table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

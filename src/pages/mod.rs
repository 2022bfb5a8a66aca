//! Server-rendered pages
//!
//! Each handler reads the current user exactly once through the
//! per-request [`SessionClient`] and renders HTML accordingly. Cookie
//! changes made while reading the user (token refresh, clearing a dead
//! session) are always returned with the response.

mod auth;
mod components;
mod dashboard;
mod home;
mod layout;

use axum::{
    Router,
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};
use serde::Deserialize;

use crate::AppState;
use crate::auth::SessionClient;
use crate::auth::redirect::{DEFAULT_REDIRECT, resolve_redirect};

pub use components::{ButtonSize, ButtonVariant, button_classes, card, input, link_button};

/// Create page router
///
/// Routes:
/// - GET / - Home page
/// - GET /dashboard - Account overview (requires a session)
///
/// `/login` and `/signup` are mounted by `auth::auth_router` alongside
/// their form handlers.
pub fn pages_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home_page))
        .route("/dashboard", get(dashboard_page))
}

/// Query parameters understood by the login and signup pages
#[derive(Debug, Default, Deserialize)]
pub struct AuthPageQuery {
    pub error: Option<String>,
    pub message: Option<String>,
    pub redirect: Option<String>,
}

impl AuthPageQuery {
    fn notice(&self) -> auth::AuthNotice<'_> {
        auth::AuthNotice {
            error: self.error.as_deref(),
            message: self.message.as_deref(),
        }
    }
}

/// GET /
async fn home_page(State(state): State<AppState>, mut client: SessionClient) -> Response {
    let user = client.get_user().await;
    let app = &state.config.app;
    let body = home::render(app, user.as_ref());

    (client.into_jar(), Html(layout::document(app, None, &body))).into_response()
}

/// GET /dashboard
async fn dashboard_page(State(state): State<AppState>, mut client: SessionClient) -> Response {
    let Some(user) = client.get_user().await else {
        return (client.into_jar(), Redirect::to("/login")).into_response();
    };

    let body = dashboard::render(&user);
    let html = layout::document(&state.config.app, Some("Dashboard"), &body);
    (client.into_jar(), Html(html)).into_response()
}

/// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    mut client: SessionClient,
    Query(query): Query<AuthPageQuery>,
) -> Response {
    if client.get_user().await.is_some() {
        return (client.into_jar(), Redirect::to(DEFAULT_REDIRECT)).into_response();
    }

    let target = resolve_redirect(query.redirect.as_deref());
    let body = auth::render_login(&state.config.auth.providers, &target, &query.notice());
    let html = layout::document(&state.config.app, Some("Sign In"), &body);
    (client.into_jar(), Html(html)).into_response()
}

/// GET /signup
pub async fn signup_page(
    State(state): State<AppState>,
    mut client: SessionClient,
    Query(query): Query<AuthPageQuery>,
) -> Response {
    if client.get_user().await.is_some() {
        return (client.into_jar(), Redirect::to(DEFAULT_REDIRECT)).into_response();
    }

    let body = auth::render_signup(&state.config.auth.providers, &query.notice());
    let html = layout::document(&state.config.app, Some("Sign Up"), &body);
    (client.into_jar(), Html(html)).into_response()
}

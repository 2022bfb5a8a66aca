//! E2E tests for the sign-in flows, OAuth callback and logout

mod common;

use std::sync::atomic::Ordering;

use common::{
    ACCESS_TOKEN, PUBLIC_ORIGIN, REFRESH_TOKEN, TestServer, USER_EMAIL, USER_PASSWORD,
    VALID_CODE, clears_cookie, location, set_cookie_value,
};

const VERIFIER_COOKIE: &str = "sb-code-verifier";
const ACCESS_COOKIE: &str = "sb-access-token";
const REFRESH_COOKIE: &str = "sb-refresh-token";

// =============================================================================
// Callback
// =============================================================================

#[tokio::test]
async fn test_callback_with_valid_code_sets_session_and_redirects() {
    let server = TestServer::new().await;

    let response = server
        .get_with_cookies(
            &format!("/callback?code={VALID_CODE}"),
            &[(VERIFIER_COOKIE, "verifier-from-start")],
        )
        .await;

    assert_eq!(response.status(), 307);
    assert_eq!(location(&response), format!("{PUBLIC_ORIGIN}/dashboard"));
    assert_eq!(
        set_cookie_value(&response, ACCESS_COOKIE).as_deref(),
        Some(ACCESS_TOKEN)
    );
    assert_eq!(
        set_cookie_value(&response, REFRESH_COOKIE).as_deref(),
        Some(REFRESH_TOKEN)
    );
    assert!(clears_cookie(&response, VERIFIER_COOKIE));
    assert_eq!(
        server.supabase.code_verifiers.lock().unwrap().as_slice(),
        ["verifier-from-start"]
    );
}

#[tokio::test]
async fn test_callback_honours_same_origin_redirect() {
    let server = TestServer::new().await;

    let response = server
        .get_with_cookies(
            &format!("/callback?code={VALID_CODE}&redirect=%2Fdashboard%3Ftab%3Dsettings"),
            &[(VERIFIER_COOKIE, "v")],
        )
        .await;

    assert_eq!(
        location(&response),
        format!("{PUBLIC_ORIGIN}/dashboard?tab=settings")
    );
}

#[tokio::test]
async fn test_callback_ignores_external_redirect() {
    let server = TestServer::new().await;

    for target in ["https%3A%2F%2Fevil.example", "%2F%2Fevil.example", "%2F%5Cevil.example"] {
        let response = server
            .get_with_cookies(
                &format!("/callback?code={VALID_CODE}&redirect={target}"),
                &[(VERIFIER_COOKIE, "v")],
            )
            .await;

        assert_eq!(
            location(&response),
            format!("{PUBLIC_ORIGIN}/dashboard"),
            "redirect={target}"
        );
    }
}

#[tokio::test]
async fn test_callback_with_provider_error_redirects_to_login() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url(
            "/callback?error=access_denied&error_description=User%20cancelled%20login",
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 307);
    assert_eq!(
        location(&response),
        format!("{PUBLIC_ORIGIN}/login?error=User%20cancelled%20login")
    );
    assert!(server.supabase.code_verifiers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_error_takes_precedence_over_code() {
    let server = TestServer::new().await;

    let response = server
        .get_with_cookies(
            &format!("/callback?error=server_error&code={VALID_CODE}"),
            &[(VERIFIER_COOKIE, "v")],
        )
        .await;

    assert_eq!(
        location(&response),
        format!("{PUBLIC_ORIGIN}/login?error=server_error")
    );
    assert!(set_cookie_value(&response, ACCESS_COOKIE).is_none());
}

#[tokio::test]
async fn test_callback_with_failing_exchange_redirects_with_message() {
    let server = TestServer::new().await;

    let response = server
        .get_with_cookies("/callback?code=expired", &[(VERIFIER_COOKIE, "v")])
        .await;

    assert_eq!(response.status(), 307);
    assert_eq!(
        location(&response),
        format!(
            "{PUBLIC_ORIGIN}/login?error=invalid%20flow%20state%2C%20no%20valid%20flow%20state%20found"
        )
    );
    assert!(set_cookie_value(&response, ACCESS_COOKIE).is_none());
}

#[tokio::test]
async fn test_callback_without_verifier_cookie_fails_exchange() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url(&format!("/callback?code={VALID_CODE}")))
        .send()
        .await
        .unwrap();

    let location = location(&response);
    assert!(location.starts_with(&format!("{PUBLIC_ORIGIN}/login?error=")));
    assert!(server.supabase.code_verifiers.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_callback_without_params_redirects_to_login() {
    let server = TestServer::new().await;

    let response = server.client.get(server.url("/callback")).send().await.unwrap();

    assert_eq!(response.status(), 307);
    assert_eq!(location(&response), format!("{PUBLIC_ORIGIN}/login"));
}

// =============================================================================
// OAuth start
// =============================================================================

#[tokio::test]
async fn test_oauth_redirect_stores_verifier_and_targets_supabase() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/oauth/github?redirect=%2Fdashboard"))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    let location = url::Url::parse(&location(&response)).unwrap();
    assert_eq!(location.path(), "/auth/v1/authorize");

    let params: std::collections::HashMap<_, _> = location.query_pairs().into_owned().collect();
    assert_eq!(params["provider"], "github");
    assert_eq!(params["code_challenge_method"], "s256");
    assert_eq!(
        params["redirect_to"],
        format!("{PUBLIC_ORIGIN}/callback?redirect=%2Fdashboard")
    );

    let verifier = set_cookie_value(&response, VERIFIER_COOKIE).expect("verifier cookie");
    assert_eq!(
        params["code_challenge"],
        vibekit::auth::pkce::challenge_for(&verifier)
    );
}

#[tokio::test]
async fn test_oauth_redirect_rejects_unknown_provider() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(server.url("/auth/oauth/myspace"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert!(set_cookie_value(&response, VERIFIER_COOKIE).is_none());
}

// =============================================================================
// Email + password
// =============================================================================

#[tokio::test]
async fn test_password_login_sets_session() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/login"))
        .form(&[
            ("email", USER_EMAIL),
            ("password", USER_PASSWORD),
            ("redirect", "/dashboard?welcome=1"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/dashboard?welcome=1");
    assert_eq!(
        set_cookie_value(&response, ACCESS_COOKIE).as_deref(),
        Some(ACCESS_TOKEN)
    );
}

#[tokio::test]
async fn test_password_login_failure_returns_to_login() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/login"))
        .form(&[("email", USER_EMAIL), ("password", "wrong")])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 303);
    assert_eq!(
        location(&response),
        "/login?error=Invalid%20login%20credentials&redirect=%2Fdashboard"
    );
    assert!(set_cookie_value(&response, ACCESS_COOKIE).is_none());
}

#[tokio::test]
async fn test_signup_with_auto_confirm_signs_in() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/signup"))
        .form(&[("email", "new@example.com"), ("password", "secret123")])
        .send()
        .await
        .unwrap();

    assert_eq!(location(&response), "/dashboard");
    assert_eq!(
        set_cookie_value(&response, ACCESS_COOKIE).as_deref(),
        Some(ACCESS_TOKEN)
    );
}

#[tokio::test]
async fn test_signup_with_confirmation_stores_verifier() {
    let server = TestServer::new().await;
    server
        .supabase
        .require_email_confirmation
        .store(true, Ordering::SeqCst);

    let response = server
        .client
        .post(server.url("/signup"))
        .form(&[("email", "new@example.com"), ("password", "secret123")])
        .send()
        .await
        .unwrap();

    assert_eq!(
        location(&response),
        "/signup?message=Check%20your%20email%20to%20confirm%20your%20account"
    );
    assert!(set_cookie_value(&response, VERIFIER_COOKIE).is_some());
    assert!(set_cookie_value(&response, ACCESS_COOKIE).is_none());
}

#[tokio::test]
async fn test_signup_rejects_short_password() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/signup"))
        .form(&[("email", "new@example.com"), ("password", "12345")])
        .send()
        .await
        .unwrap();

    assert_eq!(
        location(&response),
        "/signup?error=Password%20must%20be%20at%20least%206%20characters"
    );
}

#[tokio::test]
async fn test_signup_reports_backend_error() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/signup"))
        .form(&[("email", "taken@example.com"), ("password", "secret123")])
        .send()
        .await
        .unwrap();

    assert_eq!(
        location(&response),
        "/signup?error=User%20already%20registered"
    );
}

// =============================================================================
// Logout
// =============================================================================

#[tokio::test]
async fn test_logout_revokes_and_clears_session_cookies() {
    let server = TestServer::new().await;

    let response = server
        .client
        .post(server.url("/logout"))
        .header(
            reqwest::header::COOKIE,
            common::cookie_header(&[
                (ACCESS_COOKIE, ACCESS_TOKEN),
                (REFRESH_COOKIE, REFRESH_TOKEN),
            ]),
        )
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login");
    assert!(clears_cookie(&response, ACCESS_COOKIE));
    assert!(clears_cookie(&response, REFRESH_COOKIE));
    assert_eq!(
        server.supabase.revoked.lock().unwrap().as_slice(),
        [ACCESS_TOKEN]
    );
}

//! Login and signup views

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::components::{ButtonSize, ButtonVariant, card, input, link_button, submit_button};

/// Query-string state shown on the login/signup pages
#[derive(Debug, Default)]
pub struct AuthNotice<'a> {
    pub error: Option<&'a str>,
    pub message: Option<&'a str>,
}

pub fn render_login(providers: &[String], redirect: &str, notice: &AuthNotice<'_>) -> String {
    let form = format!(
        r#"<form method="post" action="/login" class="space-y-4"><input type="hidden" name="redirect" value="{redirect}">{email}{password}{submit}</form>"#,
        redirect = encode_double_quoted_attribute(redirect),
        email = input("email", "email", "Email", "you@example.com", true),
        password = input("password", "password", "Password", "Your password", true),
        submit = submit_button("Sign In", ButtonVariant::Default, Some("w-full")),
    );

    let content = [
        alerts(notice),
        form,
        provider_buttons(providers, redirect),
        r#"<p class="text-center text-sm text-muted-foreground">Don't have an account? <a href="/signup" class="underline underline-offset-4 hover:text-primary">Sign up</a></p>"#
            .to_string(),
    ]
    .concat();

    shell(
        "Welcome back",
        "Sign in to your account to continue",
        &content,
    )
}

pub fn render_signup(providers: &[String], notice: &AuthNotice<'_>) -> String {
    let form = format!(
        r#"<form method="post" action="/signup" class="space-y-4">{email}{password}{submit}</form>"#,
        email = input("email", "email", "Email", "you@example.com", true),
        password = input(
            "password",
            "password",
            "Password",
            "At least 6 characters",
            true
        ),
        submit = submit_button("Create Account", ButtonVariant::Default, Some("w-full")),
    );

    let content = [
        alerts(notice),
        form,
        provider_buttons(providers, crate::auth::redirect::DEFAULT_REDIRECT),
        r#"<p class="text-center text-sm text-muted-foreground">Already have an account? <a href="/login" class="underline underline-offset-4 hover:text-primary">Sign in</a></p>"#
            .to_string(),
    ]
    .concat();

    shell(
        "Create an account",
        "Enter your email below to create your account",
        &content,
    )
}

fn shell(heading: &str, subheading: &str, content: &str) -> String {
    format!(
        r#"<main class="flex min-h-screen items-center justify-center p-4">
<div class="w-full max-w-sm">{card}</div>
</main>"#,
        card = card(
            Some(heading),
            Some(subheading),
            &format!(r#"<div class="space-y-6">{content}</div>"#),
            None
        ),
    )
}

fn alerts(notice: &AuthNotice<'_>) -> String {
    let mut html = String::new();
    if let Some(error) = notice.error.filter(|e| !e.is_empty()) {
        html.push_str(&format!(
            r#"<div role="alert" class="rounded-md border border-destructive/50 bg-destructive/10 px-4 py-3 text-sm text-destructive">{}</div>"#,
            encode_text(error)
        ));
    }
    if let Some(message) = notice.message.filter(|m| !m.is_empty()) {
        html.push_str(&format!(
            r#"<div role="status" class="rounded-md border px-4 py-3 text-sm">{}</div>"#,
            encode_text(message)
        ));
    }
    html
}

fn provider_buttons(providers: &[String], redirect: &str) -> String {
    if providers.is_empty() {
        return String::new();
    }

    let buttons: String = providers
        .iter()
        .map(|provider| {
            let href = format!(
                "/auth/oauth/{}?redirect={}",
                urlencoding::encode(provider),
                urlencoding::encode(redirect)
            );
            link_button(
                &href,
                &format!("Continue with {}", provider_label(provider)),
                ButtonVariant::Outline,
                ButtonSize::Default,
                Some("w-full"),
            )
        })
        .collect();

    format!(
        r#"<div class="relative text-center text-xs uppercase text-muted-foreground"><span>Or continue with</span></div><div class="grid gap-2">{buttons}</div>"#
    )
}

fn provider_label(provider: &str) -> String {
    match provider {
        "github" => "GitHub".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

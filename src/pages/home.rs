use html_escape::encode_text;

use super::components::{ButtonSize, ButtonVariant, link_button};
use crate::config::AppInfoConfig;
use crate::supabase::User;

const FEATURES: [(&str, &str, &str); 4] = [
    (
        "🚀",
        "Ready in Seconds",
        "Pre-configured with auth, database, and styling. Just add your Supabase keys and go.",
    ),
    (
        "🤖",
        "AI-First",
        "Agent guidelines included for optimal AI-assisted development.",
    ),
    (
        "🔒",
        "Secure by Default",
        "Row Level Security, session-aware routes, and strict typing.",
    ),
    (
        "📦",
        "Full-Stack",
        "Auth, database, storage, and realtime - all included with Supabase.",
    ),
];

const CTA_CLASSES: &str = "h-11 rounded-lg";

/// Landing page body. Calls to action depend on whether `user` is set.
pub fn render(app: &AppInfoConfig, user: Option<&User>) -> String {
    let actions = if user.is_some() {
        link_button(
            "/dashboard",
            "Go to Dashboard",
            ButtonVariant::Default,
            ButtonSize::Lg,
            Some(CTA_CLASSES),
        )
    } else {
        [
            link_button(
                "/login",
                "Sign In",
                ButtonVariant::Default,
                ButtonSize::Lg,
                Some(CTA_CLASSES),
            ),
            link_button(
                "/signup",
                "Create Account",
                ButtonVariant::Outline,
                ButtonSize::Lg,
                Some(CTA_CLASSES),
            ),
        ]
        .concat()
    };

    let features: String = FEATURES
        .iter()
        .map(|(icon, title, description)| feature(icon, title, description))
        .collect();

    format!(
        r#"<main class="flex min-h-screen flex-col items-center justify-center p-8">
<div class="mx-auto max-w-2xl text-center">
<div class="mb-8 flex justify-center"><div class="bg-primary text-primary-foreground flex h-16 w-16 items-center justify-center rounded-2xl text-3xl">⚡</div></div>
<h1 class="mb-4 text-4xl font-bold tracking-tight sm:text-5xl">{name}</h1>
<p class="text-muted-foreground mb-8 text-lg">{description}</p>
<div class="flex flex-col items-center justify-center gap-4 sm:flex-row">{actions}</div>
<div class="mt-16 grid gap-6 text-left sm:grid-cols-2">{features}</div>
</div>
</main>"#,
        name = encode_text(&app.name),
        description = encode_text(&app.description),
    )
}

fn feature(icon: &str, title: &str, description: &str) -> String {
    format!(
        r#"<div class="bg-card rounded-lg border p-6"><div class="mb-2 text-2xl">{icon}</div><h3 class="mb-1 font-semibold">{title}</h3><p class="text-muted-foreground text-sm">{description}</p></div>"#,
        title = encode_text(title),
        description = encode_text(description),
    )
}

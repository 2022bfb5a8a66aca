use html_escape::encode_text;

use super::components::{ButtonSize, ButtonVariant, button_classes, card};
use crate::supabase::User;
use crate::utils::{format_date, get_initials, truncate};

/// Emails longer than this are shortened in the header.
const HEADER_EMAIL_LEN: usize = 32;

const STATS: [(&str, &str, &str); 4] = [
    ("Total Users", "1", "+100%"),
    ("Active Sessions", "1", "Active"),
    ("Storage Used", "0 MB", "0%"),
    ("API Calls", "0", "This month"),
];

const ACTIONS: [(&str, &str, &str); 3] = [
    ("📝", "Edit Profile", "Update your account information"),
    ("🔐", "Security Settings", "Manage your security preferences"),
    ("📊", "View Analytics", "See your usage statistics"),
];

pub fn render(user: &User) -> String {
    let email = user.email.as_deref().unwrap_or_default();
    let initials = get_initials(user.display_name().or(user.email.as_deref()));

    let stats: String = STATS
        .iter()
        .map(|(title, value, change)| stat_card(title, value, change))
        .collect();
    let actions: String = ACTIONS
        .iter()
        .map(|(icon, title, description)| action_card(icon, title, description))
        .collect();

    format!(
        r#"<div class="min-h-screen bg-background">
<header class="border-b">
<div class="mx-auto flex h-16 max-w-7xl items-center justify-between px-4">
<div class="flex items-center gap-2"><span class="text-xl">⚡</span><span class="font-semibold">Dashboard</span></div>
<div class="flex items-center gap-4">
<span class="flex h-8 w-8 items-center justify-center rounded-full bg-muted text-xs font-medium" aria-hidden="true">{initials}</span>
<span class="text-sm text-muted-foreground" title="{email_title}">{short_email}</span>
<form method="post" action="/logout"><button type="submit" class="{sign_out_class}">Sign Out</button></form>
</div>
</div>
</header>
<main class="mx-auto max-w-7xl p-4">
<div class="mb-8"><h1 class="text-3xl font-bold">Welcome back!</h1><p class="mt-1 text-muted-foreground">Here's what's happening with your account.</p></div>
<div class="mb-8 grid gap-4 sm:grid-cols-2 lg:grid-cols-4">{stats}</div>
{account}
<div class="mt-8"><h2 class="mb-4 text-lg font-semibold">Quick Actions</h2><div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">{actions}</div></div>
</main>
</div>"#,
        initials = encode_text(&initials),
        email_title = html_escape::encode_double_quoted_attribute(email),
        short_email = encode_text(&truncate(email, HEADER_EMAIL_LEN)),
        sign_out_class = button_classes(ButtonVariant::Outline, ButtonSize::Sm, None),
        account = account_card(user),
    )
}

fn account_card(user: &User) -> String {
    let rows = [
        ("User ID", user.id.as_str(), "font-mono text-sm"),
        ("Email", user.email.as_deref().unwrap_or_default(), "text-sm"),
        ("Provider", user.provider(), "text-sm capitalize"),
    ];

    let mut list: String = rows
        .iter()
        .map(|(label, value, class)| account_row(label, value, class))
        .collect();
    list.push_str(&account_row("Created", &format_date(&user.created_at), "text-sm"));

    card(
        Some("Account Information"),
        None,
        &format!(r#"<dl class="space-y-3">{list}</dl>"#),
        None,
    )
}

fn account_row(label: &str, value: &str, class: &str) -> String {
    format!(
        r#"<div class="flex flex-col sm:flex-row sm:gap-4"><dt class="text-sm font-medium text-muted-foreground sm:w-32">{label}</dt><dd class="{class}">{value}</dd></div>"#,
        label = encode_text(label),
        value = encode_text(value),
    )
}

fn stat_card(title: &str, value: &str, change: &str) -> String {
    card(
        None,
        None,
        &format!(
            r#"<p class="text-sm text-muted-foreground">{title}</p><p class="mt-1 text-2xl font-bold">{value}</p><p class="mt-1 text-xs text-muted-foreground">{change}</p>"#
        ),
        Some("rounded-lg"),
    )
}

fn action_card(icon: &str, title: &str, description: &str) -> String {
    format!(
        r#"<button type="button" class="{class}"><div class="mb-2 text-2xl">{icon}</div><h3 class="font-medium">{title}</h3><p class="mt-1 text-sm text-muted-foreground">{description}</p></button>"#,
        class = crate::cn!(
            "rounded-lg border bg-card p-4 text-left transition-colors",
            "hover:bg-accent"
        ),
    )
}

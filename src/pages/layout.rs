//! Document shell shared by every page

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::AppInfoConfig;

/// Wrap `body` in the site's HTML document.
///
/// `title` is rendered as `"<title> | <app name>"`; pages without a
/// title use the app name alone.
pub fn document(app: &AppInfoConfig, title: Option<&str>, body: &str) -> String {
    let full_title = match title {
        Some(title) => format!("{title} | {}", app.name),
        None => app.name.clone(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="theme-color" media="(prefers-color-scheme: light)" content="white">
    <meta name="theme-color" media="(prefers-color-scheme: dark)" content="black">
    <meta name="description" content="{description}">
    <meta name="robots" content="index, follow">
    <meta property="og:type" content="website">
    <meta property="og:locale" content="en_US">
    <meta property="og:site_name" content="{site_name}">
    <meta name="twitter:card" content="summary_large_image">
    <title>{title}</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="min-h-screen bg-background font-sans antialiased">
{body}
</body>
</html>
"#,
        description = encode_double_quoted_attribute(&app.description),
        site_name = encode_double_quoted_attribute(&app.name),
        title = encode_text(&full_title),
    )
}

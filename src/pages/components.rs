//! Reusable UI pieces (button, card, input)
//!
//! Components return HTML fragments. Class lists are composed with
//! `cn!` so callers can override any default utility.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::cn;

const BUTTON_BASE: &str = "inline-flex items-center justify-center gap-2 whitespace-nowrap \
    rounded-md text-sm font-medium transition-colors focus-visible:outline-none \
    focus-visible:ring-1 focus-visible:ring-ring disabled:pointer-events-none disabled:opacity-50";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonVariant {
    #[default]
    Default,
    Destructive,
    Outline,
    Secondary,
    Ghost,
    Link,
}

impl ButtonVariant {
    fn classes(self) -> &'static str {
        match self {
            ButtonVariant::Default => "bg-primary text-primary-foreground shadow hover:bg-primary/90",
            ButtonVariant::Destructive => {
                "bg-destructive text-destructive-foreground shadow-sm hover:bg-destructive/90"
            }
            ButtonVariant::Outline => {
                "border border-input bg-background shadow-sm hover:bg-accent hover:text-accent-foreground"
            }
            ButtonVariant::Secondary => {
                "bg-secondary text-secondary-foreground shadow-sm hover:bg-secondary/80"
            }
            ButtonVariant::Ghost => "hover:bg-accent hover:text-accent-foreground",
            ButtonVariant::Link => "text-primary underline-offset-4 hover:underline",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ButtonSize {
    #[default]
    Default,
    Sm,
    Lg,
    Icon,
}

impl ButtonSize {
    fn classes(self) -> &'static str {
        match self {
            ButtonSize::Default => "h-9 px-4 py-2",
            ButtonSize::Sm => "h-8 rounded-md px-3 text-xs",
            ButtonSize::Lg => "h-10 rounded-md px-8",
            ButtonSize::Icon => "h-9 w-9",
        }
    }
}

/// Class list for a button of the given style.
pub fn button_classes(variant: ButtonVariant, size: ButtonSize, extra: Option<&str>) -> String {
    cn!(BUTTON_BASE, variant.classes(), size.classes(), extra)
}

/// `<a>` styled as a button.
pub fn link_button(
    href: &str,
    label: &str,
    variant: ButtonVariant,
    size: ButtonSize,
    extra: Option<&str>,
) -> String {
    format!(
        r#"<a href="{href}" class="{class}">{label}</a>"#,
        href = encode_double_quoted_attribute(href),
        class = button_classes(variant, size, extra),
        label = encode_text(label),
    )
}

/// Form submit button.
pub fn submit_button(label: &str, variant: ButtonVariant, extra: Option<&str>) -> String {
    format!(
        r#"<button type="submit" class="{class}">{label}</button>"#,
        class = button_classes(variant, ButtonSize::Default, extra),
        label = encode_text(label),
    )
}

/// Card with optional header. `content` is inserted as-is.
pub fn card(
    title: Option<&str>,
    description: Option<&str>,
    content: &str,
    extra: Option<&str>,
) -> String {
    let header = match (title, description) {
        (None, None) => String::new(),
        (title, description) => format!(
            r#"<div class="flex flex-col space-y-1.5 p-6">{title}{description}</div>"#,
            title = title
                .map(|t| format!(
                    r#"<h3 class="font-semibold leading-none tracking-tight">{}</h3>"#,
                    encode_text(t)
                ))
                .unwrap_or_default(),
            description = description
                .map(|d| format!(
                    r#"<p class="text-sm text-muted-foreground">{}</p>"#,
                    encode_text(d)
                ))
                .unwrap_or_default(),
        ),
    };

    format!(
        r#"<div class="{class}">{header}<div class="{content_class}">{content}</div></div>"#,
        class = cn!(
            "rounded-xl border bg-card text-card-foreground shadow",
            extra
        ),
        content_class = cn!("p-6", (!header.is_empty()).then_some("pt-0")),
    )
}

/// Labelled input field.
pub fn input(
    name: &str,
    input_type: &str,
    label: &str,
    placeholder: &str,
    required: bool,
) -> String {
    format!(
        r#"<div class="space-y-2"><label for="{name}" class="text-sm font-medium leading-none">{label}</label><input id="{name}" name="{name}" type="{input_type}" placeholder="{placeholder}" class="{class}"{required}></div>"#,
        name = encode_double_quoted_attribute(name),
        label = encode_text(label),
        input_type = encode_double_quoted_attribute(input_type),
        placeholder = encode_double_quoted_attribute(placeholder),
        class = cn!(
            "flex h-9 w-full rounded-md border border-input bg-transparent px-3 py-1 text-base \
             shadow-sm transition-colors placeholder:text-muted-foreground \
             focus-visible:outline-none focus-visible:ring-1 focus-visible:ring-ring \
             disabled:cursor-not-allowed disabled:opacity-50 md:text-sm"
        ),
        required = if required { " required" } else { "" },
    )
}

//! Tailwind-aware class list merging
//!
//! Each class is mapped to a property group (padding-x, text color,
//! font weight, ...). Scanning from the end, the first class seen for a
//! group under a given set of variants wins; earlier classes in the same
//! group, or in a group the winner overrides (`p-4` overrides `px-2`),
//! are dropped. Classes outside any known group are always kept.

use std::collections::HashSet;

/// Anything `cn!` accepts as one argument
pub trait ClassValue {
    fn as_class(&self) -> Option<&str>;
}

impl ClassValue for &str {
    fn as_class(&self) -> Option<&str> {
        Some(*self)
    }
}

impl ClassValue for String {
    fn as_class(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl ClassValue for &String {
    fn as_class(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: ClassValue> ClassValue for Option<T> {
    fn as_class(&self) -> Option<&str> {
        self.as_ref().and_then(ClassValue::as_class)
    }
}

/// Join class lists, resolving conflicts so that later classes win.
pub fn merge_classes<'a, I>(inputs: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let tokens: Vec<&str> = inputs
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect();

    let mut taken: HashSet<(String, &'static str)> = HashSet::new();
    let mut kept: Vec<&str> = Vec::with_capacity(tokens.len());

    for &class in tokens.iter().rev() {
        let parsed = ParsedClass::parse(class);
        let Some(group) = class_group(parsed.base) else {
            kept.push(class);
            continue;
        };

        let variant_key = parsed.variant_key();
        if taken.contains(&(variant_key.clone(), group)) {
            continue;
        }

        for &conflict in conflicting_groups(group) {
            taken.insert((variant_key.clone(), conflict));
        }
        taken.insert((variant_key, group));
        kept.push(class);
    }

    kept.reverse();
    kept.join(" ")
}

struct ParsedClass<'a> {
    variants: Vec<&'a str>,
    important: bool,
    base: &'a str,
}

impl<'a> ParsedClass<'a> {
    /// Split `md:hover:!px-4` into variants, importance and base utility.
    /// Colons inside arbitrary values (`bg-[url(a:b)]`) are not separators.
    fn parse(class: &'a str) -> Self {
        let mut variants = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;

        for (i, c) in class.char_indices() {
            match c {
                '[' | '(' => depth += 1,
                ']' | ')' => depth = depth.saturating_sub(1),
                ':' if depth == 0 => {
                    variants.push(&class[start..i]);
                    start = i + 1;
                }
                _ => {}
            }
        }

        let mut base = &class[start..];
        let mut important = false;
        if let Some(rest) = base.strip_prefix('!') {
            base = rest;
            important = true;
        } else if let Some(rest) = base.strip_suffix('!') {
            base = rest;
            important = true;
        }

        Self {
            variants,
            important,
            base,
        }
    }

    /// Variant order does not matter (`hover:md:` == `md:hover:`).
    fn variant_key(&self) -> String {
        let mut variants = self.variants.clone();
        variants.sort_unstable();
        let mut key = variants.join(":");
        if self.important {
            key.push('!');
        }
        key
    }
}

const DISPLAY: &[&str] = &[
    "block",
    "inline-block",
    "inline",
    "flex",
    "inline-flex",
    "grid",
    "inline-grid",
    "table",
    "contents",
    "flow-root",
    "list-item",
    "hidden",
];
const POSITION: &[&str] = &["static", "fixed", "absolute", "relative", "sticky"];
const TEXT_SIZES: &[&str] = &[
    "xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl", "5xl", "6xl", "7xl", "8xl", "9xl",
];
const TEXT_ALIGN: &[&str] = &["left", "center", "right", "justify", "start", "end"];
const FONT_WEIGHTS: &[&str] = &[
    "thin",
    "extralight",
    "light",
    "normal",
    "medium",
    "semibold",
    "bold",
    "extrabold",
    "black",
];
const FONT_FAMILIES: &[&str] = &["sans", "serif", "mono"];
const BORDER_STYLES: &[&str] = &["solid", "dashed", "dotted", "double", "hidden", "none"];
const TEXT_DECORATION: &[&str] = &["underline", "overline", "line-through", "no-underline"];
const TEXT_TRANSFORM: &[&str] = &["uppercase", "lowercase", "capitalize", "normal-case"];

/// Prefix utilities that map directly to one group, longest prefixes first
/// so `gap-x-` wins over `gap-`.
const PREFIX_GROUPS: &[(&str, &str)] = &[
    ("px-", "px"),
    ("py-", "py"),
    ("ps-", "ps"),
    ("pe-", "pe"),
    ("pt-", "pt"),
    ("pr-", "pr"),
    ("pb-", "pb"),
    ("pl-", "pl"),
    ("p-", "p"),
    ("mx-", "mx"),
    ("my-", "my"),
    ("ms-", "ms"),
    ("me-", "me"),
    ("mt-", "mt"),
    ("mr-", "mr"),
    ("mb-", "mb"),
    ("ml-", "ml"),
    ("m-", "m"),
    ("space-x-", "space-x"),
    ("space-y-", "space-y"),
    ("gap-x-", "gap-x"),
    ("gap-y-", "gap-y"),
    ("gap-", "gap"),
    ("min-w-", "min-w"),
    ("max-w-", "max-w"),
    ("min-h-", "min-h"),
    ("max-h-", "max-h"),
    ("size-", "size"),
    ("w-", "w"),
    ("h-", "h"),
    ("inset-x-", "inset-x"),
    ("inset-y-", "inset-y"),
    ("inset-", "inset"),
    ("top-", "top"),
    ("right-", "right"),
    ("bottom-", "bottom"),
    ("left-", "left"),
    ("z-", "z"),
    ("opacity-", "opacity"),
    ("items-", "align-items"),
    ("justify-", "justify-content"),
    ("content-", "align-content"),
    ("self-", "align-self"),
    ("tracking-", "tracking"),
    ("leading-", "leading"),
    ("grid-cols-", "grid-cols"),
    ("grid-rows-", "grid-rows"),
    ("col-span-", "col-span"),
    ("overflow-x-", "overflow-x"),
    ("overflow-y-", "overflow-y"),
    ("overflow-", "overflow"),
    ("cursor-", "cursor"),
    ("whitespace-", "whitespace"),
    ("pointer-events-", "pointer-events"),
    ("underline-offset-", "underline-offset"),
    ("duration-", "duration"),
    ("ease-", "ease"),
    ("ring-offset-", "ring-offset"),
];

fn class_group(base: &str) -> Option<&'static str> {
    // Negative values (`-mt-2`) share the group of their positive form.
    let base = base.strip_prefix('-').unwrap_or(base);

    if DISPLAY.contains(&base) {
        return Some("display");
    }
    if POSITION.contains(&base) {
        return Some("position");
    }
    if TEXT_DECORATION.contains(&base) {
        return Some("text-decoration");
    }
    if TEXT_TRANSFORM.contains(&base) {
        return Some("text-transform");
    }
    if base == "transition" || base.starts_with("transition-") {
        return Some("transition");
    }
    if base == "shadow" || base.starts_with("shadow-") {
        return Some("shadow");
    }
    if base == "grow" || base.starts_with("grow-") {
        return Some("grow");
    }
    if base == "shrink" || base.starts_with("shrink-") {
        return Some("shrink");
    }

    if let Some(value) = base.strip_prefix("text-") {
        return Some(if TEXT_SIZES.contains(&value) || is_arbitrary_length(value) {
            "font-size"
        } else if TEXT_ALIGN.contains(&value) {
            "text-align"
        } else {
            "text-color"
        });
    }
    if let Some(value) = base.strip_prefix("font-") {
        if FONT_WEIGHTS.contains(&value) {
            return Some("font-weight");
        }
        if FONT_FAMILIES.contains(&value) {
            return Some("font-family");
        }
        return None;
    }
    if let Some(value) = base.strip_prefix("flex-") {
        return Some(match value {
            "row" | "row-reverse" | "col" | "col-reverse" => "flex-direction",
            "wrap" | "wrap-reverse" | "nowrap" => "flex-wrap",
            _ => "flex",
        });
    }
    if base == "border" || base.starts_with("border-") {
        return Some(border_group(base));
    }
    if base == "rounded" || base.starts_with("rounded-") {
        return Some(rounded_group(base));
    }
    if base == "ring" || (base.starts_with("ring-") && !base.starts_with("ring-offset-")) {
        return Some(ring_group(base));
    }
    if let Some(value) = base.strip_prefix("bg-") {
        return Some(match value {
            "fixed" | "local" | "scroll" => "bg-attachment",
            "cover" | "contain" | "auto" => "bg-size",
            _ if value.starts_with("gradient-") => "bg-image",
            _ => "bg-color",
        });
    }

    PREFIX_GROUPS
        .iter()
        .find(|(prefix, _)| base.starts_with(prefix))
        .map(|&(_, group)| group)
}

fn is_arbitrary_length(value: &str) -> bool {
    value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .is_some_and(|inner| {
            inner.starts_with("length:") || inner.starts_with(|c: char| c.is_ascii_digit())
        })
}

fn is_width_value(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit()) || is_arbitrary_length(value)
}

fn border_group(base: &str) -> &'static str {
    let Some(rest) = base.strip_prefix("border-") else {
        return "border-w";
    };
    if BORDER_STYLES.contains(&rest) {
        return "border-style";
    }
    if is_width_value(rest) {
        return "border-w";
    }

    let (side, value) = match rest.split_once('-') {
        Some((side, value)) => (side, Some(value)),
        None => (rest, None),
    };
    let side_group = match side {
        "x" => Some(("border-w-x", "border-color-x")),
        "y" => Some(("border-w-y", "border-color-y")),
        "t" => Some(("border-w-t", "border-color-t")),
        "r" => Some(("border-w-r", "border-color-r")),
        "b" => Some(("border-w-b", "border-color-b")),
        "l" => Some(("border-w-l", "border-color-l")),
        _ => None,
    };

    match (side_group, value) {
        (Some((width, _)), None) => width,
        (Some((width, _)), Some(value)) if is_width_value(value) => width,
        (Some((_, color)), Some(_)) => color,
        (None, _) => "border-color",
    }
}

fn rounded_group(base: &str) -> &'static str {
    let Some(rest) = base.strip_prefix("rounded-") else {
        return "rounded";
    };
    let corner = rest.split_once('-').map_or(rest, |(corner, _)| corner);
    match corner {
        "t" => "rounded-t",
        "r" => "rounded-r",
        "b" => "rounded-b",
        "l" => "rounded-l",
        "s" => "rounded-s",
        "e" => "rounded-e",
        "tl" => "rounded-tl",
        "tr" => "rounded-tr",
        "br" => "rounded-br",
        "bl" => "rounded-bl",
        _ => "rounded",
    }
}

fn ring_group(base: &str) -> &'static str {
    match base.strip_prefix("ring-") {
        None => "ring-w",
        Some("inset") => "ring-inset",
        Some(value) if is_width_value(value) => "ring-w",
        Some(_) => "ring-color",
    }
}

/// Groups a class of `group` also overrides when it appears later.
fn conflicting_groups(group: &str) -> &'static [&'static str] {
    match group {
        "p" => &["px", "py", "ps", "pe", "pt", "pr", "pb", "pl"],
        "px" => &["pr", "pl"],
        "py" => &["pt", "pb"],
        "m" => &["mx", "my", "ms", "me", "mt", "mr", "mb", "ml"],
        "mx" => &["mr", "ml"],
        "my" => &["mt", "mb"],
        "gap" => &["gap-x", "gap-y"],
        "size" => &["w", "h"],
        "inset" => &["inset-x", "inset-y", "top", "right", "bottom", "left"],
        "inset-x" => &["right", "left"],
        "inset-y" => &["top", "bottom"],
        "overflow" => &["overflow-x", "overflow-y"],
        "rounded" => &[
            "rounded-t",
            "rounded-r",
            "rounded-b",
            "rounded-l",
            "rounded-s",
            "rounded-e",
            "rounded-tl",
            "rounded-tr",
            "rounded-br",
            "rounded-bl",
        ],
        "rounded-t" => &["rounded-tl", "rounded-tr"],
        "rounded-r" => &["rounded-tr", "rounded-br"],
        "rounded-b" => &["rounded-br", "rounded-bl"],
        "rounded-l" => &["rounded-tl", "rounded-bl"],
        "border-w" => &[
            "border-w-x",
            "border-w-y",
            "border-w-t",
            "border-w-r",
            "border-w-b",
            "border-w-l",
        ],
        "border-w-x" => &["border-w-r", "border-w-l"],
        "border-w-y" => &["border-w-t", "border-w-b"],
        "border-color" => &[
            "border-color-x",
            "border-color-y",
            "border-color-t",
            "border-color-r",
            "border-color-b",
            "border-color-l",
        ],
        "border-color-x" => &["border-color-r", "border-color-l"],
        "border-color-y" => &["border-color-t", "border-color-b"],
        _ => &[],
    }
}

/// Marker appended to truncated strings
const ELLIPSIS: &str = "...";

/// Shorten `s` to at most `max_len` characters.
///
/// Strings that fit are returned unchanged. Longer ones keep their first
/// `max_len - 3` characters followed by `...`, so the result is exactly
/// `max_len` characters long. Lengths are counted in `char`s.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut out: String = s.chars().take(keep).collect();
    out.push_str(&ELLIPSIS[..max_len.min(ELLIPSIS.len())]);
    out
}

/// Up to two uppercase initials from a display name.
///
/// `None` and blank names yield `"?"`.
pub fn get_initials(name: Option<&str>) -> String {
    let initials: String = name
        .unwrap_or_default()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();

    if initials.is_empty() {
        "?".to_string()
    } else {
        initials
    }
}

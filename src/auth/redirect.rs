//! Post-login redirect targets
//!
//! A `redirect` query parameter is only honoured when it names a path on
//! this site. Absolute URLs, scheme-relative `//host` forms and backslash
//! tricks fall back to the default destination.

use url::{Position, Url};

/// Where users land after signing in when no target was requested
pub const DEFAULT_REDIRECT: &str = "/dashboard";

/// Placeholder origin used only to normalise candidate paths
const PROBE_ORIGIN: &str = "http://redirect.invalid";

/// Resolve a caller-supplied redirect target to a same-origin path.
///
/// Returns the normalised path (with query and fragment) or
/// [`DEFAULT_REDIRECT`].
pub fn resolve_redirect(requested: Option<&str>) -> String {
    requested
        .map(str::trim)
        .filter(|target| !target.is_empty())
        .and_then(same_origin_path)
        .unwrap_or_else(|| DEFAULT_REDIRECT.to_string())
}

fn same_origin_path(target: &str) -> Option<String> {
    if !target.starts_with('/') || target.starts_with("//") {
        return None;
    }
    if target.contains('\\') || target.chars().any(char::is_control) {
        return None;
    }

    let base = Url::parse(PROBE_ORIGIN).ok()?;
    let joined = base.join(target).ok()?;
    if joined.origin() != base.origin() {
        return None;
    }

    Some(joined[Position::BeforePath..].to_string())
}

//! Query string assembly.

use crate::config::QueryParams;

/// Append `params` to `url` as a query string.
///
/// Returns `url` unchanged when `params` is `None`. Otherwise the pairs are
/// joined as `key=value` with `&`, in insertion order, after a single `?`.
/// Nothing is percent-encoded: callers pre-encode values that contain
/// reserved characters.
pub fn build_url(url: &str, params: Option<&QueryParams>) -> String {
    let Some(params) = params else {
        return url.to_string();
    };

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", url, query)
}

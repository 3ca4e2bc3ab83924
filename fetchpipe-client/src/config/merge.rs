//! Layering a call-site config over client defaults.

use http::HeaderMap;

use super::request::RequestConfig;

/// Merge two configs, right-biased.
///
/// Each field of `overrides` wins when set, otherwise the field of `base`
/// is kept. Headers are the one exception: when both sides carry headers
/// the result holds the union of names, with `overrides` replacing every
/// value of a name it sets. Neither input is modified.
pub fn merge_config(base: &RequestConfig, overrides: &RequestConfig) -> RequestConfig {
    let headers = match (&base.headers, &overrides.headers) {
        (Some(base), Some(overrides)) => Some(merge_headers(base, overrides)),
        (base, overrides) => pick(base, overrides),
    };

    RequestConfig {
        url: pick(&base.url, &overrides.url),
        method: pick(&base.method, &overrides.method),
        base_url: pick(&base.base_url, &overrides.base_url),
        transform_request: pick(&base.transform_request, &overrides.transform_request),
        transform_response: pick(&base.transform_response, &overrides.transform_response),
        headers,
        params: pick(&base.params, &overrides.params),
        data: pick(&base.data, &overrides.data),
        timeout: pick(&base.timeout, &overrides.timeout),
        response_type: pick(&base.response_type, &overrides.response_type),
    }
}

impl RequestConfig {
    /// Shorthand for [`merge_config(self, overrides)`](merge_config).
    pub fn merge(&self, overrides: &RequestConfig) -> RequestConfig {
        merge_config(self, overrides)
    }
}

fn pick<T: Clone>(base: &Option<T>, overrides: &Option<T>) -> Option<T> {
    overrides.as_ref().or(base.as_ref()).cloned()
}

fn merge_headers(base: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = base.clone();
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

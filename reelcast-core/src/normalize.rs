//! Source URL normalization
//!
//! Strips tracking query parameters so that cosmetically different links to
//! the same video share one cache key and one resolver request.

use url::Url;

/// Query parameters that identify the share, not the content.
const TRACKING_PARAMS: &[&str] = &[
    "igsh",
    "igshid",
    "si",
    "feature",
    "fbclid",
    "gclid",
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
];

/// Normalize a raw source URL for use as a cache key and resolver input.
///
/// Best-effort: a URL that does not parse is truncated at the first `?`
/// instead. Never fails, and `normalize(normalize(u)) == normalize(u)`.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        return raw.split('?').next().unwrap_or(raw).to_string();
    };

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
    }

    url.to_string()
}

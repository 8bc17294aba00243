//! Media stream proxy
//!
//! Fetches a direct media URL upstream and re-serves the byte stream to the
//! browser with correct HTTP semantics: the inbound `Range` header is
//! forwarded verbatim, the upstream status code is mirrored (4xx/5xx
//! included), and only a fixed allow-list of response headers is copied.
//! The body is piped through as a stream and never buffered in memory.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Response};
use futures::TryStreamExt;

/// Browser-like identity; some CDNs refuse unadorned clients.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Time allowed to establish the upstream connection. There is deliberately
/// no total request timeout: a healthy stream may run for minutes.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// The only upstream response headers that reach the client.
const FORWARDED_HEADERS: [HeaderName; 4] = [
    header::CONTENT_TYPE,
    header::CONTENT_LENGTH,
    header::CONTENT_RANGE,
    header::ACCEPT_RANGES,
];

const DEFAULT_CONTENT_TYPE: &str = "video/mp4";

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("upstream request failed: {0}")]
    Connect(String),

    #[error("failed to build proxied response: {0}")]
    Response(String),
}

/// One proxy fetch: the resolved media URL plus the request context needed
/// to make the upstream accept us.
pub struct StreamRequest<'a> {
    /// Direct media URL to fetch
    pub media_url: &'a str,
    /// Original (non-normalized) source page URL; its origin becomes the
    /// outbound Referer
    pub source_url: &'a str,
    /// Inbound `Range` header value, forwarded verbatim when present
    pub range: Option<&'a str>,
}

/// Build the shared client used for proxy fetches.
pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}

/// Fetch the media URL and stream it back, mirroring status and the header
/// allow-list.
///
/// An error is returned only when the upstream request fails to establish;
/// once bytes are flowing, a transport error mid-stream is logged and simply
/// terminates the response (HTTP cannot recover at that point).
pub async fn proxy_stream(
    client: &reqwest::Client,
    request: StreamRequest<'_>,
) -> Result<Response<Body>, ProxyError> {
    let mut outbound = client
        .get(request.media_url)
        .header(header::USER_AGENT, USER_AGENT);

    if let Some(referer) = referer_for(request.source_url) {
        outbound = outbound.header(header::REFERER, referer);
    }

    if let Some(range) = request.range {
        tracing::debug!(range, "forwarding range request upstream");
        outbound = outbound.header(header::RANGE, range);
    }

    let upstream = outbound
        .send()
        .await
        .map_err(|e| ProxyError::Connect(e.to_string()))?;

    // Any upstream status is passed through rather than raised, so the
    // player sees exactly what the CDN said (206 for ranges, 403 on
    // expired links, ...).
    let status = upstream.status();
    let headers = forward_headers(upstream.headers());

    let body = Body::from_stream(upstream.bytes_stream().inspect_err(|error| {
        tracing::warn!(%error, "upstream stream error while piping");
    }));

    let mut builder = Response::builder().status(status);
    if let Some(map) = builder.headers_mut() {
        map.extend(headers);
    }
    builder
        .body(body)
        .map_err(|e| ProxyError::Response(e.to_string()))
}

/// Copy the allow-listed headers, defaulting the content type when the
/// upstream left it out.
fn forward_headers(upstream: &HeaderMap) -> HeaderMap {
    let mut forwarded = HeaderMap::new();

    for name in FORWARDED_HEADERS {
        if let Some(value) = upstream.get(&name) {
            forwarded.insert(name, value.clone());
        }
    }

    if !forwarded.contains_key(header::CONTENT_TYPE) {
        forwarded.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(DEFAULT_CONTENT_TYPE),
        );
    }

    forwarded
}

/// Origin (`scheme://host/`) of the source page, used as the Referer.
fn referer_for(source_url: &str) -> Option<String> {
    let url = url::Url::parse(source_url).ok()?;
    let host = url.host_str()?;
    Some(format!("{}://{}/", url.scheme(), host))
}

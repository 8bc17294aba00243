//! Third-party lookup API resolver
//!
//! Asks a keyed HTTP lookup service for the direct media URL behind a source
//! page. The service returns heterogeneous payload shapes and sometimes
//! degrades to handing back the original page link instead of media; the
//! fallback chain and page-link guards below reject that degraded case
//! instead of proxying an HTML page as if it were a video.

use serde_json::Value;
use std::time::Duration;

use super::{ResolveError, Resolver};
use crate::config::LookupConfig;
use async_trait::async_trait;

/// URL fragments that mark a source page rather than raw media.
const PAGE_LINK_MARKERS: &[&str] = &["instagram.com/reel/", "instagram.com/reels/"];

pub struct LookupResolver {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_host: String,
}

impl LookupResolver {
    pub fn new(config: &LookupConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }
}

#[async_trait]
impl Resolver for LookupResolver {
    fn name(&self) -> &'static str {
        "lookup"
    }

    async fn resolve(&self, url: &str) -> Result<String, ResolveError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("url", url)])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .send()
            .await
            .map_err(|e| ResolveError::Lookup(format!("request failed: {e}")))?;

        let status = response.status();
        let payload: Value = response
            .json()
            .await
            .map_err(|e| ResolveError::Lookup(format!("unreadable response body: {e}")))?;

        if !status.is_success() {
            tracing::error!(%status, %payload, "lookup service returned an error");
            return Err(ResolveError::Lookup(format!(
                "lookup service returned status {status}"
            )));
        }

        extract_media_url(&payload).inspect_err(|_| {
            tracing::error!(%payload, "no usable media link in lookup payload");
        })
    }
}

fn is_page_link(url: &str) -> bool {
    PAGE_LINK_MARKERS.iter().any(|marker| url.contains(marker))
}

/// Fallback fields are rejected outright when they point back at the
/// source host, page link or not.
fn is_source_host_link(url: &str) -> bool {
    url.contains("instagram.com/")
}

/// Walk a lookup payload for a direct media URL.
///
/// Order: `data` wrapper if present, then the `medias` list (first entry
/// typed "video", else the first entry), then `download_url` / `url` as
/// fallbacks when the list gave nothing playable.
fn extract_media_url(payload: &Value) -> Result<String, ResolveError> {
    let data = payload
        .get("data")
        .filter(|value| value.is_object())
        .unwrap_or(payload);

    let mut candidate: Option<String> = None;

    if let Some(medias) = data.get("medias").and_then(Value::as_array) {
        if let Some(first) = medias.first() {
            let video = medias
                .iter()
                .find(|media| media.get("type").and_then(Value::as_str) == Some("video"))
                .unwrap_or(first);
            candidate = video
                .get("url")
                .and_then(Value::as_str)
                .map(str::to_string);
        }
    }

    if candidate.as_deref().is_none_or(is_page_link) {
        for field in ["download_url", "url"] {
            if let Some(value) = data.get(field).and_then(Value::as_str) {
                if !is_source_host_link(value) {
                    candidate = Some(value.to_string());
                    break;
                }
            }
        }
    }

    match candidate {
        Some(url) if !is_page_link(&url) => Ok(url),
        _ => Err(ResolveError::PageLink),
    }
}

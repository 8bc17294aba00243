//! Streaming endpoint
//!
//! Ties the pipeline together: validate the query, normalize the URL, check
//! the resolution cache, resolve on a miss, then hand off to the stream
//! proxy. Every failure before bytes flow becomes a JSON error envelope; a
//! failure mid-stream can only be logged.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use super::{AppError, AppState};
use reelcast_core::normalize::normalize;
use reelcast_proxy::{proxy_stream, StreamRequest};

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub url: Option<String>,
}

/// GET `/api/stream?url=...` - Resolve a source page URL and proxy its media
pub async fn stream_video(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(raw_url) = query.url.filter(|url| !url.is_empty()) else {
        return AppError::bad_request("Missing url query parameter").into_response();
    };

    let normalized = normalize(&raw_url);
    let range = headers.get(header::RANGE).and_then(|v| v.to_str().ok());

    let direct_url = match state.cache.get(&normalized) {
        Some(cached) => {
            tracing::debug!(url = %normalized, "serving direct url from cache");
            cached
        }
        None => match state.resolver.resolve(&normalized).await {
            Ok(direct) => {
                state.cache.put(normalized.clone(), direct.clone());
                tracing::info!(url = %normalized, "resolved and cached direct media url");
                direct
            }
            Err(e) => {
                tracing::error!(url = %normalized, error = %e, "resolution failed");
                return AppError::internal_server_error("Unable to resolve this video")
                    .with_details(e.to_string())
                    .with_hint(platform_hint(&raw_url))
                    .into_response();
            }
        },
    };

    match proxy_stream(
        &state.http,
        StreamRequest {
            media_url: &direct_url,
            source_url: &raw_url,
            range,
        },
    )
    .await
    {
        Ok(response) => response.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to start upstream stream");
            AppError::internal_server_error("Stream could not be started")
                .with_details(e.to_string())
                .with_hint(platform_hint(&raw_url))
                .into_response()
        }
    }
}

/// Guidance keyed to the source platform, shown alongside the raw error.
fn platform_hint(source_url: &str) -> &'static str {
    let host = url::Url::parse(source_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_lowercase));

    match host.as_deref() {
        Some(host) if host.ends_with("instagram.com") => {
            "Check the lookup API key and its remaining quota."
        }
        Some(host) if host.ends_with("youtube.com") || host.ends_with("youtu.be") => {
            "The extractor may need an update or a cookies file for this site."
        }
        _ => "The source site may have changed; try again or re-submit the link.",
    }
}

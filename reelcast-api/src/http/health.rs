//! Health check endpoint
//!
//! Reports the active resolver backend and store/cache sizes for
//! monitoring probes.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use super::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: &'static str,
    pub cache_items: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub using_cookies: Option<bool>,
    pub database: &'static str,
    pub playlist_items: usize,
    pub pending_submissions: usize,
}

/// Health check router
pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let counts = state.store.counts().await;

    // Cookie use only means anything for the extraction-tool strategy.
    let using_cookies = (state.resolver.name() == "ytdlp").then(|| state.resolver.uses_cookies());

    Json(HealthResponse {
        status: "ok",
        provider: state.resolver.name(),
        cache_items: state.cache.len(),
        using_cookies,
        database: "file",
        playlist_items: counts.playlist_items,
        pending_submissions: counts.pending_submissions,
    })
}

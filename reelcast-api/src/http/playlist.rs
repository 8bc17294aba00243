// Playlist HTTP handlers

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use super::{middleware::AdminToken, AppError, AppResult, AppState};
use reelcast_core::models::PlaylistItem;

#[derive(Debug, Serialize)]
pub struct ReplaceResponse {
    pub success: bool,
    pub count: usize,
}

/// GET /api/playlists - the approved playlist, public
pub async fn list_playlists(State(state): State<AppState>) -> Json<Vec<PlaylistItem>> {
    Json(state.store.playlist().await)
}

/// POST /api/playlists - replace the whole playlist, admin only
///
/// The body must be a JSON array; anything else is a 400 (not a 422, which
/// is what letting the extractor reject it would produce).
pub async fn replace_playlists(
    _admin: AdminToken,
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> AppResult<Json<ReplaceResponse>> {
    if !body.is_array() {
        return Err(AppError::bad_request("Playlist body must be a JSON array"));
    }

    let items: Vec<PlaylistItem> = serde_json::from_value(body)
        .map_err(|e| AppError::bad_request(format!("Invalid playlist entry: {e}")))?;

    let count = state.store.replace_playlist(items).await?;

    Ok(Json(ReplaceResponse {
        success: true,
        count,
    }))
}

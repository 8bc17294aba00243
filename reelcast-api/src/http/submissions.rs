// Submission queue HTTP handlers

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{middleware::AdminToken, AppError, AppResult, AppState};
use reelcast_core::models::{PlaylistItem, Submission};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub submission: Submission,
}

#[derive(Debug, Deserialize)]
pub struct ApproveRequest {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ApproveResponse {
    pub success: bool,
    pub item: PlaylistItem,
}

#[derive(Debug, Serialize)]
pub struct RejectResponse {
    pub success: bool,
}

/// POST /api/submissions - public submission endpoint
pub async fn submit(
    State(state): State<AppState>,
    Json(req): Json<SubmitRequest>,
) -> AppResult<Json<SubmitResponse>> {
    let title = req
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Submission title is required"))?;
    let url = req
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::bad_request("Submission url is required"))?;

    let submission = state.store.submit(title, url, req.tags).await?;

    Ok(Json(SubmitResponse {
        success: true,
        submission,
    }))
}

/// GET /api/submissions - pending queue, admin only
pub async fn list_submissions(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Json<Vec<Submission>> {
    Json(state.store.submissions().await)
}

/// POST /api/submissions/approve - move a pending entry into the playlist
pub async fn approve(
    _admin: AdminToken,
    State(state): State<AppState>,
    Json(req): Json<ApproveRequest>,
) -> AppResult<Json<ApproveResponse>> {
    let item = state.store.approve(&req.id).await?;
    tracing::info!(id = %item.id, title = %item.title, "submission approved");

    Ok(Json(ApproveResponse {
        success: true,
        item,
    }))
}

/// DELETE /api/submissions/{id} - drop a pending entry
pub async fn reject(
    _admin: AdminToken,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RejectResponse>> {
    state.store.reject(&id).await?;
    tracing::info!(%id, "submission rejected");

    Ok(Json(RejectResponse { success: true }))
}

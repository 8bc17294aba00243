// Authentication HTTP handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{AppError, AppResult, AppState};

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login response: the static admin token, exchanged for the password
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub success: bool,
}

/// Exchange the admin password for the admin bearer token
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let token = state
        .credentials
        .login(&req.password)
        .map_err(|_| AppError::unauthorized("Invalid password"))?;

    Ok(Json(LoginResponse {
        token: token.to_string(),
        success: true,
    }))
}

// HTTP middleware

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use super::{AppError, AppState};

/// Proof that the request carried the configured admin bearer token.
///
/// Missing or malformed credentials are a 401; a present-but-wrong token is
/// a 403. The actual comparison lives in `AdminCredentials` so the scheme
/// stays swappable without touching handlers.
#[derive(Debug, Clone, Copy)]
pub struct AdminToken;

impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::unauthorized("Invalid Authorization header"))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Expected a bearer token"))?;

        app_state
            .credentials
            .check_token(token)
            .map_err(|_| AppError::forbidden("Invalid admin token"))?;

        Ok(Self)
    }
}

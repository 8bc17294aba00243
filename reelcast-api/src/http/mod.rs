// Module: http
// HTTP/JSON REST API: streaming endpoint plus playlist/submission CRUD

pub mod auth;
pub mod error;
pub mod health;
pub mod middleware;
pub mod playlist;
pub mod stream;
pub mod submissions;

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use reelcast_core::{
    auth::AdminCredentials, cache::ResolutionCache, resolver::Resolver, store::ContentStore,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<dyn Resolver>,
    pub cache: Arc<ResolutionCache>,
    pub store: Arc<ContentStore>,
    pub credentials: Arc<AdminCredentials>,
    /// Shared upstream client for proxy fetches
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(
        resolver: Arc<dyn Resolver>,
        cache: Arc<ResolutionCache>,
        store: Arc<ContentStore>,
        credentials: Arc<AdminCredentials>,
    ) -> anyhow::Result<Self> {
        let http = reelcast_proxy::build_client()?;

        Ok(Self {
            resolver,
            cache,
            store,
            credentials,
            http,
        })
    }
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check endpoint (for monitoring probes)
        .merge(health::create_health_router())
        // Streaming endpoint
        .route("/api/stream", get(stream::stream_video))
        // Authentication
        .route("/api/auth/login", post(auth::login))
        // Playlist CRUD
        .route(
            "/api/playlists",
            get(playlist::list_playlists).post(playlist::replace_playlists),
        )
        // Submission queue
        .route(
            "/api/submissions",
            get(submissions::list_submissions).post(submissions::submit),
        )
        .route("/api/submissions/approve", post(submissions::approve))
        .route("/api/submissions/{id}", delete(submissions::reject));

    // Apply layers before state
    let router = router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Apply state to all routes (must be last)
    router.with_state(state)
}

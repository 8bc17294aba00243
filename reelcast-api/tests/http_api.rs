//! Router-level integration tests
//!
//! Drive the full axum router with `tower::ServiceExt::oneshot`, a
//! call-counting mock resolver, a tempdir-backed store, and a wiremock
//! upstream for the streaming path.
//!
//! Run with: cargo test -p reelcast-api

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reelcast_api::http::{create_router, AppState};
use reelcast_core::auth::AdminCredentials;
use reelcast_core::cache::ResolutionCache;
use reelcast_core::resolver::{ResolveError, Resolver};
use reelcast_core::store::ContentStore;

const ADMIN_PASSWORD: &str = "hunter2";
const ADMIN_TOKEN: &str = "test-admin-token";

/// Resolver double: returns a fixed direct URL (or a fixed failure) and
/// counts how often it was asked.
struct MockResolver {
    direct_url: Option<String>,
    calls: AtomicUsize,
}

impl MockResolver {
    fn returning(direct_url: &str) -> Arc<Self> {
        Arc::new(Self {
            direct_url: Some(direct_url.to_string()),
            calls: AtomicUsize::new(0),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            direct_url: None,
            calls: AtomicUsize::new(0),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Resolver for MockResolver {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn resolve(&self, _url: &str) -> Result<String, ResolveError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.direct_url.clone().ok_or(ResolveError::PageLink)
    }
}

async fn test_router(resolver: Arc<MockResolver>) -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = ContentStore::open(dir.path()).await.expect("open store");
    let cache = Arc::new(ResolutionCache::new(Duration::from_secs(3600)));
    let credentials = Arc::new(AdminCredentials::new(ADMIN_PASSWORD, ADMIN_TOKEN));

    let state = AppState::new(resolver, cache, Arc::new(store), credentials).expect("app state");
    (create_router(state), dir)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        axum::http::header::AUTHORIZATION,
        format!("Bearer {token}").parse().expect("header"),
    );
    request
}

fn stream_uri(source_url: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("url", source_url)
        .finish();
    format!("/api/stream?{query}")
}

async fn json_body(response: axum::http::Response<Body>) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

// ------------------------------------------------------------------
// Streaming endpoint
// ------------------------------------------------------------------

#[tokio::test]
async fn test_stream_without_url_is_bad_request_and_makes_no_calls() {
    let resolver = MockResolver::returning("https://cdn.example.com/clip.mp4");
    let (router, _dir) = test_router(resolver.clone()).await;

    let response = router.oneshot(get("/api/stream")).await.expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().expect("error field").contains("url"));
    assert_eq!(resolver.call_count(), 0);
}

#[tokio::test]
async fn test_stream_proxies_resolved_media() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"reel-bytes".to_vec(), "video/mp4"))
        .mount(&upstream)
        .await;

    let resolver = MockResolver::returning(&format!("{}/clip.mp4", upstream.uri()));
    let (router, _dir) = test_router(resolver.clone()).await;

    let response = router
        .oneshot(get(&stream_uri("https://www.instagram.com/reel/ABC123/")))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").expect("content type"),
        "video/mp4"
    );
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    assert_eq!(&bytes[..], b"reel-bytes");
    assert_eq!(resolver.call_count(), 1);
}

#[tokio::test]
async fn test_stream_cache_is_keyed_by_normalized_url() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clip.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"reel-bytes".to_vec(), "video/mp4"))
        .mount(&upstream)
        .await;

    let resolver = MockResolver::returning(&format!("{}/clip.mp4", upstream.uri()));
    let (router, _dir) = test_router(resolver.clone()).await;

    // Same reel, cosmetically different share links.
    for source in [
        "https://www.instagram.com/reel/ABC123/?igsh=first",
        "https://www.instagram.com/reel/ABC123/?igsh=second",
        "https://www.instagram.com/reel/ABC123/",
    ] {
        let response = router
            .clone()
            .oneshot(get(&stream_uri(source)))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    assert_eq!(resolver.call_count(), 1);
}

#[tokio::test]
async fn test_stream_range_request_passes_through_end_to_end() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/clip.mp4"))
        .and(header("Range", "bytes=100-199"))
        .respond_with(
            ResponseTemplate::new(206)
                .insert_header("Content-Range", "bytes 100-199/500")
                .insert_header("Accept-Ranges", "bytes")
                .set_body_raw(vec![0u8; 100], "video/mp4"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let resolver = MockResolver::returning(&format!("{}/clip.mp4", upstream.uri()));
    let (router, _dir) = test_router(resolver).await;

    let mut request = get(&stream_uri("https://www.instagram.com/reel/ABC123/"));
    request
        .headers_mut()
        .insert("range", "bytes=100-199".parse().expect("header"));

    let response = router.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::PARTIAL_CONTENT);
    assert_eq!(
        response.headers().get("content-range").expect("content range"),
        "bytes 100-199/500"
    );
    assert_eq!(
        response.headers().get("accept-ranges").expect("accept ranges"),
        "bytes"
    );
}

#[tokio::test]
async fn test_stream_resolution_failure_returns_envelope_with_hint() {
    let resolver = MockResolver::failing();
    let (router, _dir) = test_router(resolver).await;

    let response = router
        .oneshot(get(&stream_uri("https://www.instagram.com/reel/ABC123/")))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    assert!(body["error"].as_str().expect("error").contains("resolve"));
    assert!(body["details"]
        .as_str()
        .expect("details")
        .contains("page link"));
    assert!(body["message"].as_str().expect("message").contains("API key"));
}

// ------------------------------------------------------------------
// Auth
// ------------------------------------------------------------------

#[tokio::test]
async fn test_login_exchanges_password_for_token() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            json!({ "password": ADMIN_PASSWORD }),
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["token"], ADMIN_TOKEN);
    assert_eq!(body["success"], true);

    let response = router
        .oneshot(post_json("/api/auth/login", json!({ "password": "nope" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_auth_ladder() {
    let (router, _dir) = test_router(MockResolver::failing()).await;
    let body = json!([{ "title": "One", "url": "https://www.instagram.com/reel/ONE/" }]);

    // No Authorization header at all.
    let response = router
        .clone()
        .oneshot(post_json("/api/playlists", body.clone()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong token.
    let response = router
        .clone()
        .oneshot(with_bearer(
            post_json("/api/playlists", body.clone()),
            "wrong-token",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Correct token replaces the store.
    let response = router
        .clone()
        .oneshot(with_bearer(post_json("/api/playlists", body), ADMIN_TOKEN))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let reply = json_body(response).await;
    assert_eq!(reply["success"], true);
    assert_eq!(reply["count"], 1);

    let response = router
        .oneshot(get("/api/playlists"))
        .await
        .expect("response");
    let playlist = json_body(response).await;
    assert_eq!(playlist.as_array().expect("array").len(), 1);
    assert_eq!(playlist[0]["title"], "One");
}

// ------------------------------------------------------------------
// Playlist CRUD
// ------------------------------------------------------------------

#[tokio::test]
async fn test_playlist_replacement_rejects_non_array_body() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let response = router
        .oneshot(with_bearer(
            post_json("/api/playlists", json!({ "title": "not an array" })),
            ADMIN_TOKEN,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().expect("error").contains("array"));
}

#[tokio::test]
async fn test_playlist_replacement_is_full_replacement() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let first = json!([
        { "title": "One", "url": "https://www.instagram.com/reel/ONE/" },
        { "title": "Two", "url": "https://www.instagram.com/reel/TWO/" }
    ]);
    let response = router
        .clone()
        .oneshot(with_bearer(post_json("/api/playlists", first), ADMIN_TOKEN))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let second = json!([
        { "title": "Three", "url": "https://www.instagram.com/reel/THREE/" }
    ]);
    let response = router
        .clone()
        .oneshot(with_bearer(post_json("/api/playlists", second), ADMIN_TOKEN))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .oneshot(get("/api/playlists"))
        .await
        .expect("response");
    let playlist = json_body(response).await;
    assert_eq!(playlist.as_array().expect("array").len(), 1);
    assert_eq!(playlist[0]["title"], "Three");
}

// ------------------------------------------------------------------
// Submissions
// ------------------------------------------------------------------

#[tokio::test]
async fn test_submission_requires_title_and_url() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/submissions",
            json!({ "url": "https://www.instagram.com/reel/ABC/" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(post_json("/api/submissions", json!({ "title": "A reel" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_submission_conflicts_and_keeps_one_entry() {
    let (router, _dir) = test_router(MockResolver::failing()).await;
    let submission = json!({
        "title": "A reel",
        "url": "https://www.instagram.com/reel/ABC/",
        "tags": ["funny"]
    });

    let response = router
        .clone()
        .oneshot(post_json("/api/submissions", submission.clone()))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(post_json("/api/submissions", submission))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(with_bearer(get("/api/submissions"), ADMIN_TOKEN))
        .await
        .expect("response");
    let pending = json_body(response).await;
    assert_eq!(pending.as_array().expect("array").len(), 1);
    assert!(pending[0]["submittedAt"].is_string());
}

#[tokio::test]
async fn test_approve_moves_submission_into_playlist() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/submissions",
            json!({
                "title": "A reel",
                "url": "https://www.instagram.com/reel/ABC/",
                "tags": ["funny"]
            }),
        ))
        .await
        .expect("response");
    let submitted = json_body(response).await;
    let id = submitted["submission"]["id"]
        .as_str()
        .expect("submission id")
        .to_string();

    let response = router
        .clone()
        .oneshot(with_bearer(
            post_json("/api/submissions/approve", json!({ "id": id })),
            ADMIN_TOKEN,
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let approved = json_body(response).await;
    assert_eq!(approved["item"]["title"], "A reel");
    assert_eq!(approved["item"]["tags"][0], "funny");

    let response = router
        .clone()
        .oneshot(get("/api/playlists"))
        .await
        .expect("response");
    let playlist = json_body(response).await;
    assert_eq!(playlist.as_array().expect("array").len(), 1);

    let response = router
        .oneshot(with_bearer(get("/api/submissions"), ADMIN_TOKEN))
        .await
        .expect("response");
    let pending = json_body(response).await;
    assert!(pending.as_array().expect("array").is_empty());
}

#[tokio::test]
async fn test_approve_unknown_id_is_not_found() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let response = router
        .oneshot(with_bearer(
            post_json("/api/submissions/approve", json!({ "id": "missing" })),
            ADMIN_TOKEN,
        ))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reject_removes_pending_submission() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let response = router
        .clone()
        .oneshot(post_json(
            "/api/submissions",
            json!({ "title": "A reel", "url": "https://www.instagram.com/reel/ABC/" }),
        ))
        .await
        .expect("response");
    let submitted = json_body(response).await;
    let id = submitted["submission"]["id"]
        .as_str()
        .expect("submission id")
        .to_string();

    let request = with_bearer(
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/submissions/{id}"))
            .body(Body::empty())
            .expect("request"),
        ADMIN_TOKEN,
    );
    let response = router.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let request = with_bearer(
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/submissions/{id}"))
            .body(Body::empty())
            .expect("request"),
        ADMIN_TOKEN,
    );
    let response = router.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ------------------------------------------------------------------
// Health
// ------------------------------------------------------------------

#[tokio::test]
async fn test_health_reports_provider_and_sizes() {
    let (router, _dir) = test_router(MockResolver::failing()).await;

    let response = router.oneshot(get("/health")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["provider"], "mock");
    assert_eq!(body["cacheItems"], 0);
    assert_eq!(body["database"], "file");
    assert_eq!(body["playlistItems"], 0);
    assert_eq!(body["pendingSubmissions"], 0);
}

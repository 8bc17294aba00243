//! Server assembly and lifecycle
//!
//! Builds the resolver, cache, store and credentials from configuration,
//! mounts the HTTP router, and serves until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{error, info};

use reelcast_api::http::{create_router, AppState};
use reelcast_core::{
    auth::AdminCredentials, cache::ResolutionCache, resolver, store::ContentStore, Config,
};

pub async fn run(config: Config) -> Result<()> {
    let resolver = resolver::build_resolver(&config.resolver)?;
    info!("Resolver backend: {}", resolver.name());

    let cache = Arc::new(ResolutionCache::new(Duration::from_secs(
        config.cache.ttl_seconds,
    )));
    let store = Arc::new(ContentStore::open(config.store.data_dir.as_str()).await?);
    let credentials = Arc::new(AdminCredentials::new(
        config.auth.admin_password.as_str(),
        config.auth.admin_token.as_str(),
    ));

    let state = AppState::new(resolver, cache, store, credentials)?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.http_address()).await?;
    info!("HTTP server listening on {}", listener.local_addr()?);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("Received Ctrl+C"); }
        () = terminate => { info!("Received SIGTERM"); }
    }
}

//! Resolver capability
//!
//! Maps a normalized source-page URL to a direct, playable media URL. Two
//! interchangeable strategies exist: a keyed third-party lookup API and a
//! local command-line extraction tool. The strategy is chosen once at
//! process start from configuration.

mod lookup;
mod ytdlp;

pub use lookup::LookupResolver;
pub use ytdlp::YtdlpResolver;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{ResolverConfig, ResolverProvider};

/// Resolver-specific errors
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("lookup request failed: {0}")]
    Lookup(String),

    #[error("direct media link not found; lookup service returned a page link instead of media")]
    PageLink,

    #[error("extractor binary not found: {0}")]
    ExtractorMissing(String),

    #[error("extractor failed: {0}")]
    ExtractorFailed(String),

    #[error("extractor produced no output")]
    EmptyOutput,

    #[error("extractor timed out after {0}s")]
    Timeout(u64),
}

/// A capability that turns a source-page URL into a direct media URL.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Strategy name reported by the health endpoint
    fn name(&self) -> &'static str;

    /// Resolve a normalized source URL to a direct media URL.
    ///
    /// Resolution is idempotent; callers may retry by repeating the request.
    async fn resolve(&self, url: &str) -> Result<String, ResolveError>;

    /// Whether a stored cookie/session file is in play for this strategy
    fn uses_cookies(&self) -> bool {
        false
    }
}

/// Construct the configured resolver strategy.
pub fn build_resolver(config: &ResolverConfig) -> anyhow::Result<Arc<dyn Resolver>> {
    Ok(match config.provider {
        ResolverProvider::Lookup => Arc::new(LookupResolver::new(&config.lookup)?),
        ResolverProvider::Ytdlp => Arc::new(YtdlpResolver::new(&config.ytdlp)),
    })
}

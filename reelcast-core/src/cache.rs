//! Resolution cache
//!
//! In-process map from normalized source URL to the resolved direct media
//! URL. Entries expire after a fixed TTL but are only masked on lookup, not
//! purged; the next successful resolution for the key overwrites them.
//! Direct-media URLs are typically time-limited upstream, which is why the
//! TTL exists at all.
//!
//! Single-process only: each worker process holds its own copy.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

struct CacheEntry {
    direct_url: String,
    resolved_at: Instant,
}

/// TTL-bounded map of normalized URL -> direct media URL.
pub struct ResolutionCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResolutionCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a direct URL. Returns `None` for missing or expired entries.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.resolved_at.elapsed() < self.ttl {
            Some(entry.direct_url.clone())
        } else {
            None
        }
    }

    /// Store a resolved direct URL, replacing any previous entry for the key.
    pub fn put(&self, key: impl Into<String>, direct_url: impl Into<String>) {
        self.entries.write().insert(
            key.into(),
            CacheEntry {
                direct_url: direct_url.into(),
                resolved_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, expired ones included (they are masked,
    /// not removed).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let cache = ResolutionCache::new(Duration::from_secs(3600));
        assert_eq!(cache.get("https://example.com/reel/1"), None);

        cache.put("https://example.com/reel/1", "https://cdn.example.com/1.mp4");
        assert_eq!(
            cache.get("https://example.com/reel/1").as_deref(),
            Some("https://cdn.example.com/1.mp4")
        );
    }

    #[test]
    fn test_expired_entry_is_masked_not_removed() {
        let cache = ResolutionCache::new(Duration::from_millis(40));
        cache.put("key", "https://cdn.example.com/1.mp4");

        assert!(cache.get("key").is_some());

        std::thread::sleep(Duration::from_millis(60));
        assert_eq!(cache.get("key"), None);
        // Still counted: expiry masks, it does not purge.
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_put_overwrites_expired_entry() {
        let cache = ResolutionCache::new(Duration::from_millis(40));
        cache.put("key", "https://cdn.example.com/old.mp4");
        std::thread::sleep(Duration::from_millis(60));

        cache.put("key", "https://cdn.example.com/new.mp4");
        assert_eq!(
            cache.get("key").as_deref(),
            Some("https://cdn.example.com/new.mp4")
        );
        assert_eq!(cache.len(), 1);
    }
}

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, Instant};
use tracing::debug;

/// Key-value store for computed results. Entries are written once and
/// replaced, never updated in place.
#[async_trait]
pub trait ResultCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<serde_json::Value>;

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration);

    async fn clear(&self);
}

struct Entry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// Process-local cache with per-entry expiry.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<serde_json::Value> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) {
        let entry = Entry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

/// Periodically purge expired entries. Abort the handle at shutdown.
pub fn spawn_sweeper(cache: MemoryCache, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(every);
        loop {
            ticker.tick().await;
            let removed = cache.purge_expired().await;
            if removed > 0 {
                debug!(removed, "Purged expired cache entries");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache.set("costs:abc", json!({"total": 1.5}), Duration::from_secs(60)).await;
        assert_eq!(cache.get("costs:abc").await, Some(json!({"total": 1.5})));
        assert_eq!(cache.get("costs:missing").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_a_miss() {
        let cache = MemoryCache::new();
        cache.set("k", json!(1), Duration::from_secs(10)).await;
        tokio::time::advance(Duration::from_secs(11)).await;
        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MemoryCache::new();
        cache.set("a", json!(1), Duration::from_secs(60)).await;
        cache.set("b", json!(2), Duration::from_secs(60)).await;
        cache.clear().await;
        assert_eq!(cache.len().await, 0);
    }
}

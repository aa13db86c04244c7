//! In-process TTL cache backing the admin dashboard.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use polyhub_core::Result;
use polyhub_core::dashboard::DashboardCache;
use tokio::sync::RwLock;

const TRACING_TARGET_CACHE: &str = "polyhub_server::service::dashboard_cache";

#[derive(Debug)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Shared string cache with per-entry expiry.
///
/// Clones share the same map. Expired entries are treated as misses and
/// swept whenever a new value is written.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DashboardCache for SnapshotCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        let value = entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone());

        tracing::trace!(
            target: TRACING_TARGET_CACHE,
            key,
            hit = value.is_some(),
            "cache lookup"
        );

        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.expires_at > now);
        entries.insert(
            key.to_owned(),
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_expire_after_their_ttl() -> anyhow::Result<()> {
        let cache = SnapshotCache::new();

        cache
            .set("dashboard:snapshot", "{}".to_owned(), Duration::from_millis(20))
            .await?;
        assert_eq!(cache.get("dashboard:snapshot").await?.as_deref(), Some("{}"));

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("dashboard:snapshot").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_entries() -> anyhow::Result<()> {
        let cache = SnapshotCache::new();
        let clone = cache.clone();

        clone.set("k", "v".to_owned(), Duration::from_secs(60)).await?;
        assert_eq!(cache.get("k").await?.as_deref(), Some("v"));
        Ok(())
    }
}

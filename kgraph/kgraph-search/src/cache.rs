//! Moka-backed result cache with per-entry TTL.

use async_trait::async_trait;
use kgraph_core::{CacheKey, CachedResult, ResultCache};
use moka::Expiry;
use moka::future::Cache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

#[derive(Clone)]
struct CacheEntry {
    value: Arc<CachedResult>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was inserted with.
struct PerEntryTtl;

impl Expiry<CacheKey, CacheEntry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &CacheKey, value: &CacheEntry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// Bounded in-process cache for query results.
#[derive(Clone)]
pub struct MokaResultCache {
    cache: Cache<CacheKey, CacheEntry>,
}

impl MokaResultCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }

    pub async fn invalidate(&self, key: &CacheKey) {
        self.cache.invalidate(key).await;
    }

    pub async fn clear(&self) {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

#[async_trait]
impl ResultCache for MokaResultCache {
    async fn get(&self, key: &CacheKey) -> Option<CachedResult> {
        let hit = self.cache.get(key).await;
        trace!("Cache {} in {}", if hit.is_some() { "hit" } else { "miss" }, key.namespace());
        hit.map(|entry| entry.value.as_ref().clone())
    }

    async fn put(&self, key: CacheKey, value: CachedResult, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        self.cache
            .insert(
                key,
                CacheEntry {
                    value: Arc::new(value),
                    ttl,
                },
            )
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kgraph_core::{ComponentResult, NodeId};
    use std::collections::BTreeSet;

    fn component(n: u128) -> CachedResult {
        let id = NodeId::from_u128(n);
        CachedResult::Component(ComponentResult::new(id, BTreeSet::from([id])))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = MokaResultCache::new(100);
        let key = CacheKey::Component { node: NodeId::from_u128(1) };

        assert!(cache.get(&key).await.is_none());
        cache.put(key.clone(), component(1), Duration::from_secs(60)).await;
        assert_eq!(cache.get(&key).await, Some(component(1)));

        cache.invalidate(&key).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_entry_expires_after_its_ttl() {
        let cache = MokaResultCache::new(100);
        let key = CacheKey::Stats;
        cache.put(key.clone(), component(2), Duration::from_millis(50)).await;
        assert!(cache.get(&key).await.is_some());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_is_not_stored() {
        let cache = MokaResultCache::new(100);
        cache.put(CacheKey::Stats, component(3), Duration::ZERO).await;
        assert!(cache.get(&CacheKey::Stats).await.is_none());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = MokaResultCache::new(100);
        for n in 0..5 {
            cache
                .put(CacheKey::Component { node: NodeId::from_u128(n) }, component(n), Duration::from_secs(60))
                .await;
        }
        cache.clear().await;
        assert_eq!(cache.entry_count(), 0);
    }
}

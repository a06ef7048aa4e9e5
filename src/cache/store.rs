use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use crate::models::{AnalysisPayload, CacheEntry};

/// Access contract for the analysis cache. One entry per event slug;
/// upserts replace atomically, hits mutate bookkeeping in place, and expiry
/// is passive (entries are only removed by the sweeper).
#[async_trait]
pub trait AnalysisStore: Send + Sync {
    async fn get(&self, slug: &str) -> anyhow::Result<Option<CacheEntry>>;

    /// Replace-or-insert, keyed by `payload.slug`. Resets hit accounting and
    /// restarts the TTL clock.
    async fn upsert(
        &self,
        payload: &AnalysisPayload,
        ttl_minutes: i64,
    ) -> anyhow::Result<CacheEntry>;

    /// hit_count += 1, last_accessed_at = now.
    async fn record_hit(&self, slug: &str) -> anyhow::Result<()>;

    /// Pull the next allowed refresh in to `now + cooldown_minutes` without
    /// touching the payload. Used after rate-limited recompute failures.
    async fn set_cooldown(&self, slug: &str, cooldown_minutes: i64) -> anyhow::Result<()>;

    /// Housekeeping backstop: delete entries whose expiry is older than
    /// `cutoff`. Returns the number of entries removed.
    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64>;

    /// Liveness probe for the health endpoint.
    async fn ping(&self) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// `DashMap`-backed store. Per-key insert is atomic, so concurrent misses on
/// the same slug resolve last-writer-wins without duplicate keys.
#[derive(Debug, Default)]
pub struct MemoryAnalysisStore {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryAnalysisStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AnalysisStore for MemoryAnalysisStore {
    async fn get(&self, slug: &str) -> anyhow::Result<Option<CacheEntry>> {
        Ok(self.entries.get(slug).map(|e| e.clone()))
    }

    async fn upsert(
        &self,
        payload: &AnalysisPayload,
        ttl_minutes: i64,
    ) -> anyhow::Result<CacheEntry> {
        let now = Utc::now();
        let entry = CacheEntry {
            id: Uuid::new_v4(),
            slug: payload.slug.clone(),
            payload: payload.clone(),
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
            ttl_minutes,
            hit_count: 0,
            last_accessed_at: now,
        };
        self.entries.insert(payload.slug.clone(), entry.clone());
        Ok(entry)
    }

    async fn record_hit(&self, slug: &str) -> anyhow::Result<()> {
        if let Some(mut entry) = self.entries.get_mut(slug) {
            entry.hit_count += 1;
            entry.last_accessed_at = Utc::now();
        }
        Ok(())
    }

    async fn set_cooldown(&self, slug: &str, cooldown_minutes: i64) -> anyhow::Result<()> {
        if let Some(mut entry) = self.entries.get_mut(slug) {
            entry.expires_at = Utc::now() + Duration::minutes(cooldown_minutes);
        }
        Ok(())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at >= cutoff);
        Ok((before - self.entries.len()) as u64)
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventType;
    use std::sync::Arc;

    fn payload(slug: &str) -> AnalysisPayload {
        AnalysisPayload {
            slug: slug.into(),
            title: slug.into(),
            category: String::new(),
            event_type: EventType::Other,
            time_to_resolution_hours: 24.0,
            options: vec![],
            computed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_and_resets_accounting() {
        let store = MemoryAnalysisStore::new();
        store.upsert(&payload("a"), 60).await.unwrap();
        store.record_hit("a").await.unwrap();
        store.record_hit("a").await.unwrap();

        let entry = store.get("a").await.unwrap().unwrap();
        assert_eq!(entry.hit_count, 2);

        // Recompute replaces the entry and zeroes the counter.
        store.upsert(&payload("a"), 30).await.unwrap();
        let entry = store.get("a").await.unwrap().unwrap();
        assert_eq!(entry.hit_count, 0);
        assert_eq!(entry.ttl_minutes, 30);
    }

    #[tokio::test]
    async fn cooldown_moves_expiry_only() {
        let store = MemoryAnalysisStore::new();
        let original = store.upsert(&payload("a"), 120).await.unwrap();

        store.set_cooldown("a", 5).await.unwrap();
        let entry = store.get("a").await.unwrap().unwrap();
        assert!(entry.expires_at < original.expires_at);
        assert_eq!(entry.ttl_minutes, 120);
        assert_eq!(entry.hit_count, 0);
    }

    #[tokio::test]
    async fn sweep_removes_only_long_expired() {
        let store = MemoryAnalysisStore::new();
        store.upsert(&payload("keep"), 60).await.unwrap();
        store.upsert(&payload("drop"), 60).await.unwrap();
        store.set_cooldown("drop", -120).await.unwrap();

        let removed = store
            .delete_expired_before(Utc::now() - Duration::minutes(60))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(store.get("keep").await.unwrap().is_some());
        assert!(store.get("drop").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn concurrent_upserts_keep_one_entry() {
        let store = Arc::new(MemoryAnalysisStore::new());

        let mut handles = Vec::new();
        for _ in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.upsert(&payload("raced"), 60).await.unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(store.entries.len(), 1);
        assert!(store.get("raced").await.unwrap().is_some());
    }
}

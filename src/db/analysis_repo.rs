use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::cache::AnalysisStore;
use crate::models::{AnalysisPayload, CacheEntry};

/// Database row for the analysis_cache table. The payload is stored as
/// serialized JSON and decoded at the edge.
#[derive(Debug, Clone, FromRow)]
struct CacheRow {
    id: Uuid,
    slug: String,
    payload: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    ttl_minutes: i64,
    hit_count: i64,
    last_accessed_at: DateTime<Utc>,
}

impl CacheRow {
    fn into_entry(self) -> anyhow::Result<CacheEntry> {
        let payload: AnalysisPayload = serde_json::from_str(&self.payload)?;
        Ok(CacheEntry {
            id: self.id,
            slug: self.slug,
            payload,
            created_at: self.created_at,
            expires_at: self.expires_at,
            ttl_minutes: self.ttl_minutes,
            hit_count: self.hit_count,
            last_accessed_at: self.last_accessed_at,
        })
    }
}

/// Postgres-backed cache store. The slug has a unique index; the
/// `ON CONFLICT` upsert is the store's native atomic replace, so concurrent
/// misses for the same slug resolve last-writer-wins.
#[derive(Debug, Clone)]
pub struct PgAnalysisStore {
    pool: PgPool,
}

impl PgAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AnalysisStore for PgAnalysisStore {
    async fn get(&self, slug: &str) -> anyhow::Result<Option<CacheEntry>> {
        let row = sqlx::query_as::<_, CacheRow>(
            "SELECT * FROM analysis_cache WHERE slug = $1",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CacheRow::into_entry).transpose()
    }

    async fn upsert(
        &self,
        payload: &AnalysisPayload,
        ttl_minutes: i64,
    ) -> anyhow::Result<CacheEntry> {
        let now = Utc::now();
        let expires_at = now + Duration::minutes(ttl_minutes);
        let serialized = serde_json::to_string(payload)?;

        let row = sqlx::query_as::<_, CacheRow>(
            r#"
            INSERT INTO analysis_cache
                (slug, payload, created_at, expires_at, ttl_minutes, hit_count, last_accessed_at)
            VALUES ($1, $2, $3, $4, $5, 0, $3)
            ON CONFLICT (slug) DO UPDATE
            SET payload = EXCLUDED.payload,
                created_at = EXCLUDED.created_at,
                expires_at = EXCLUDED.expires_at,
                ttl_minutes = EXCLUDED.ttl_minutes,
                hit_count = 0,
                last_accessed_at = EXCLUDED.last_accessed_at
            RETURNING *
            "#,
        )
        .bind(&payload.slug)
        .bind(&serialized)
        .bind(now)
        .bind(expires_at)
        .bind(ttl_minutes)
        .fetch_one(&self.pool)
        .await?;

        row.into_entry()
    }

    async fn record_hit(&self, slug: &str) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE analysis_cache
            SET hit_count = hit_count + 1, last_accessed_at = $2
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_cooldown(&self, slug: &str, cooldown_minutes: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE analysis_cache SET expires_at = $2 WHERE slug = $1")
            .bind(slug)
            .bind(Utc::now() + Duration::minutes(cooldown_minutes))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM analysis_cache WHERE expires_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

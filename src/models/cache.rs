use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::AnalysisPayload;

/// One cached analysis, keyed by event slug (unique). Entries are replaced
/// on recompute and expire passively; a sweeper deletes long-expired rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub id: Uuid,
    pub slug: String,
    pub payload: AnalysisPayload,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ttl_minutes: i64,
    pub hit_count: i64,
    pub last_accessed_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn age_minutes(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created_at).num_minutes().max(0)
    }

    /// Minutes until the entry may be recomputed; 0 once expired.
    pub fn refresh_available_in(&self, now: DateTime<Utc>) -> i64 {
        (self.expires_at - now).num_minutes().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::analysis::AnalysisPayload;
    use crate::models::event::EventType;
    use chrono::Duration;

    fn make_entry(now: DateTime<Utc>, ttl_minutes: i64) -> CacheEntry {
        CacheEntry {
            id: Uuid::new_v4(),
            slug: "test-event".into(),
            payload: AnalysisPayload {
                slug: "test-event".into(),
                title: "Test Event".into(),
                category: "Test".into(),
                event_type: EventType::Other,
                time_to_resolution_hours: 24.0,
                options: vec![],
                computed_at: now,
            },
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
            ttl_minutes,
            hit_count: 0,
            last_accessed_at: now,
        }
    }

    #[test]
    fn fresh_until_expiry() {
        let now = Utc::now();
        let entry = make_entry(now, 60);

        assert!(entry.is_fresh(now));
        assert!(entry.is_fresh(now + Duration::minutes(59)));
        assert!(!entry.is_fresh(now + Duration::minutes(60)));
        assert!(!entry.is_fresh(now + Duration::minutes(61)));
    }

    #[test]
    fn age_and_refresh_window() {
        let now = Utc::now();
        let entry = make_entry(now, 60);
        let later = now + Duration::minutes(25);

        assert_eq!(entry.age_minutes(later), 25);
        assert_eq!(entry.refresh_available_in(later), 35);

        let past_expiry = now + Duration::minutes(90);
        assert_eq!(entry.refresh_available_in(past_expiry), 0);
    }
}

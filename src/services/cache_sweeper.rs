use std::sync::Arc;

use chrono::{Duration, Utc};
use metrics::counter;
use tokio::time::interval;

use crate::cache::AnalysisStore;

/// Periodically delete cache entries that expired more than `grace_minutes`
/// ago. Expiry itself is passive (checked at read time); this loop is the
/// housekeeping backstop that keeps the table from growing unbounded.
pub async fn run_cache_sweeper(
    store: Arc<dyn AnalysisStore>,
    interval_secs: u64,
    grace_minutes: i64,
) {
    tracing::info!(
        interval_secs = interval_secs,
        grace_minutes = grace_minutes,
        "Cache sweeper started"
    );

    let mut ticker = interval(std::time::Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        let cutoff = Utc::now() - Duration::minutes(grace_minutes);
        match store.delete_expired_before(cutoff).await {
            Ok(0) => {
                tracing::debug!("Cache sweeper: nothing to remove");
            }
            Ok(removed) => {
                counter!("cache_entries_swept_total").increment(removed);
                tracing::info!(removed = removed, "Cache sweeper removed expired entries");
            }
            Err(e) => {
                tracing::error!(error = %e, "Cache sweeper pass failed");
            }
        }
    }
}

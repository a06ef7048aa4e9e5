use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use metrics::{counter, histogram};

use crate::cache::{ttl_minutes, AnalysisStore};
use crate::engine::{blend, BlendInput};
use crate::errors::AnalysisError;
use crate::models::{AnalysisPayload, AnalysisResponse, CacheEntry};
use crate::normalizer::{normalize_event, whale_walls};
use crate::signals::SignalCollector;
use crate::sources::{MarketSource, SourceError};

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Hard outer deadline for one analysis.
    pub deadline: std::time::Duration,
    /// Refresh window applied after a rate-limited recompute failure.
    pub rate_limit_cooldown_minutes: i64,
}

/// The analysis pipeline: cache lookup, normalization, signal collection,
/// blending, cache upsert. Holds no per-request state; the cache store is
/// the only shared mutable surface.
pub struct Analyzer {
    market: Arc<dyn MarketSource>,
    collector: SignalCollector,
    store: Arc<dyn AnalysisStore>,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(
        market: Arc<dyn MarketSource>,
        collector: SignalCollector,
        store: Arc<dyn AnalysisStore>,
        config: AnalyzerConfig,
    ) -> Self {
        Self {
            market,
            collector,
            store,
            config,
        }
    }

    /// Analyze an event by slug or polymarket.com URL.
    ///
    /// Fresh cache entries short-circuit recomputation, forced or not. An
    /// expired entry triggers a recompute; if that fails the expired payload
    /// is served stale, with a cooldown on the next attempt when the failure
    /// was a rate limit. Only a fully computed result is ever persisted.
    pub async fn analyze(
        &self,
        slug_or_url: &str,
        force_refresh: bool,
    ) -> Result<AnalysisResponse, AnalysisError> {
        // Input validation happens before any cache interaction.
        let slug = parse_slug(slug_or_url)?;

        counter!("analysis_requests_total").increment(1);
        let started = Instant::now();

        let existing = self
            .store
            .get(&slug)
            .await
            .map_err(AnalysisError::Store)?;

        let now = Utc::now();
        if let Some(entry) = &existing {
            if entry.is_fresh(now) {
                if force_refresh {
                    tracing::debug!(slug = %slug, "Refresh rejected: entry still fresh");
                }
                counter!("cache_hits_total").increment(1);
                self.store
                    .record_hit(&slug)
                    .await
                    .map_err(AnalysisError::Store)?;
                return Ok(hit_response(entry, now));
            }
        }

        match self.compute(&slug).await {
            Ok(payload) => {
                let ttl = payload_ttl(&payload);
                let entry = self
                    .store
                    .upsert(&payload, ttl)
                    .await
                    .map_err(AnalysisError::Store)?;

                counter!("cache_misses_total").increment(1);
                histogram!("analysis_latency_seconds").record(started.elapsed().as_secs_f64());
                tracing::info!(
                    slug = %slug,
                    options = entry.payload.options.len(),
                    ttl_minutes = ttl,
                    "Analysis computed"
                );

                Ok(miss_response(&entry, Utc::now()))
            }
            Err(e) => self.serve_stale(&slug, existing, e).await,
        }
    }

    /// Cache bookkeeping for a slug without triggering a recompute.
    pub async fn cache_info(&self, slug_or_url: &str) -> Result<Option<CacheEntry>, AnalysisError> {
        let slug = parse_slug(slug_or_url)?;
        self.store.get(&slug).await.map_err(AnalysisError::Store)
    }

    /// Fallback path: a failed recompute serves the previous entry when one
    /// exists, annotated as stale. Without one the failure propagates.
    async fn serve_stale(
        &self,
        slug: &str,
        existing: Option<CacheEntry>,
        error: AnalysisError,
    ) -> Result<AnalysisResponse, AnalysisError> {
        let Some(entry) = existing else {
            counter!("analysis_failures_total").increment(1);
            return Err(error);
        };

        counter!("stale_serves_total").increment(1);
        self.store
            .record_hit(slug)
            .await
            .map_err(AnalysisError::Store)?;

        let now = Utc::now();
        let mut response = hit_response(&entry, now);
        response.stale = true;

        if error.is_rate_limit() {
            counter!("rate_limited_total").increment(1);
            let cooldown = self.config.rate_limit_cooldown_minutes;
            self.store
                .set_cooldown(slug, cooldown)
                .await
                .map_err(AnalysisError::Store)?;
            response.expires_at = now + chrono::Duration::minutes(cooldown);
            response.refresh_available_in = cooldown;
            response.rate_limit_warning = Some(format!(
                "rate limited upstream; next refresh in {cooldown} minutes"
            ));
        }

        tracing::warn!(
            slug = %slug,
            error = %error,
            rate_limited = error.is_rate_limit(),
            "Recompute failed, serving stale cache entry"
        );

        Ok(response)
    }

    /// Full recompute under the outer deadline. A cancelled computation
    /// never reaches the upsert in `analyze`.
    async fn compute(&self, slug: &str) -> Result<AnalysisPayload, AnalysisError> {
        let deadline = self.config.deadline;
        match tokio::time::timeout(deadline, self.compute_inner(slug)).await {
            Ok(result) => result,
            Err(_) => {
                counter!("upstream_failures_total").increment(1);
                Err(AnalysisError::DeadlineExceeded(deadline.as_secs()))
            }
        }
    }

    async fn compute_inner(&self, slug: &str) -> Result<AnalysisPayload, AnalysisError> {
        let raw = self
            .market
            .fetch_event(slug)
            .await
            .map_err(|e| map_market_error(slug, e))?;

        let mut event = normalize_event(slug, &raw)?;
        event.event_metrics.whale_data = self.fetch_whale_data(&raw).await;

        let signals = self.collector.collect(&mut event).await;

        let options = event
            .options
            .iter()
            .map(|option| {
                let market_probability = option.market_probability();
                let vectors = signals
                    .vectors
                    .get(&option.name)
                    .copied()
                    .unwrap_or_else(|| {
                        crate::models::SignalVector::neutral(market_probability as f64)
                    });

                blend(
                    event.event_type,
                    BlendInput {
                        option: option.name.clone(),
                        market_probability,
                        image: option.image.clone(),
                        vectors,
                    },
                    signals.model_rationale.as_deref(),
                )
            })
            .collect();

        Ok(AnalysisPayload {
            slug: event.slug.clone(),
            title: event.title.clone(),
            category: event.category.clone(),
            event_type: event.event_type,
            time_to_resolution_hours: event.time_to_resolution_hours,
            options,
            computed_at: Utc::now(),
        })
    }

    /// Order-book whale signal for the event's lead market. Book problems
    /// degrade to no signal, never to a failed analysis.
    async fn fetch_whale_data(
        &self,
        raw: &crate::polymarket::RawEvent,
    ) -> Option<crate::models::WhaleData> {
        let token_id = raw
            .markets
            .first()
            .map(|m| m.parse_token_ids())
            .and_then(|ids| ids.into_iter().next())?;

        match self.market.fetch_order_book(&token_id).await {
            Ok(book) => Some(whale_walls(&book)),
            Err(e) => {
                counter!("signal_failures_total").increment(1);
                tracing::warn!(
                    token_id = %token_id,
                    error = %e,
                    "Order book unavailable, skipping whale signal"
                );
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Recompute the TTL the payload was stored under. The inputs all live on
/// the payload, so a recompute always re-derives a consistent value.
fn payload_ttl(payload: &AnalysisPayload) -> i64 {
    ttl_minutes(
        payload.time_to_resolution_hours,
        &payload.category,
        payload.event_type,
    )
}

fn hit_response(entry: &CacheEntry, now: chrono::DateTime<Utc>) -> AnalysisResponse {
    AnalysisResponse {
        options: entry.payload.options.clone(),
        title: entry.payload.title.clone(),
        event_type: entry.payload.event_type,
        cached: true,
        cached_at: entry.created_at,
        expires_at: entry.expires_at,
        cache_age_minutes: entry.age_minutes(now),
        ttl_minutes: entry.ttl_minutes,
        refresh_available_in: entry.refresh_available_in(now),
        rate_limit_warning: None,
        stale: false,
    }
}

fn miss_response(entry: &CacheEntry, now: chrono::DateTime<Utc>) -> AnalysisResponse {
    AnalysisResponse {
        cached: false,
        ..hit_response(entry, now)
    }
}

fn map_market_error(slug: &str, e: SourceError) -> AnalysisError {
    counter!("upstream_failures_total").increment(1);
    match e {
        SourceError::NotFound(_) => AnalysisError::NoMarketsFound(slug.to_string()),
        SourceError::RateLimited(msg) => AnalysisError::RateLimited(msg),
        other => AnalysisError::UpstreamUnavailable(other.to_string()),
    }
}

/// Accepts a bare event slug or a polymarket.com event URL. Anything else
/// is rejected before the cache is touched.
pub fn parse_slug(input: &str) -> Result<String, AnalysisError> {
    let trimmed = input.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidSlug("empty input".into()));
    }

    let candidate = if let Some(idx) = trimmed.find("/event/") {
        trimmed[idx + "/event/".len()..]
            .split(['/', '?', '#'])
            .next()
            .unwrap_or("")
    } else if trimmed.contains('/') {
        // A URL that isn't an event page.
        return Err(AnalysisError::InvalidSlug(trimmed.to_string()));
    } else {
        trimmed
    };

    let valid = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(AnalysisError::InvalidSlug(trimmed.to_string()));
    }

    Ok(candidate.to_lowercase())
}

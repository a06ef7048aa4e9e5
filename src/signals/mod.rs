pub mod momentum;
pub mod news;

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;

use crate::models::{MarketEvent, SignalVector};
use crate::sources::{ModelEstimate, ModelSource, NewsSource, SocialSource, SourceError};

pub use momentum::momentum_score;
pub use news::news_score;

/// Options ranked below this cutoff get neutral vectors instead of live
/// news/social lookups.
const LIVE_SIGNAL_OPTION_LIMIT: usize = 3;

#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Per-upstream-call timeout.
    pub call_timeout: Duration,
    /// Delay between successive social-sentiment calls (adapter rate limit).
    pub social_pacing: Duration,
}

/// Everything the collector gathered for one event.
#[derive(Debug, Clone, Default)]
pub struct CollectedSignals {
    /// Option name → signal vector. Covers every option in the event.
    pub vectors: HashMap<String, SignalVector>,
    pub model_rationale: Option<String>,
}

/// Gathers per-option signal vectors from the news, social, and model
/// sources. Every upstream failure is absorbed into a neutral score; the
/// collector itself never fails.
pub struct SignalCollector {
    news: Arc<dyn NewsSource>,
    social: Arc<dyn SocialSource>,
    model: Option<Arc<dyn ModelSource>>,
    config: CollectorConfig,
}

impl SignalCollector {
    pub fn new(
        news: Arc<dyn NewsSource>,
        social: Arc<dyn SocialSource>,
        model: Option<Arc<dyn ModelSource>>,
        config: CollectorConfig,
    ) -> Self {
        Self {
            news,
            social,
            model,
            config,
        }
    }

    /// Collect vectors for all options of `event`. Articles and social
    /// signals end up on the event itself; the returned map carries one
    /// vector per option name.
    pub async fn collect(&self, event: &mut MarketEvent) -> CollectedSignals {
        let estimate = self.fetch_model_estimate(event).await;

        let articles = self.fetch_articles(event).await;
        event.news_articles = Some(articles.clone());

        let live_options: HashSet<String> = event
            .ranked_options()
            .into_iter()
            .take(LIVE_SIGNAL_OPTION_LIMIT)
            .map(|o| o.name.clone())
            .collect();

        let whale_data = event.event_metrics.whale_data;
        let mut vectors = HashMap::with_capacity(event.options.len());
        let mut social_calls = 0u32;

        for option in &event.options {
            let market_probability = option.market_probability() as f64;

            if !live_options.contains(&option.name) {
                vectors.insert(option.name.clone(), SignalVector::neutral(market_probability));
                continue;
            }

            let core_ai_score = estimate
                .as_ref()
                .and_then(|e| e.scores.get(&option.name).copied())
                .unwrap_or(market_probability)
                .clamp(0.0, 100.0);

            // Pace successive social calls to respect the adapter's rate
            // limit; the first call goes out immediately.
            if social_calls > 0 {
                tokio::time::sleep(self.config.social_pacing).await;
            }
            social_calls += 1;

            let social = match self
                .with_timeout(self.social.fetch_sentiment(
                    &option.name,
                    &event.title,
                    event.event_type,
                ))
                .await
            {
                Ok(signal) => signal,
                Err(e) => {
                    counter!("signal_failures_total").increment(1);
                    tracing::warn!(
                        option = %option.name,
                        error = %e,
                        "Social sentiment unavailable, using neutral score"
                    );
                    Default::default()
                }
            };

            vectors.insert(
                option.name.clone(),
                SignalVector {
                    core_ai_score,
                    news_score: news_score(&option.name, &articles),
                    momentum_score: momentum_score(option, whale_data),
                    social_score: social.score,
                },
            );
            event.social_data.insert(option.name.clone(), social);
        }

        CollectedSignals {
            vectors,
            model_rationale: estimate.and_then(|e| e.rationale),
        }
    }

    async fn fetch_model_estimate(&self, event: &MarketEvent) -> Option<ModelEstimate> {
        let model = self.model.as_ref()?;

        match self.with_timeout(model.estimate(event)).await {
            Ok(estimate) => Some(estimate),
            Err(e) => {
                counter!("signal_failures_total").increment(1);
                tracing::warn!(
                    slug = %event.slug,
                    error = %e,
                    "Model estimate unavailable, falling back to market price"
                );
                None
            }
        }
    }

    async fn fetch_articles(&self, event: &MarketEvent) -> Vec<crate::models::NewsArticle> {
        match self
            .with_timeout(self.news.fetch_news(&event.title, event.event_type))
            .await
        {
            Ok(articles) => articles,
            Err(e) => {
                counter!("signal_failures_total").increment(1);
                tracing::warn!(
                    slug = %event.slug,
                    error = %e,
                    "News fetch failed, scoring without articles"
                );
                Vec::new()
            }
        }
    }

    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, SourceError>
    where
        F: Future<Output = Result<T, SourceError>>,
    {
        match tokio::time::timeout(self.config.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.config.call_timeout)),
        }
    }
}

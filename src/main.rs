use std::sync::Arc;

use polysight::api::create_router;
use polysight::cache::AnalysisStore;
use polysight::config::AppConfig;
use polysight::db::{self, PgAnalysisStore};
use polysight::polymarket::{ClobClient, GammaClient, PolymarketSource};
use polysight::services::{run_cache_sweeper, Analyzer, AnalyzerConfig};
use polysight::signals::{CollectorConfig, SignalCollector};
use polysight::sources::{
    ModelApiClient, ModelSource, NewsApiClient, NewsSource, SocialApiClient, SocialSource,
};
use polysight::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let addr = format!("{}:{}", config.host, config.port);

    let metrics_handle = polysight::metrics::init_metrics();

    tracing::info!("Connecting to database...");
    let pool = db::init_pool(&config.database_url).await?;
    tracing::info!("Database connected");

    let store: Arc<dyn AnalysisStore> = Arc::new(PgAnalysisStore::new(pool));

    let http = reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()?;

    let market = Arc::new(PolymarketSource::new(
        GammaClient::new(http.clone(), config.gamma_api_url.clone()),
        ClobClient::new(http.clone(), config.clob_api_url.clone()),
    ));

    let news: Arc<dyn NewsSource> = match (&config.news_api_url, &config.news_api_key) {
        (Some(url), Some(key)) => {
            Arc::new(NewsApiClient::new(http.clone(), url.clone(), key.clone()))
        }
        _ => {
            tracing::warn!("NEWS_API_URL/NEWS_API_KEY not set, news scores will be neutral");
            Arc::new(NeutralNews)
        }
    };

    let social: Arc<dyn SocialSource> = match &config.social_api_url {
        Some(url) => Arc::new(SocialApiClient::new(http.clone(), url.clone())),
        None => {
            tracing::warn!("SOCIAL_API_URL not set, social scores will be neutral");
            Arc::new(NeutralSocial)
        }
    };

    let model: Option<Arc<dyn ModelSource>> = config.model_api_url.as_ref().map(|url| {
        Arc::new(ModelApiClient::new(
            http.clone(),
            url.clone(),
            config.model_api_key.clone(),
        )) as Arc<dyn ModelSource>
    });
    if model.is_none() {
        tracing::warn!("MODEL_API_URL not set, core scores fall back to market prices");
    }

    let collector = SignalCollector::new(
        news,
        social,
        model,
        CollectorConfig {
            call_timeout: config.upstream_timeout(),
            social_pacing: config.social_pacing(),
        },
    );

    let analyzer = Arc::new(Analyzer::new(
        market,
        collector,
        store.clone(),
        AnalyzerConfig {
            deadline: config.analysis_deadline(),
            rate_limit_cooldown_minutes: config.rate_limit_cooldown_minutes,
        },
    ));

    // Housekeeping backstop for passively expired cache entries.
    {
        let store = store.clone();
        let interval_secs = config.sweeper_interval_secs;
        let grace_minutes = config.sweeper_grace_minutes;
        tokio::spawn(async move {
            run_cache_sweeper(store, interval_secs, grace_minutes).await;
        });
    }

    let state = AppState {
        analyzer,
        store,
        config,
        metrics_handle,
    };
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();
}

// ---------------------------------------------------------------------------
// Neutral fallback adapters for unconfigured signal sources
// ---------------------------------------------------------------------------

struct NeutralNews;

#[async_trait::async_trait]
impl NewsSource for NeutralNews {
    async fn fetch_news(
        &self,
        _query: &str,
        _event_type: polysight::models::EventType,
    ) -> Result<Vec<polysight::models::NewsArticle>, polysight::sources::SourceError> {
        Ok(Vec::new())
    }
}

struct NeutralSocial;

#[async_trait::async_trait]
impl SocialSource for NeutralSocial {
    async fn fetch_sentiment(
        &self,
        _option: &str,
        _event_title: &str,
        _event_type: polysight::models::EventType,
    ) -> Result<polysight::models::SocialSignal, polysight::sources::SourceError> {
        Ok(polysight::models::SocialSignal::default())
    }
}

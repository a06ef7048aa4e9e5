use std::env;
use std::time::Duration;

const DEFAULT_GAMMA_URL: &str = "https://gamma-api.polymarket.com";
const DEFAULT_CLOB_URL: &str = "https://clob.polymarket.com";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,

    // Upstream endpoints
    pub gamma_api_url: String,
    pub clob_api_url: String,
    pub news_api_url: Option<String>,
    pub news_api_key: Option<String>,
    pub social_api_url: Option<String>,
    pub model_api_url: Option<String>,
    pub model_api_key: Option<String>,

    // Timeouts and pacing
    pub upstream_timeout_secs: u64,
    pub social_pacing_ms: u64,
    pub analysis_deadline_secs: u64,

    // Cache policy
    pub rate_limit_cooldown_minutes: i64,
    pub sweeper_interval_secs: u64,
    pub sweeper_grace_minutes: i64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            gamma_api_url: env::var("GAMMA_API_URL")
                .unwrap_or_else(|_| DEFAULT_GAMMA_URL.into()),
            clob_api_url: env::var("CLOB_API_URL")
                .unwrap_or_else(|_| DEFAULT_CLOB_URL.into()),
            news_api_url: env::var("NEWS_API_URL").ok(),
            news_api_key: env::var("NEWS_API_KEY").ok(),
            social_api_url: env::var("SOCIAL_API_URL").ok(),
            model_api_url: env::var("MODEL_API_URL").ok(),
            model_api_key: env::var("MODEL_API_KEY").ok(),

            upstream_timeout_secs: parse_env("UPSTREAM_TIMEOUT_SECS", 10),
            social_pacing_ms: parse_env("SOCIAL_PACING_MS", 500),
            analysis_deadline_secs: parse_env("ANALYSIS_DEADLINE_SECS", 90),

            rate_limit_cooldown_minutes: parse_env("RATE_LIMIT_COOLDOWN_MINUTES", 5),
            sweeper_interval_secs: parse_env("SWEEPER_INTERVAL_SECS", 600),
            sweeper_grace_minutes: parse_env("SWEEPER_GRACE_MINUTES", 1440),
        })
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    pub fn social_pacing(&self) -> Duration {
        Duration::from_millis(self.social_pacing_ms)
    }

    pub fn analysis_deadline(&self) -> Duration {
        Duration::from_secs(self.analysis_deadline_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

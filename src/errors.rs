use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failure taxonomy for the analysis pipeline.
///
/// Only `InvalidSlug`, and `UpstreamUnavailable`/`RateLimited` with no cache
/// entry to fall back on, ever reach a caller; signal-adapter failures are
/// absorbed into neutral vectors by the collector.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("invalid slug or URL: {0}")]
    InvalidSlug(String),

    #[error("no markets found for event: {0}")]
    NoMarketsFound(String),

    #[error("market source unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("rate limited by upstream: {0}")]
    RateLimited(String),

    #[error("analysis deadline exceeded after {0}s")]
    DeadlineExceeded(u64),

    #[error("cache store error: {0}")]
    Store(#[source] anyhow::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AnalysisError {
    /// Rate-limit failures get the shortened refresh cooldown on stale-serve.
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, AnalysisError::RateLimited(_))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AnalysisError::InvalidSlug(msg) => {
                (StatusCode::BAD_REQUEST, format!("invalid slug or URL: {msg}"))
            }
            AnalysisError::NoMarketsFound(slug) => {
                (StatusCode::NOT_FOUND, format!("no markets found for event: {slug}"))
            }
            AnalysisError::UpstreamUnavailable(msg) => {
                (StatusCode::BAD_GATEWAY, format!("market source unavailable: {msg}"))
            }
            AnalysisError::RateLimited(msg) => {
                (StatusCode::TOO_MANY_REQUESTS, format!("rate limited: {msg}"))
            }
            AnalysisError::DeadlineExceeded(secs) => (
                StatusCode::GATEWAY_TIMEOUT,
                format!("analysis deadline exceeded after {secs}s"),
            ),
            AnalysisError::Store(e) => {
                tracing::error!("Cache store error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
            AnalysisError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AnalysisError {
    fn from(e: sqlx::Error) -> Self {
        AnalysisError::Store(e.into())
    }
}

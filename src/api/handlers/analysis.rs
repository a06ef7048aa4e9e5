use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AnalysisError;
use crate::models::AnalysisResponse;
use crate::AppState;

use super::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct AnalyzeParams {
    /// Request a recompute. Honored only once the cached entry has expired.
    #[serde(default)]
    refresh: bool,
}

pub async fn analyze(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<AnalyzeParams>,
) -> Result<Json<ApiResponse<AnalysisResponse>>, AnalysisError> {
    let result = state.analyzer.analyze(&slug, params.refresh).await?;
    Ok(Json(ApiResponse::ok(result)))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub slug: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub ttl_minutes: i64,
    pub hit_count: i64,
    pub last_accessed_at: DateTime<Utc>,
    pub fresh: bool,
    pub cache_age_minutes: i64,
}

pub async fn cache_info(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CacheInfo>>, StatusCode> {
    match state.analyzer.cache_info(&slug).await {
        Ok(Some(entry)) => {
            let now = Utc::now();
            Ok(Json(ApiResponse::ok(CacheInfo {
                slug: entry.slug.clone(),
                created_at: entry.created_at,
                expires_at: entry.expires_at,
                ttl_minutes: entry.ttl_minutes,
                hit_count: entry.hit_count,
                last_accessed_at: entry.last_accessed_at,
                fresh: entry.is_fresh(now),
                cache_age_minutes: entry.age_minutes(now),
            })))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(AnalysisError::InvalidSlug(_)) => Err(StatusCode::BAD_REQUEST),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

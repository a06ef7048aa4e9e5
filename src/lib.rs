pub mod api;
pub mod cache;
pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod normalizer;
pub mod polymarket;
pub mod services;
pub mod signals;
pub mod sources;

use std::sync::Arc;

use crate::cache::AnalysisStore;
use crate::config::AppConfig;
use crate::services::Analyzer;

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub store: Arc<dyn AnalysisStore>,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
}

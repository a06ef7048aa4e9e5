use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("analysis_requests_total").absolute(0);
    counter!("analysis_failures_total").absolute(0);
    counter!("cache_hits_total").absolute(0);
    counter!("cache_misses_total").absolute(0);
    counter!("stale_serves_total").absolute(0);
    counter!("rate_limited_total").absolute(0);
    counter!("signal_failures_total").absolute(0);
    counter!("upstream_failures_total").absolute(0);
    counter!("cache_entries_swept_total").absolute(0);

    // Histogram is lazily created on first record; force creation.
    histogram!("analysis_latency_seconds").record(0.0);

    handle
}

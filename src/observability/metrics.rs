use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, IntGaugeVec, Opts, Registry};
use tracing::info;
use std::sync::Arc;
use tokio::sync::OnceCell;


// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the static `Metrics`.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE.get_or_init(|| async {
        info!("Initializing Metrics ...");
        Metrics::new()}
    ).await
}


#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Upstream metrics
    pub upstream_requests: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub upstream_duration: HistogramVec,

    // Token metrics
    pub token_acquisitions: IntCounter,
    pub token_acquisition_failures: IntCounter,
    pub token_expiry_unix: IntGauge,

    // Cache metrics
    pub cache_lookups: IntCounterVec,
    pub cache_entries: IntGaugeVec,
    pub hydration_dropped: IntCounter,

    // Config/runtime
    pub config_validation_errors: IntCounter,
    pub up: IntGauge,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("qurangateway".into()), None)
            .unwrap_or_default();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Upstream
            upstream_requests: IntCounterVec::new(Opts::new("upstream_requests_total", "Total upstream calls by endpoint"), &["endpoint"]).expect("valid metric"),
            upstream_failures: IntCounterVec::new(Opts::new("upstream_failures_total", "Upstream failures by reason"), &["endpoint", "reason"]).expect("valid metric"),
            upstream_duration: HistogramVec::new(HistogramOpts::new("upstream_duration_seconds", "Upstream call duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]), &["endpoint"]).expect("valid metric"),

            // Token
            token_acquisitions: IntCounter::new("token_acquisitions_total", "Successful client-credentials exchanges").expect("valid metric"),
            token_acquisition_failures: IntCounter::new("token_acquisition_failures_total", "Failed client-credentials exchanges").expect("valid metric"),
            token_expiry_unix: IntGauge::new("token_expiry_unix_seconds", "Current token expiry timestamp").expect("valid metric"),

            // Cache
            cache_lookups: IntCounterVec::new(Opts::new("cache_lookups_total", "Verse cache lookups by outcome"), &["kind", "outcome"]).expect("valid metric"),
            cache_entries: IntGaugeVec::new(Opts::new("cache_entries", "Verse cache entries after last sweep"), &["kind"]).expect("valid metric"),
            hydration_dropped: IntCounter::new("hydration_dropped_total", "Verses dropped from search results after a failed detail fetch").expect("valid metric"),

            // Config/runtime
            config_validation_errors: IntCounter::new("config_validation_errors_total", "Validation errors during startup").expect("valid metric"),
            up: IntGauge::new("up", "1 if service is healthy").expect("valid metric"),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
            Box::new(metrics.upstream_requests.clone()),
            Box::new(metrics.upstream_failures.clone()),
            Box::new(metrics.upstream_duration.clone()),
            Box::new(metrics.token_acquisitions.clone()),
            Box::new(metrics.token_acquisition_failures.clone()),
            Box::new(metrics.token_expiry_unix.clone()),
            Box::new(metrics.cache_lookups.clone()),
            Box::new(metrics.cache_entries.clone()),
            Box::new(metrics.hydration_dropped.clone()),
            Box::new(metrics.config_validation_errors.clone()),
            Box::new(metrics.up.clone()),
        ];
        for collector in collectors {
            if let Err(e) = reg.register(collector) {
                tracing::warn!("metric registration failed: {}", e);
            }
        }

        metrics
    }
}

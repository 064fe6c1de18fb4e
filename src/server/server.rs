use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tracing::info;

use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::retrieval::verses::VerseService;
use crate::server::{health, verses};
use crate::sources::oauth2::TokenManager;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub verses: Arc<VerseService>,
    pub tokens: Arc<TokenManager>,
    /// translation ids used when a request names none
    pub default_translations: Arc<str>,
}

impl AppState {
    pub fn new(
        metrics: &Metrics,
        verses: Arc<VerseService>,
        tokens: Arc<TokenManager>,
        default_translations: &str,
    ) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            verses,
            tokens,
            default_translations: Arc::from(default_translations),
        }
    }
}

/// All gateway routes bound to `state`.
pub fn router(settings_config: &SettingsConfig, state: AppState) -> Router {
    Router::new()
        .route("/api/quran/search", get(verses::search_verses))
        .route("/api/quran/verses/{reference}", get(verses::verse_details))
        .route("/api/quran/health", get(health::health))
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
}

/// Serve the gateway until the listener fails.
pub async fn start(settings_config: &SettingsConfig, state: AppState) -> Result<()> {
    let metrics = get_metrics().await;
    let app = router(settings_config, state);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("listening on {}:{}", bind_addr, port);
    metrics.up.set(1);
    axum::serve(listener, app).await?;
    metrics.up.set(0);

    Ok(())
}

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use quran_gateway::cache::verse_cache::VerseCache;
use quran_gateway::observability::metrics::get_metrics;
use quran_gateway::retrieval::verses::VerseService;
use quran_gateway::server;
use quran_gateway::server::server::AppState;
use quran_gateway::sources::build_upstream_client;
use quran_gateway::sources::content::ContentApi;
use quran_gateway::sources::oauth2::TokenManager;
use quran_gateway::utils::config_loader;
use quran_gateway::utils::logging;
use quran_gateway::utils::logging::LogLevel;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config; without it the built-in template reads QURAN_* variables
    #[arg(short, long, env = "CONFIG")]
    config: Option<String>,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(args.config.as_deref()).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 2. Create request client
    // -------------------------------

    let upstream = &service_config.upstream;
    let client = build_upstream_client(upstream)?;

    // -------------------------------
    // 3. Token manager, content API, verse cache
    // -------------------------------

    let tokens = Arc::new(TokenManager::from_config(upstream, client.clone()));
    let content = ContentApi::new(client, &tokens.endpoints().api_base_url, tokens.client_id());
    let cache = VerseCache::new(Duration::from_secs(service_config.cache.ttl_seconds));
    let verses = Arc::new(VerseService::new(tokens.clone(), content, cache.clone(), &upstream.language));

    // -------------------------------
    // 4. Background workers
    // -------------------------------

    let sweeper = cache.loop_sweep_expired(service_config.cache.sweep_interval_seconds);
    let refresher = async {
        if upstream.background_refresh {
            tokens.clone().loop_refresh_token().await
        } else {
            Ok(())
        }
    };

    // -------------------------------
    // 5. Start http server
    // -------------------------------

    let state = AppState::new(get_metrics().await, verses, tokens.clone(), &upstream.default_translations);
    let http_server = server::server::start(&service_config.settings, state);

    info!(environment = tokens.environment().as_str(), "Service starting...");
    tokio::try_join!(sweeper, refresher, http_server)?;

    Ok(())
}

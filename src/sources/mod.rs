//! Upstream clients: authorization server and content API.

pub mod content;
pub mod environment;
pub mod oauth2;

use std::time::Duration;

use anyhow::Result;
use reqwest::Client;

use crate::config::upstream::UpstreamConfig;

/// Shared HTTP client; every outbound call carries the configured timeout.
pub fn build_upstream_client(cfg: &UpstreamConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_millis(cfg.timeout_ms))
        .build()?)
}

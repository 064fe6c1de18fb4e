use std::{fs, path::Path};
use crate::config::settings::{LogFormat, LoggingConfig};
use crate::config::upstream::ServiceConfig;
use crate::observability::metrics::get_metrics;
use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};
use crate::config::proc_validator;

/// Config used when no file is given: credentials and environment come from the process env.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"
settings:
  server:
    host: 0.0.0.0
    port: "${PORT:8080}"
  metrics:
    is_enabled: true
    path: /metrics
  logging:
    level: info
    format: compact
upstream:
  environment: ${QURAN_ENV:prelive}
  client_id: "${QURAN_CLIENT_ID}"
  client_secret: "${QURAN_CLIENT_SECRET}"
  scope: content
  timeout_ms: 5000
  safety_margin_seconds: 30
  language: en
  default_translations: "131"
cache:
  ttl_seconds: 86400
  sweep_interval_seconds: 600
"#;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)?;
    parse_config(expand_env_vars(&content)?).await
}

/// Build config from the built-in template
pub async fn default_config() -> Result<ServiceConfig> {
    parse_config(expand_env_vars(DEFAULT_CONFIG_TEMPLATE)?).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| {
            error!("parse config error: {}", e);
            metrics.config_validation_errors.inc();
        })?;

    // Apply defaults
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig::new("info".to_owned(), LogFormat::Compact));
    }

    debug!("validation config ...");
    proc_validator::validate_service_config(&service_config)
        .await
        .map_err(|errors| anyhow!("config is not valid: {}", errors.join("; ")))?;

    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with values from the environment.
pub fn expand_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}")?;
    Ok(re
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string())
}

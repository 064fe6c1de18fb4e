//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates server / metrics / logging invariants
//! - Validates upstream credentials, timeouts and translation defaults
//! - Validates cache retention

use regex::Regex;
use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::upstream::{CacheConfig, ServiceConfig, UpstreamConfig};
use crate::observability::metrics::get_metrics;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_upstream(&cfg.upstream, &mut errors);
    validate_cache(&cfg.cache, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc();
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    if settings.server.host.is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 0-65535",
            settings.server.port
        ));
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

/// UPSTREAM VALIDATION
fn validate_upstream(upstream: &UpstreamConfig, errors: &mut Vec<String>) {
    if upstream.client_id.trim().is_empty() {
        errors.push("upstream.client_id must be provided (QURAN_CLIENT_ID)".to_string());
    }
    if upstream.client_secret.trim().is_empty() {
        errors.push("upstream.client_secret must be provided (QURAN_CLIENT_SECRET)".to_string());
    }
    if upstream.scope.trim().is_empty() {
        errors.push("upstream.scope must not be empty".to_string());
    }
    if upstream.timeout_ms == 0 {
        errors.push("upstream.timeout_ms must be > 0".to_string());
    }
    if upstream.safety_margin_seconds > 60 * 60 {
        errors.push(format!(
            "upstream.safety_margin_seconds ({}) is unreasonably large",
            upstream.safety_margin_seconds
        ));
    }
    if upstream.language.trim().is_empty() {
        errors.push("upstream.language must not be empty".to_string());
    }
    if !is_translation_list(&upstream.default_translations) {
        errors.push(format!(
            "upstream.default_translations '{}' must be a comma-joined list of numeric ids",
            upstream.default_translations
        ));
    }
}

/// CACHE VALIDATION
fn validate_cache(cache: &CacheConfig, errors: &mut Vec<String>) {
    if cache.ttl_seconds == 0 {
        errors.push("cache.ttl_seconds must be > 0".to_string());
    }
    if cache.sweep_interval_seconds == 0 {
        errors.push("cache.sweep_interval_seconds must be > 0".to_string());
    }
}

fn is_translation_list(value: &str) -> bool {
    Regex::new(r"^\d+(,\d+)*$")
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::is_translation_list;

    #[test]
    fn translation_list_shape() {
        assert!(is_translation_list("131"));
        assert!(is_translation_list("161,131"));
        assert!(!is_translation_list(""));
        assert!(!is_translation_list("161, 131"));
        assert!(!is_translation_list("161,"));
        assert!(!is_translation_list("en"));
    }
}

use serde::Deserialize;

use crate::config::settings::SettingsConfig;
use crate::sources::environment::QuranEnvironment;
use crate::utils::constants::{
    DEFAULT_CACHE_TTL_SECS, DEFAULT_HTTP_TIMEOUT_MS, DEFAULT_LANGUAGE, DEFAULT_SAFETY_MARGIN_SECS,
    DEFAULT_SCOPE, DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TRANSLATIONS,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default)]
    pub settings: SettingsConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// ================================
/// Upstream content API
/// ================================
#[derive(Deserialize, Clone)]
pub struct UpstreamConfig {
    #[serde(default)]
    pub environment: QuranEnvironment,
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    /// transport timeout for every outbound call
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// a token closer than this to its expiry is treated as expired
    #[serde(default = "default_safety_margin")]
    pub safety_margin_seconds: u64,
    /// response language sent with every search
    #[serde(default = "default_language")]
    pub language: String,
    /// comma-joined translation ids used when a request names none
    #[serde(default = "default_translations")]
    pub default_translations: String,
    #[serde(default)]
    pub background_refresh: bool,
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("environment", &self.environment)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("scope", &self.scope)
            .field("timeout_ms", &self.timeout_ms)
            .field("safety_margin_seconds", &self.safety_margin_seconds)
            .field("language", &self.language)
            .field("default_translations", &self.default_translations)
            .field("background_refresh", &self.background_refresh)
            .finish()
    }
}

/// ================================
/// Verse cache
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: default_ttl(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_owned()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_HTTP_TIMEOUT_MS
}

fn default_safety_margin() -> u64 {
    DEFAULT_SAFETY_MARGIN_SECS
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_owned()
}

fn default_translations() -> String {
    DEFAULT_TRANSLATIONS.to_owned()
}

fn default_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

fn default_sweep_interval() -> u64 {
    DEFAULT_SWEEP_INTERVAL_SECS
}

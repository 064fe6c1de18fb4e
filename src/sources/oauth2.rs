//! Client-credentials token lifecycle for the upstream content API.
//!
//! `TokenManager` holds at most one token. Callers go through `ensure_valid`,
//! which hands out the current token while it is outside the safety margin
//! and otherwise performs a fresh exchange. Acquisition is serialized so
//! concurrent callers racing an expiry trigger a single exchange.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::AUTHORIZATION;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::cache::token::Token;
use crate::config::upstream::UpstreamConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::helpers::time::{get_instant, now_i64, seconds_until};
use crate::observability::metrics::get_metrics;
use crate::sources::environment::{QuranEnvironment, UpstreamEndpoints};
use crate::utils::constants::{DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_SCOPE, ENDPOINT_TOKEN};

static ERROR_MSG: &str = "error";
const GRANT_TYPE: &str = "client_credentials";
const REFRESH_RETRY_SECS: u64 = 5;

/// Client id and secret, loaded once at startup.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// `Basic base64(id:secret)` header value.
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// Grant response of the authorization server
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

#[derive(Debug)]
pub struct TokenManager {
    client: Client,
    credentials: ClientCredentials,
    environment: QuranEnvironment,
    endpoints: UpstreamEndpoints,
    scope: String,
    safety_margin_seconds: u64,
    current: RwLock<Option<Token>>,
    acquire_lock: Mutex<()>,
}

impl TokenManager {
    pub fn new(client: Client, credentials: ClientCredentials, environment: QuranEnvironment) -> Self {
        Self {
            client,
            credentials,
            environment,
            endpoints: environment.endpoints(),
            scope: DEFAULT_SCOPE.to_owned(),
            safety_margin_seconds: DEFAULT_SAFETY_MARGIN_SECS,
            current: RwLock::new(None),
            acquire_lock: Mutex::new(()),
        }
    }

    pub fn from_config(cfg: &UpstreamConfig, client: Client) -> Self {
        Self::new(
            client,
            ClientCredentials::new(cfg.client_id.as_str(), cfg.client_secret.as_str()),
            cfg.environment,
        )
        .with_scope(&cfg.scope)
        .with_safety_margin(cfg.safety_margin_seconds)
    }

    /// Point the manager at a specific endpoint pair instead of the environment's.
    pub fn with_endpoints(mut self, endpoints: UpstreamEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_owned();
        self
    }

    pub fn with_safety_margin(mut self, safety_margin_seconds: u64) -> Self {
        self.safety_margin_seconds = safety_margin_seconds;
        self
    }

    pub fn environment(&self) -> QuranEnvironment {
        self.environment
    }

    pub fn endpoints(&self) -> &UpstreamEndpoints {
        &self.endpoints
    }

    pub fn client_id(&self) -> &str {
        self.credentials.client_id()
    }

    /// True iff a token is held and it expires more than the safety margin from now.
    pub async fn is_valid(&self) -> bool {
        self.valid_token().await.is_some()
    }

    async fn valid_token(&self) -> Option<Token> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|token| token.is_valid_at(now_i64(), self.safety_margin_seconds))
            .cloned()
    }

    /// Current token if still usable, otherwise a freshly acquired one.
    pub async fn ensure_valid(&self) -> GatewayResult<Token> {
        if let Some(token) = self.valid_token().await {
            return Ok(token);
        }

        let _guard = self.acquire_lock.lock().await;
        // another caller may have refreshed while we waited
        if let Some(token) = self.valid_token().await {
            debug!("token refreshed by concurrent caller");
            return Ok(token);
        }
        self.acquire().await
    }

    /// Exchange credentials for a new token and make it current.
    ///
    /// On failure the previously held token, if any, is left untouched.
    pub async fn acquire(&self) -> GatewayResult<Token> {
        let metrics = get_metrics().await;
        let start = get_instant();
        metrics.upstream_requests.with_label_values(&[ENDPOINT_TOKEN]).inc();

        let outcome = self.exchange_credentials().await;
        metrics
            .upstream_duration
            .with_label_values(&[ENDPOINT_TOKEN])
            .observe(start.elapsed().as_secs_f64());

        match outcome {
            Ok(token) => {
                metrics.token_acquisitions.inc();
                metrics.token_expiry_unix.set(token.exp_unix_ts);
                *self.current.write().await = Some(token.clone());
                info!(
                    environment = self.environment.as_str(),
                    expires_at = token.exp_unix_ts,
                    "access token acquired"
                );
                Ok(token)
            }
            Err(e) => {
                metrics.token_acquisition_failures.inc();
                metrics
                    .upstream_failures
                    .with_label_values(&[ENDPOINT_TOKEN, ERROR_MSG])
                    .inc();
                error!(environment = self.environment.as_str(), error = %e, "access token acquisition failed");
                Err(GatewayError::Authentication(e.to_string()))
            }
        }
    }

    async fn exchange_credentials(&self) -> Result<Token> {
        let form = [("grant_type", GRANT_TYPE), ("scope", self.scope.as_str())];
        let response = self
            .client
            .post(self.endpoints.token_url())
            .header(AUTHORIZATION, self.credentials.basic_authorization())
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("token request failed: {}", response.status());
        }

        let body = response.text().await?;
        let grant: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("malformed token response: {}", e))?;
        if grant.access_token.is_empty() {
            bail!("token response carries an empty access_token");
        }
        debug!(token_type = ?grant.token_type, scope = ?grant.scope, expires_in = grant.expires_in, "token granted");

        let exp_unix_ts = i64::try_from(grant.expires_in)
            .ok()
            .and_then(|expires_in| now_i64().checked_add(expires_in))
            .ok_or_else(|| anyhow!("malformed token response: expires_in out of range"))?;

        Ok(Token::new(grant.access_token, exp_unix_ts))
    }

    /// Drop the current token if it is still the one upstream rejected.
    ///
    /// Returns whether a token was dropped.
    pub async fn invalidate(&self, rejected: &Token) -> bool {
        let mut current = self.current.write().await;
        if current.as_ref().is_some_and(|token| token.value == rejected.value) {
            *current = None;
            warn!(environment = self.environment.as_str(), "access token invalidated");
            true
        } else {
            false
        }
    }

    /// Keep a token warm: re-acquire as soon as the held one enters the safety margin.
    pub async fn loop_refresh_token(self: Arc<Self>) -> Result<()> {
        info!("background token refresh enabled, safety margin {}s", self.safety_margin_seconds);
        let _ = tokio::spawn(async move {
            loop {
                let sleep_interval = match self.ensure_valid().await {
                    Ok(token) => seconds_until(token.refresh_at(self.safety_margin_seconds)).max(1),
                    Err(e) => {
                        warn!("background token refresh failed: {}", e);
                        REFRESH_RETRY_SECS
                    }
                };
                debug!("next token check in {} seconds", sleep_interval);
                tokio::time::sleep(Duration::from_secs(sleep_interval)).await;
            }
        });
        Ok(())
    }
}

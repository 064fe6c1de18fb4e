//! Content API client: verse search and per-verse detail.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::cache::token::Token;
use crate::error::GatewayError;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::retrieval::types::{Pagination, VerseDetail};
use crate::utils::constants::{ENDPOINT_SEARCH, ENDPOINT_VERSE};

const AUTH_TOKEN_HEADER: &str = "x-auth-token";
const CLIENT_ID_HEADER: &str = "x-client-id";
const VERSE_FIELDS: &str = "text_uthmani";

/// Why a content API call failed.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// Upstream rejected the bearer token.
    #[error("upstream rejected the access token")]
    Unauthorized,
    #[error("upstream responded with status {0}")]
    Status(StatusCode),
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("malformed upstream payload: {0}")]
    Decode(String),
}

impl UpstreamError {
    fn reason(&self) -> &'static str {
        match self {
            UpstreamError::Unauthorized => "unauthorized",
            UpstreamError::Status(_) => "status",
            UpstreamError::Transport(e) if e.is_timeout() => "timeout",
            UpstreamError::Transport(_) => "transport",
            UpstreamError::Decode(_) => "decode",
        }
    }
}

impl From<UpstreamError> for GatewayError {
    fn from(e: UpstreamError) -> Self {
        GatewayError::Upstream(e.to_string())
    }
}

/// Search response before hydration: verse keys in upstream order.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub verse_keys: Vec<String>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize)]
struct SearchEnvelope {
    #[serde(default)]
    search: Option<SearchBody>,
    #[serde(default)]
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    results: Vec<SearchHit>,
    #[serde(default)]
    current_page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    verse_key: String,
}

#[derive(Debug, Deserialize)]
struct VerseEnvelope {
    verse: Option<Value>,
}

impl SearchEnvelope {
    fn into_page(self) -> SearchPage {
        match self.search {
            Some(body) => {
                let pagination = self.pagination.unwrap_or(Pagination {
                    current_page: body.current_page,
                    total_pages: body.total_pages,
                    total_results: body.total_results,
                });
                SearchPage {
                    verse_keys: body.results.into_iter().map(|hit| hit.verse_key).collect(),
                    pagination,
                }
            }
            None => SearchPage {
                verse_keys: Vec::new(),
                pagination: self.pagination.unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContentApi {
    client: Client,
    base_url: String,
    client_id: String,
}

impl ContentApi {
    pub fn new(client: Client, base_url: &str, client_id: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
            client_id: client_id.to_owned(),
        }
    }

    /// `GET /search`: verse keys matching `query`.
    pub async fn search(
        &self,
        token: &Token,
        query: &str,
        size: u32,
        page: u32,
        language: &str,
    ) -> Result<SearchPage, UpstreamError> {
        let size = size.to_string();
        let page = page.to_string();
        let request = self
            .authorized(self.client.get(format!("{}/search", self.base_url)), token)
            .query(&[("q", query), ("size", size.as_str()), ("page", page.as_str()), ("language", language)]);

        observe(ENDPOINT_SEARCH, async {
            let body = read_success(request.send().await?).await?;
            let envelope: SearchEnvelope =
                serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;
            Ok::<_, UpstreamError>(envelope.into_page())
        })
        .await
    }

    /// `GET /verses/by_key/{key}`: full verse text plus the requested translations.
    pub async fn verse_by_key(
        &self,
        token: &Token,
        verse_key: &str,
        translations: &str,
    ) -> Result<VerseDetail, UpstreamError> {
        let request = self
            .authorized(self.client.get(format!("{}/verses/by_key/{}", self.base_url, verse_key)), token)
            .query(&[("translations", translations), ("fields", VERSE_FIELDS), ("words", "false")]);

        observe(ENDPOINT_VERSE, async {
            let body = read_success(request.send().await?).await?;
            let envelope: VerseEnvelope =
                serde_json::from_str(&body).map_err(|e| UpstreamError::Decode(e.to_string()))?;
            envelope
                .verse
                .map(VerseDetail)
                .ok_or_else(|| UpstreamError::Decode(format!("verse '{}' missing from response", verse_key)))
        })
        .await
    }

    fn authorized(&self, request: RequestBuilder, token: &Token) -> RequestBuilder {
        request
            .header(AUTH_TOKEN_HEADER, token.value.as_str())
            .header(CLIENT_ID_HEADER, self.client_id.as_str())
    }
}

async fn read_success(response: Response) -> Result<String, UpstreamError> {
    match response.status() {
        StatusCode::UNAUTHORIZED => Err(UpstreamError::Unauthorized),
        status if !status.is_success() => Err(UpstreamError::Status(status)),
        _ => Ok(response.text().await?),
    }
}

/// Count, time and classify one upstream call.
async fn observe<T, F>(endpoint: &str, call: F) -> Result<T, UpstreamError>
where
    F: std::future::Future<Output = Result<T, UpstreamError>>,
{
    let metrics = get_metrics().await;
    let start = get_instant();
    metrics.upstream_requests.with_label_values(&[endpoint]).inc();

    let result = call.await;
    metrics
        .upstream_duration
        .with_label_values(&[endpoint])
        .observe(start.elapsed().as_secs_f64());
    if let Err(e) = &result {
        metrics
            .upstream_failures
            .with_label_values(&[endpoint, e.reason()])
            .inc();
    }
    result
}

//! Verse retrieval: search for matching verse keys, then hydrate each key
//! with its text and translations. Assembled results are cached for the
//! cache TTL, empty searches included.

use std::sync::{Arc, LazyLock};

use futures::future::join_all;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::cache::token::Token;
use crate::cache::verse_cache::{DetailKey, SearchKey, VerseCache};
use crate::error::{GatewayError, GatewayResult};
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::run_with_reauth;
use crate::retrieval::types::{VerseDetail, VerseSearchResult};
use crate::sources::content::{ContentApi, UpstreamError};
use crate::sources::oauth2::TokenManager;

// ASCII digits only
static REFERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+:[0-9]+$").expect("valid reference pattern"));

/// Check a `<chapter>:<verse>` reference.
pub fn validate_reference(reference: &str) -> GatewayResult<()> {
    if REFERENCE_RE.is_match(reference) {
        Ok(())
    } else {
        Err(GatewayError::InvalidReference(reference.to_owned()))
    }
}

pub struct VerseService {
    tokens: Arc<TokenManager>,
    content: ContentApi,
    cache: VerseCache,
    language: String,
}

impl VerseService {
    pub fn new(tokens: Arc<TokenManager>, content: ContentApi, cache: VerseCache, language: &str) -> Self {
        Self {
            tokens,
            content,
            cache,
            language: language.to_owned(),
        }
    }

    /// Example verses for `query`, hydrated with `translations`.
    pub async fn get_verses(
        &self,
        query: &str,
        size: u32,
        translations: &str,
        page: u32,
    ) -> GatewayResult<VerseSearchResult> {
        let key = SearchKey::new(query, size, translations, page);
        if let Some(cached) = self.cache.get_search(&key).await {
            debug!(query, page, "search served from cache");
            return Ok(cached);
        }

        let result = run_with_reauth(&self.tokens, |token| {
            self.search_and_hydrate(token, query, size, translations, page)
        })
        .await?;

        info!(
            query,
            page,
            hydrated = result.results.len(),
            total_results = result.pagination.total_results,
            "search assembled"
        );
        self.cache.insert_search(key, result.clone()).await;
        Ok(result)
    }

    /// Single verse by `<chapter>:<verse>` reference.
    pub async fn get_verse_details(&self, reference: &str, translations: &str) -> GatewayResult<VerseDetail> {
        validate_reference(reference)?;

        let key = DetailKey::new(reference, translations);
        if let Some(cached) = self.cache.get_detail(&key).await {
            debug!(reference, "verse served from cache");
            return Ok(cached);
        }

        let detail = run_with_reauth(&self.tokens, |token| async move {
            self.content.verse_by_key(&token, reference, translations).await
        })
        .await?;

        self.cache.insert_detail(key, detail.clone()).await;
        Ok(detail)
    }

    async fn search_and_hydrate(
        &self,
        token: Token,
        query: &str,
        size: u32,
        translations: &str,
        page: u32,
    ) -> Result<VerseSearchResult, UpstreamError> {
        let search = self
            .content
            .search(&token, query, size, page, &self.language)
            .await?;

        if search.verse_keys.is_empty() {
            debug!(query, page, "search returned no verses");
            return Ok(VerseSearchResult::empty(search.pagination));
        }

        let fetches = search
            .verse_keys
            .iter()
            .map(|verse_key| self.content.verse_by_key(&token, verse_key, translations));
        let outcomes = join_all(fetches).await;

        let metrics = get_metrics().await;
        let mut results = Vec::with_capacity(outcomes.len());
        for (verse_key, outcome) in search.verse_keys.iter().zip(outcomes) {
            match outcome {
                Ok(detail) => results.push(detail),
                Err(e) => {
                    metrics.hydration_dropped.inc();
                    warn!(verse_key = %verse_key, error = %e, "verse dropped from search results");
                }
            }
        }

        Ok(VerseSearchResult {
            results,
            pagination: search.pagination,
        })
    }
}

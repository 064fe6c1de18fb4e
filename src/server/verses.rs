//! Verse handlers. Boundary validation lives here: query presence, size and
//! page ranges, defaulted translations.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::{GatewayError, GatewayResult};
use crate::retrieval::types::{VerseDetail, VerseSearchResult};
use crate::server::server::AppState;
use crate::utils::constants::{DEFAULT_SEARCH_SIZE, MAX_SEARCH_SIZE, MIN_SEARCH_SIZE};

/// Raw search parameters; `size` and `page` are parsed in `validate`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub size: Option<String>,
    pub translations: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailParams {
    pub translations: Option<String>,
}

/// Validated search inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub size: u32,
    pub translations: String,
    pub page: u32,
}

impl SearchParams {
    pub fn validate(self, default_translations: &str) -> GatewayResult<SearchRequest> {
        // the query is keyed and forwarded verbatim
        let query = self
            .q
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| GatewayError::InvalidInput("query parameter 'q' is required".to_owned()))?;

        let size = parse_number("size", self.size.as_deref())?.unwrap_or(DEFAULT_SEARCH_SIZE);
        if !(MIN_SEARCH_SIZE..=MAX_SEARCH_SIZE).contains(&size) {
            return Err(GatewayError::InvalidInput(format!(
                "size must be between {} and {}",
                MIN_SEARCH_SIZE, MAX_SEARCH_SIZE
            )));
        }

        let page = parse_number("page", self.page.as_deref())?.unwrap_or(1);
        if page < 1 {
            return Err(GatewayError::InvalidInput("page must be >= 1".to_owned()));
        }

        Ok(SearchRequest {
            query,
            size,
            translations: translations_or_default(self.translations, default_translations),
            page,
        })
    }
}

fn parse_number(name: &str, raw: Option<&str>) -> GatewayResult<Option<u32>> {
    raw.map(|value| {
        value
            .parse::<u32>()
            .map_err(|_| GatewayError::InvalidInput(format!("{} must be a positive integer, got '{}'", name, value)))
    })
    .transpose()
}

fn translations_or_default(translations: Option<String>, default_translations: &str) -> String {
    translations
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| default_translations.to_owned())
}

/// `GET /api/quran/search?q=&size=&translations=&page=`
pub async fn search_verses(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> GatewayResult<Json<VerseSearchResult>> {
    let request = params.validate(&state.default_translations)?;
    let result = state
        .verses
        .get_verses(&request.query, request.size, &request.translations, request.page)
        .await?;
    Ok(Json(result))
}

/// `GET /api/quran/verses/{reference}?translations=`
pub async fn verse_details(
    State(state): State<AppState>,
    Path(reference): Path<String>,
    Query(params): Query<DetailParams>,
) -> GatewayResult<Json<VerseDetail>> {
    let translations = translations_or_default(params.translations, &state.default_translations);
    let detail = state.verses.get_verse_details(&reference, &translations).await?;
    Ok(Json(detail))
}

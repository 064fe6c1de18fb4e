use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Paging descriptor as reported by the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

/// Verse with its text and the requested translations, as returned upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerseDetail(pub Value);

impl VerseDetail {
    pub fn verse_key(&self) -> Option<&str> {
        self.0.get("verse_key").and_then(Value::as_str)
    }
}

/// Hydrated search response: verses in upstream search order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerseSearchResult {
    pub results: Vec<VerseDetail>,
    pub pagination: Pagination,
}

impl VerseSearchResult {
    pub fn empty(pagination: Pagination) -> Self {
        Self {
            results: Vec::new(),
            pagination,
        }
    }
}

//! Time-bounded cache of assembled upstream results.
//!
//! Entries are never mutated and expire a fixed TTL after insertion,
//! independent of how often they are read. Expiry is checked on every read;
//! the sweep loop only reclaims memory.

use std::time::Duration;

use anyhow::Result;
use moka::future::Cache;
use tracing::{debug, info};

use crate::observability::metrics::get_metrics;
use crate::retrieval::types::{VerseDetail, VerseSearchResult};

static KIND_SEARCH: &str = "search";
static KIND_DETAIL: &str = "detail";
static HIT_MSG: &str = "hit";
static MISS_MSG: &str = "miss";

/// Exact search inputs; translation order matters.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct SearchKey {
    pub query: String,
    pub size: u32,
    pub translations: String,
    pub page: u32,
}

impl SearchKey {
    pub fn new(query: &str, size: u32, translations: &str, page: u32) -> Self {
        Self {
            query: query.to_owned(),
            size,
            translations: translations.to_owned(),
            page,
        }
    }
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct DetailKey {
    pub reference: String,
    pub translations: String,
}

impl DetailKey {
    pub fn new(reference: &str, translations: &str) -> Self {
        Self {
            reference: reference.to_owned(),
            translations: translations.to_owned(),
        }
    }
}

#[derive(Clone)]
pub struct VerseCache {
    searches: Cache<SearchKey, VerseSearchResult>,
    details: Cache<DetailKey, VerseDetail>,
    ttl: Duration,
}

impl VerseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            searches: Cache::builder().time_to_live(ttl).build(),
            details: Cache::builder().time_to_live(ttl).build(),
            ttl,
        }
    }

    pub async fn get_search(&self, key: &SearchKey) -> Option<VerseSearchResult> {
        let found = self.searches.get(key).await;
        record_lookup(KIND_SEARCH, found.is_some()).await;
        found
    }

    pub async fn insert_search(&self, key: SearchKey, value: VerseSearchResult) {
        self.searches.insert(key, value).await;
    }

    pub async fn get_detail(&self, key: &DetailKey) -> Option<VerseDetail> {
        let found = self.details.get(key).await;
        record_lookup(KIND_DETAIL, found.is_some()).await;
        found
    }

    pub async fn insert_detail(&self, key: DetailKey, value: VerseDetail) {
        self.details.insert(key, value).await;
    }

    /// Drop expired entries and refresh the size gauges.
    pub async fn sweep(&self) {
        self.searches.run_pending_tasks().await;
        self.details.run_pending_tasks().await;

        let metrics = get_metrics().await;
        metrics
            .cache_entries
            .with_label_values(&[KIND_SEARCH])
            .set(self.searches.entry_count() as i64);
        metrics
            .cache_entries
            .with_label_values(&[KIND_DETAIL])
            .set(self.details.entry_count() as i64);
        debug!(
            searches = self.searches.entry_count(),
            details = self.details.entry_count(),
            "verse cache swept"
        );
    }

    /// Periodically reclaim expired entries.
    pub async fn loop_sweep_expired(&self, interval_seconds: u64) -> Result<()> {
        let cache = self.clone();
        let interval = Duration::from_secs(interval_seconds.max(1));
        info!("verse cache sweep every {} seconds, ttl {:?}", interval.as_secs(), cache.ttl);
        let _ = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;
                cache.sweep().await;
            }
        });
        Ok(())
    }
}

async fn record_lookup(kind: &str, hit: bool) {
    let outcome = if hit { HIT_MSG } else { MISS_MSG };
    get_metrics()
        .await
        .cache_lookups
        .with_label_values(&[kind, outcome])
        .inc();
}

//! Shared constants and invariants

pub const DEFAULT_SAFETY_MARGIN_SECS: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 600;

pub const DEFAULT_SCOPE: &str = "content";
pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TRANSLATIONS: &str = "131";

// Search boundary
pub const DEFAULT_SEARCH_SIZE: u32 = 5;
pub const MIN_SEARCH_SIZE: u32 = 1;
pub const MAX_SEARCH_SIZE: u32 = 10;

// Upstream endpoint labels
pub const ENDPOINT_TOKEN: &str = "token";
pub const ENDPOINT_SEARCH: &str = "search";
pub const ENDPOINT_VERSE: &str = "verse_by_key";

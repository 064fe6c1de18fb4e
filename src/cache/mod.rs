pub mod token;
pub mod verse_cache;

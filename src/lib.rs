//! # Quran Gateway Library
//!
//! Holds a server-side OAuth2 client-credentials token for the Quran content
//! API, retrieves verses through a search-then-hydrate fan-out and caches
//! the assembled results for a fixed TTL.
//!
//! Modules:
//! - `config`: service configuration, loading and validation
//! - `cache`: access token and TTL verse cache
//! - `sources`: authorization server and content API clients
//! - `retrieval`: verse search/hydration on top of the cache
//! - `resilience`: re-authenticate-once policy for upstream calls
//! - `server`: axum routes exposing the retrieval operations

pub mod config;
pub mod cache;
pub mod error;
pub mod sources;
pub mod resilience;
pub mod retrieval;
pub mod observability;
pub mod server;
pub mod helpers;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::config::upstream::ServiceConfig;
pub use crate::error::{GatewayError, GatewayResult};

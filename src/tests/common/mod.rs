// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use httpmock::Method::{GET, POST};
use httpmock::{Mock, MockServer};
use reqwest::Client;
use serde_json::Value;

use crate::cache::verse_cache::VerseCache;
use crate::retrieval::verses::VerseService;
use crate::sources::content::ContentApi;
use crate::sources::environment::{QuranEnvironment, UpstreamEndpoints};
use crate::sources::oauth2::{ClientCredentials, TokenManager};

pub const CLIENT_ID: &str = "test-client";
pub const CLIENT_SECRET: &str = "test-secret";
pub const TOKEN_PATH: &str = "/oauth2/token";
pub const SEARCH_PATH: &str = "/search";

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Token manager whose auth and content endpoints both point at `server`.
pub fn token_manager(server: &MockServer) -> Arc<TokenManager> {
    Arc::new(
        TokenManager::new(
            build_reqwest_client(),
            ClientCredentials::new(CLIENT_ID, CLIENT_SECRET),
            QuranEnvironment::Prelive,
        )
        .with_endpoints(UpstreamEndpoints::new(&server.base_url(), &server.base_url())),
    )
}

pub fn verse_service(server: &MockServer, tokens: Arc<TokenManager>, ttl: Duration) -> VerseService {
    let content = ContentApi::new(build_reqwest_client(), &server.base_url(), CLIENT_ID);
    VerseService::new(tokens, content, VerseCache::new(ttl), "en")
}

pub fn basic_authorization() -> String {
    ClientCredentials::new(CLIENT_ID, CLIENT_SECRET).basic_authorization()
}

/// Client-credentials grant answering with `access_token` valid for `expires_in` seconds.
pub async fn mock_token<'a>(server: &'a MockServer, access_token: &str, expires_in: u64) -> Mock<'a> {
    let basic = basic_authorization();
    let body = json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": expires_in,
        "scope": "content"
    });
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(TOKEN_PATH)
                .header("authorization", basic);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

pub async fn mock_token_failure<'a>(server: &'a MockServer, status: u16) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST).path(TOKEN_PATH);
            then.status(status)
                .header("Content-Type", "application/json")
                .json_body(json!({"error": "invalid_client"}));
        })
        .await
}

pub fn search_body(verse_keys: &[&str]) -> Value {
    let results: Vec<Value> = verse_keys
        .iter()
        .enumerate()
        .map(|(i, key)| json!({"verse_key": key, "verse_id": i + 1, "text": "…"}))
        .collect();
    json!({
        "search": {
            "query": "مِن",
            "total_results": verse_keys.len(),
            "current_page": 1,
            "total_pages": 1,
            "results": results
        }
    })
}

pub async fn mock_search<'a>(server: &'a MockServer, verse_keys: &[&str]) -> Mock<'a> {
    let body = search_body(verse_keys);
    server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

pub async fn mock_search_status<'a>(server: &'a MockServer, status: u16) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH);
            then.status(status);
        })
        .await
}

pub fn verse_body(verse_key: &str) -> Value {
    json!({
        "verse": {
            "verse_key": verse_key,
            "text_uthmani": format!("text of {}", verse_key),
            "translations": [{"resource_id": 131, "text": format!("translation of {}", verse_key)}]
        }
    })
}

pub fn verse_path(verse_key: &str) -> String {
    format!("/verses/by_key/{}", verse_key)
}

pub async fn mock_verse<'a>(server: &'a MockServer, verse_key: &str) -> Mock<'a> {
    let path = verse_path(verse_key);
    let body = verse_body(verse_key);
    server
        .mock_async(|when, then| {
            when.method(GET).path(path);
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(body);
        })
        .await
}

pub async fn mock_verse_status<'a>(server: &'a MockServer, verse_key: &str, status: u16) -> Mock<'a> {
    let path = verse_path(verse_key);
    server
        .mock_async(|when, then| {
            when.method(GET).path(path);
            then.status(status);
        })
        .await
}

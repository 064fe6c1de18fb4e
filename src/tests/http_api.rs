#[cfg(test)]
mod test {
    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;

    use httpmock::MockServer;
    use serde_json::Value;

    use crate::config::settings::{MetricsConfig, SettingsConfig};
    use crate::observability::metrics::get_metrics;
    use crate::server::server::{router, AppState};
    use crate::sources::oauth2::TokenManager;
    use crate::tests::common::{
        build_reqwest_client, mock_search, mock_token, mock_token_failure, mock_verse, spawn_axum, token_manager,
        verse_service, JoinHandle,
    };

    async fn start_gateway(server: &MockServer, tokens: Arc<TokenManager>) -> (JoinHandle<()>, SocketAddr) {
        let settings = SettingsConfig {
            metrics: MetricsConfig {
                path: "/metrics".to_owned(),
                is_enabled: true,
            },
            ..Default::default()
        };
        let verses = Arc::new(verse_service(server, tokens.clone(), Duration::from_secs(60)));
        let state = AppState::new(get_metrics().await, verses, tokens, "131");
        spawn_axum(router(&settings, state)).await
    }

    async fn get_json(url: String) -> (u16, Value) {
        let response = build_reqwest_client().get(url).send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    #[tokio::test]
    async fn health_reports_environment_and_token_state() {
        let server = MockServer::start_async().await;
        mock_token(&server, "token", 3600).await;
        let (handle, addr) = start_gateway(&server, token_manager(&server)).await;

        let (status, body) = get_json(format!("http://{}/api/quran/health", addr)).await;

        assert_eq!(status, 200);
        assert_eq!(body["environment"], "prelive");
        assert_eq!(body["tokenValid"], true);
        handle.abort();
    }

    #[tokio::test]
    async fn health_without_token_is_bad_gateway() {
        let server = MockServer::start_async().await;
        mock_token_failure(&server, 401).await;
        let (handle, addr) = start_gateway(&server, token_manager(&server)).await;

        let (status, body) = get_json(format!("http://{}/api/quran/health", addr)).await;

        assert_eq!(status, 502);
        assert_eq!(body["error"], "upstream_unavailable");
        handle.abort();
    }

    #[tokio::test]
    async fn search_returns_hydrated_verses() {
        let server = MockServer::start_async().await;
        mock_token(&server, "token", 3600).await;
        mock_search(&server, &["2:255", "3:2"]).await;
        mock_verse(&server, "2:255").await;
        mock_verse(&server, "3:2").await;
        let (handle, addr) = start_gateway(&server, token_manager(&server)).await;

        let (status, body) = get_json(format!("http://{}/api/quran/search?q=light&size=2", addr)).await;

        assert_eq!(status, 200);
        let results = body["results"].as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["verse_key"], "2:255");
        assert_eq!(results[1]["verse_key"], "3:2");
        assert_eq!(body["pagination"]["total_results"], 2);
        handle.abort();
    }

    #[tokio::test]
    async fn out_of_range_size_is_bad_request() {
        let server = MockServer::start_async().await;
        let grant = mock_token(&server, "token", 3600).await;
        let (handle, addr) = start_gateway(&server, token_manager(&server)).await;

        let (status, body) = get_json(format!("http://{}/api/quran/search?q=light&size=11", addr)).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "bad_request");

        let (status, _) = get_json(format!("http://{}/api/quran/search?size=3", addr)).await;
        assert_eq!(status, 400);

        for query in ["q=light&size=abc", "q=light&page=first", "q=light&size=-2"] {
            let (status, body) = get_json(format!("http://{}/api/quran/search?{}", addr, query)).await;
            assert_eq!(status, 400, "{query}");
            assert_eq!(body["error"], "bad_request", "{query}");
        }
        assert_eq!(grant.hits_async().await, 0);
        handle.abort();
    }

    #[tokio::test]
    async fn malformed_reference_is_rejected() {
        let server = MockServer::start_async().await;
        mock_token(&server, "token", 3600).await;
        let (handle, addr) = start_gateway(&server, token_manager(&server)).await;

        for reference in ["abc", "٢:٢٥٥"] {
            let (status, body) = get_json(format!("http://{}/api/quran/verses/{}", addr, reference)).await;
            assert_eq!(status, 400, "{reference}");
            assert_eq!(body["error"], "invalid_reference", "{reference}");
        }
        handle.abort();
    }

    #[tokio::test]
    async fn verse_details_use_default_translations() {
        let server = MockServer::start_async().await;
        mock_token(&server, "token", 3600).await;
        let verse = server
            .mock_async(|when, then| {
                when.method(httpmock::Method::GET)
                    .path("/verses/by_key/2:255")
                    .query_param("translations", "131")
                    .query_param("words", "false");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(crate::tests::common::verse_body("2:255"));
            })
            .await;
        let (handle, addr) = start_gateway(&server, token_manager(&server)).await;

        let (status, body) = get_json(format!("http://{}/api/quran/verses/2:255", addr)).await;

        assert_eq!(status, 200);
        assert_eq!(body["verse_key"], "2:255");
        assert_eq!(verse.hits_async().await, 1);
        handle.abort();
    }

    #[tokio::test]
    async fn authentication_failure_is_internal_error() {
        let server = MockServer::start_async().await;
        mock_token_failure(&server, 401).await;
        let (handle, addr) = start_gateway(&server, token_manager(&server)).await;

        let (status, body) = get_json(format!("http://{}/api/quran/search?q=light", addr)).await;

        assert_eq!(status, 500);
        assert_eq!(body["error"], "upstream_authentication_failed");
        handle.abort();
    }

    #[tokio::test]
    async fn metrics_endpoint_exposes_gateway_registry() {
        let server = MockServer::start_async().await;
        mock_token(&server, "token", 3600).await;
        let tokens = token_manager(&server);
        tokens.ensure_valid().await.unwrap();
        let (handle, addr) = start_gateway(&server, tokens).await;

        let response = build_reqwest_client()
            .get(format!("http://{}/metrics", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
        let text = response.text().await.unwrap();
        assert!(text.contains("qurangateway_token_acquisitions_total"));
        assert!(text.contains("qurangateway_upstream_requests_total"));
        handle.abort();
    }
}

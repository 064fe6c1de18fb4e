use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::{GatewayError, GatewayResult};
use crate::server::server::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub environment: &'static str,
    pub token_valid: bool,
}

/// `GET /api/quran/health`: makes sure a token can be held, then reports it.
pub async fn health(State(state): State<AppState>) -> GatewayResult<Json<HealthResponse>> {
    state
        .tokens
        .ensure_valid()
        .await
        .map_err(|e| GatewayError::Upstream(e.to_string()))?;

    Ok(Json(HealthResponse {
        environment: state.tokens.environment().as_str(),
        token_valid: state.tokens.is_valid().await,
    }))
}

//! Liveness and configuration endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// False when every analysis is served by the fallback templates.
    pub ai_configured: bool,
    pub engine: String,
    pub cached_answers: usize,
}

/// Server liveness
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        ai_configured: state.service.ai_configured(),
        engine: state.service.engine().to_string(),
        cached_answers: state.service.answer_cache().len(),
    })
}

/// Active configuration without secrets
#[utoipa::path(
    get,
    path = "/health/config",
    tag = "Health",
    responses((status = 200, description = "Redacted configuration", body = Object))
)]
pub async fn health_config(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(state.config.redacted_summary())
}

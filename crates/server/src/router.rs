//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(e) => {
            warn!("Invalid CORS_ORIGIN '{}' ({}), allowing any origin", origin, e);
            CorsLayer::permissive()
        }
    }
}

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_upload_bytes;
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(api::health))
        .route("/health/config", get(api::health_config))
        .route(
            "/api/documents",
            get(api::list_documents)
                .post(api::upload_document)
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .route(
            "/api/documents/{id}",
            get(api::get_document).delete(api::delete_document),
        )
        .route("/api/documents/{id}/analyze", post(api::analyze_document))
        .route("/api/documents/{id}/ask", post(api::ask_document))
        .route("/api/documents/{id}/report", get(api::download_report))
        .route("/api/analyze", post(api::analyze_text))
        .route("/api/ask", post(api::ask_text))
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

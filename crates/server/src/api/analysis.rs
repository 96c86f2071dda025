//! Analysis and question answering, for stored documents and raw text.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use lexis_core::DocId;
use lexis_ingest::StoredAnalysis;
use lexis_llm::AnalysisType;
use lexis_rag::{AnalysisOutcome, Answer};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{load_record, store_error};
use crate::state::AppState;

// ── Request/Response types ────────────────────────

#[derive(Deserialize, utoipa::IntoParams)]
pub struct AnalyzeQuery {
    /// comprehensive (default), summary, clauses or parties
    #[serde(rename = "type")]
    pub analysis_type: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AnalyzeTextRequest {
    pub text: String,
    #[serde(default, rename = "type")]
    pub analysis_type: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct AskTextRequest {
    pub text: String,
    pub question: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AnalyzeResponse {
    #[schema(value_type = Option<String>)]
    pub document_id: Option<DocId>,
    #[schema(value_type = Object)]
    pub outcome: AnalysisOutcome,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AnswerResponse {
    #[schema(value_type = Option<String>)]
    pub document_id: Option<DocId>,
    #[schema(value_type = Object)]
    pub answer: Answer,
}

fn analysis_type(raw: Option<&str>) -> AnalysisType {
    raw.map(AnalysisType::parse).unwrap_or_default()
}

// ── POST /api/documents/{id}/analyze ──────────────

/// Analyze a stored document
///
/// Always answers 200: AI failures degrade to a fallback analysis listed in
/// `outcome.degradations`. The latest analysis is kept on the document.
#[utoipa::path(
    post,
    path = "/api/documents/{id}/analyze",
    tag = "Analysis",
    params(("id" = String, Path, description = "Document id"), AnalyzeQuery),
    responses(
        (status = 200, description = "Analysis outcome", body = AnalyzeResponse),
        (status = 404, description = "Unknown document", body = String)
    )
)]
pub async fn analyze_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DocId>,
    Query(query): Query<AnalyzeQuery>,
) -> Result<Json<AnalyzeResponse>, (StatusCode, String)> {
    let record = load_record(&state, id).await?;
    let analysis_type = analysis_type(query.analysis_type.as_deref());
    info!("Analyzing document {} ({})", id, analysis_type);

    let outcome = state.service.analyze(&record.text, analysis_type).await;
    let stored = StoredAnalysis::new(
        outcome.report.raw_analysis_text.clone(),
        analysis_type.as_str(),
        &outcome.report.engine,
        outcome.confidence,
    );
    state.store.set_analysis(id, stored).await.map_err(store_error)?;

    Ok(Json(AnalyzeResponse {
        document_id: Some(id),
        outcome,
    }))
}

// ── POST /api/documents/{id}/ask ──────────────────

/// Ask a question about a stored document
///
/// Answers are cached per document and question.
#[utoipa::path(
    post,
    path = "/api/documents/{id}/ask",
    tag = "Analysis",
    params(("id" = String, Path, description = "Document id")),
    request_body = AskRequest,
    responses(
        (status = 200, description = "Grounded or fallback answer", body = AnswerResponse),
        (status = 404, description = "Unknown document", body = String)
    )
)]
pub async fn ask_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DocId>,
    Json(req): Json<AskRequest>,
) -> Result<Json<AnswerResponse>, (StatusCode, String)> {
    let record = load_record(&state, id).await?;
    info!("Question on document {}", id);
    let answer = state.service.answer(Some(id), &record.text, &req.question).await;
    Ok(Json(AnswerResponse {
        document_id: Some(id),
        answer,
    }))
}

// ── POST /api/analyze ─────────────────────────────

/// Analyze raw text without storing it
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "Analysis",
    request_body = AnalyzeTextRequest,
    responses((status = 200, description = "Analysis outcome", body = AnalyzeResponse))
)]
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeTextRequest>,
) -> Json<AnalyzeResponse> {
    let outcome = state
        .service
        .analyze(&req.text, analysis_type(req.analysis_type.as_deref()))
        .await;
    Json(AnalyzeResponse {
        document_id: None,
        outcome,
    })
}

// ── POST /api/ask ─────────────────────────────────

/// Ask a question about raw text; not cached
#[utoipa::path(
    post,
    path = "/api/ask",
    tag = "Analysis",
    request_body = AskTextRequest,
    responses((status = 200, description = "Grounded or fallback answer", body = AnswerResponse))
)]
pub async fn ask_text(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AskTextRequest>,
) -> Json<AnswerResponse> {
    let answer = state.service.answer(None, &req.text, &req.question).await;
    Json(AnswerResponse {
        document_id: None,
        answer,
    })
}

//! Document upload, listing and report download.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use lexis_core::{DocId, DocumentMeta, LexisError, RawDocument};
use lexis_ingest::{DocumentRecord, ExtractionError, StoredAnalysis, TextExtractor};
use lexis_llm::AnalysisType;
use lexis_rag::ReportKind;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{load_record, not_found, store_error};
use crate::state::AppState;

const PREVIEW_CHARS: usize = 200;

// ── Request/Response types ────────────────────────

#[derive(Serialize, utoipa::ToSchema)]
pub struct DocumentSummary {
    #[schema(value_type = String)]
    pub id: DocId,
    pub file_name: String,
    pub mime_type: String,
    pub characters: usize,
    #[schema(value_type = String)]
    pub uploaded_at: DateTime<Utc>,
    pub analyzed: bool,
}

impl From<&DocumentRecord> for DocumentSummary {
    fn from(record: &DocumentRecord) -> Self {
        Self {
            id: record.id,
            file_name: record.file_name.clone(),
            mime_type: record.mime_type.clone(),
            characters: record.text.chars().count(),
            uploaded_at: record.uploaded_at,
            analyzed: record.analysis.is_some(),
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    #[serde(flatten)]
    pub document: DocumentSummary,
    pub preview: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DocumentListResponse {
    pub documents: Vec<DocumentSummary>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct DocumentDetail {
    #[serde(flatten)]
    pub document: DocumentSummary,
    pub text: String,
    #[schema(value_type = Object)]
    pub analysis: Option<StoredAnalysis>,
}

#[derive(Deserialize, utoipa::IntoParams)]
pub struct ReportQuery {
    /// `simplified` (default) or `full`
    pub kind: Option<String>,
}

fn extraction_status(e: &ExtractionError) -> StatusCode {
    match e {
        ExtractionError::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        _ => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

// ── POST /api/documents ───────────────────────────

/// Upload a document
///
/// Accepts multipart/form-data; the `file` field (or the first file field) is
/// extracted to plain text and stored.
#[utoipa::path(
    post,
    path = "/api/documents",
    tag = "Documents",
    request_body(content_type = "multipart/form-data", description = "File upload"),
    responses(
        (status = 201, description = "Document stored", body = UploadResponse),
        (status = 400, description = "Malformed upload", body = String),
        (status = 415, description = "Unsupported file type", body = String),
        (status = 422, description = "Text extraction failed", body = String)
    )
)]
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), (StatusCode, String)> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") && field.file_name().is_none() {
            continue;
        }
        let file_name = field.file_name().unwrap_or("document.txt").to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, format!("Failed to read file: {e}")))?;
        upload = Some(RawDocument::new(bytes.to_vec(), &mime_type, &file_name));
        break;
    }
    let raw = upload.ok_or((StatusCode::BAD_REQUEST, "No file provided".to_string()))?;
    info!(
        "Upload '{}' ({}, {} bytes)",
        raw.file_name,
        raw.declared_mime_type,
        raw.source_bytes.len()
    );

    let extractor = state.extractor.clone();
    let file_name = raw.file_name.clone();
    let mime_type = raw.declared_mime_type.clone();
    let extracted = tokio::task::spawn_blocking(move || extractor.extract(&raw))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("Extraction task failed: {e}")))?
        .map_err(|e| {
            warn!("Extraction failed for '{}': {}", file_name, e);
            (extraction_status(&e), LexisError::from(e).to_string())
        })?;

    let record = DocumentRecord::new(&file_name, &mime_type, extracted.text);
    let preview: String = record.text.chars().take(PREVIEW_CHARS).collect();
    let document = DocumentSummary::from(&record);
    state.store.put(record).await.map_err(store_error)?;
    info!("Stored document {} ({} chars)", document.id, document.characters);

    Ok((StatusCode::CREATED, Json(UploadResponse { document, preview })))
}

// ── GET /api/documents ────────────────────────────

/// List stored documents, newest first
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    responses((status = 200, description = "Stored documents", body = DocumentListResponse))
)]
pub async fn list_documents(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DocumentListResponse>, (StatusCode, String)> {
    let records = state.store.list().await.map_err(store_error)?;
    Ok(Json(DocumentListResponse {
        documents: records.iter().map(DocumentSummary::from).collect(),
    }))
}

// ── GET /api/documents/{id} ───────────────────────

/// Fetch one document with its text and latest analysis
#[utoipa::path(
    get,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 200, description = "Document", body = DocumentDetail),
        (status = 404, description = "Unknown document", body = String)
    )
)]
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DocId>,
) -> Result<Json<DocumentDetail>, (StatusCode, String)> {
    let record = load_record(&state, id).await?;
    let document = DocumentSummary::from(&record);
    Ok(Json(DocumentDetail {
        document,
        text: record.text,
        analysis: record.analysis,
    }))
}

// ── DELETE /api/documents/{id} ────────────────────

/// Delete a document and its cached answers
#[utoipa::path(
    delete,
    path = "/api/documents/{id}",
    tag = "Documents",
    params(("id" = String, Path, description = "Document id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown document", body = String)
    )
)]
pub async fn delete_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DocId>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !state.store.delete(id).await.map_err(store_error)? {
        return Err(not_found(id));
    }
    state.service.forget(id);
    info!("Deleted document {}", id);
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /api/documents/{id}/report ────────────────

/// Download the report for an analyzed document
///
/// The report is rebuilt from the stored analysis text and sent as a
/// plain-text attachment.
#[utoipa::path(
    get,
    path = "/api/documents/{id}/report",
    tag = "Documents",
    params(("id" = String, Path, description = "Document id"), ReportQuery),
    responses(
        (status = 200, description = "Report text", body = String, content_type = "text/plain"),
        (status = 404, description = "Unknown document", body = String),
        (status = 409, description = "Document has not been analyzed", body = String)
    )
)]
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<DocId>,
    Query(query): Query<ReportQuery>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let record = load_record(&state, id).await?;
    let analysis = record.analysis.as_ref().ok_or((
        StatusCode::CONFLICT,
        format!("Document {id} has not been analyzed yet"),
    ))?;

    let kind = query.kind.as_deref().map(ReportKind::parse).unwrap_or_default();
    let report = state.service.report_from_text(
        &analysis.text,
        AnalysisType::parse(&analysis.analysis_type),
        &analysis.engine,
    );
    let meta = DocumentMeta::new(record.title(), &record.text);
    let body = state.service.assemble_report(&report, &meta, kind);
    let file_name = kind.file_name(&meta);

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}

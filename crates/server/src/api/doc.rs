//! OpenAPI document served through Scalar at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "lexis API",
        version = "0.1.0",
        description = "Legal document analysis: upload, chunked retrieval, AI analysis with deterministic fallbacks, and report downloads.",
    ),
    tags(
        (name = "Health", description = "Liveness and redacted configuration"),
        (name = "Documents", description = "Upload, listing, deletion and report downloads"),
        (name = "Analysis", description = "Document analysis and grounded question answering"),
    ),
    paths(
        // Health
        crate::api::health::health,
        crate::api::health::health_config,
        // Documents
        crate::api::documents::upload_document,
        crate::api::documents::list_documents,
        crate::api::documents::get_document,
        crate::api::documents::delete_document,
        crate::api::documents::download_report,
        // Analysis
        crate::api::analysis::analyze_document,
        crate::api::analysis::ask_document,
        crate::api::analysis::analyze_text,
        crate::api::analysis::ask_text,
    ),
    components(schemas(
        crate::api::health::HealthResponse,
        crate::api::documents::DocumentSummary,
        crate::api::documents::UploadResponse,
        crate::api::documents::DocumentListResponse,
        crate::api::documents::DocumentDetail,
        crate::api::analysis::AskRequest,
        crate::api::analysis::AnalyzeTextRequest,
        crate::api::analysis::AskTextRequest,
        crate::api::analysis::AnalyzeResponse,
        crate::api::analysis::AnswerResponse,
    ))
)]
pub struct ApiDoc;

//! HTTP endpoint modules.
//!
//! Handlers return `(StatusCode, String)` on error; shared lookups live here.

pub mod analysis;
pub mod doc;
pub mod documents;
pub mod health;

use axum::http::StatusCode;
use lexis_core::{DocId, LexisError};
use lexis_ingest::{DocumentRecord, StoreError};

use crate::state::AppState;

pub(crate) fn store_error(e: StoreError) -> (StatusCode, String) {
    let status = match e {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, LexisError::from(e).to_string())
}

pub(crate) fn not_found(id: DocId) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        LexisError::DocumentNotFound(id.to_string()).to_string(),
    )
}

/// Fetch a record or answer 404.
pub(crate) async fn load_record(
    state: &AppState,
    id: DocId,
) -> Result<DocumentRecord, (StatusCode, String)> {
    state
        .store
        .get(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| not_found(id))
}

pub use analysis::{analyze_document, analyze_text, ask_document, ask_text};
pub use documents::{
    delete_document, download_report, get_document, list_documents, upload_document,
};
pub use health::{health, health_config};

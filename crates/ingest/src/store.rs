//! Document store: hands out durable ids for uploaded documents.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lexis_core::{DocId, LexisError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(DocId),
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<StoreError> for LexisError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(id) => LexisError::DocumentNotFound(id.to_string()),
            StoreError::Backend(msg) => LexisError::Storage(msg),
        }
    }
}

/// Latest analysis of a document. The structured report is rebuilt from `text`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAnalysis {
    /// Raw analysis text (AI or fallback).
    pub text: String,
    pub analysis_type: String,
    pub engine: String,
    pub confidence: f64,
    pub analyzed_at: DateTime<Utc>,
}

impl StoredAnalysis {
    pub fn new(text: String, analysis_type: &str, engine: &str, confidence: f64) -> Self {
        Self {
            text,
            analysis_type: analysis_type.to_string(),
            engine: engine.to_string(),
            confidence,
            analyzed_at: Utc::now(),
        }
    }
}

/// A stored document with its extracted text and the latest analysis, if any.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: DocId,
    pub file_name: String,
    pub mime_type: String,
    pub text: String,
    pub uploaded_at: DateTime<Utc>,
    pub analysis: Option<StoredAnalysis>,
}

impl DocumentRecord {
    /// New record with a fresh id; the store keeps whatever id it is given.
    pub fn new(file_name: &str, mime_type: &str, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            text,
            uploaded_at: Utc::now(),
            analysis: None,
        }
    }

    /// File name without its extension, used as the report title.
    pub fn title(&self) -> &str {
        match self.file_name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem,
            _ => &self.file_name,
        }
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, record: DocumentRecord) -> Result<DocId, StoreError>;

    async fn get(&self, id: DocId) -> Result<Option<DocumentRecord>, StoreError>;

    /// All records, most recently uploaded first.
    async fn list(&self) -> Result<Vec<DocumentRecord>, StoreError>;

    async fn delete(&self, id: DocId) -> Result<bool, StoreError>;

    /// Replace the latest analysis of an existing record.
    async fn set_analysis(&self, id: DocId, analysis: StoredAnalysis) -> Result<(), StoreError>;
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryDocumentStore {
    records: RwLock<HashMap<DocId, DocumentRecord>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, record: DocumentRecord) -> Result<DocId, StoreError> {
        let id = record.id;
        self.records.write().await.insert(id, record);
        tracing::debug!(%id, "stored document");
        Ok(id)
    }

    async fn get(&self, id: DocId) -> Result<Option<DocumentRecord>, StoreError> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<DocumentRecord>, StoreError> {
        let mut records: Vec<DocumentRecord> =
            self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(records)
    }

    async fn delete(&self, id: DocId) -> Result<bool, StoreError> {
        Ok(self.records.write().await.remove(&id).is_some())
    }

    async fn set_analysis(&self, id: DocId, analysis: StoredAnalysis) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        record.analysis = Some(analysis);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = MemoryDocumentStore::new();
        let record = DocumentRecord::new("nda.txt", "text/plain", "Confidential.".into());
        let id = store.put(record).await.unwrap();

        let fetched = store.get(id).await.unwrap().unwrap();
        assert_eq!(fetched.file_name, "nda.txt");
        assert_eq!(fetched.title(), "nda");
        assert!(fetched.analysis.is_none());
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let store = MemoryDocumentStore::new();
        assert!(store.get(Uuid::new_v4()).await.unwrap().is_none());
        assert!(!store.delete(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn set_analysis_updates_record() {
        let store = MemoryDocumentStore::new();
        let id = store
            .put(DocumentRecord::new("lease.pdf", "application/pdf", "Rent is due.".into()))
            .await
            .unwrap();

        let analysis = StoredAnalysis::new("Key terms: rent".into(), "summary", "gemini", 0.85);
        store.set_analysis(id, analysis.clone()).await.unwrap();
        let record = store.get(id).await.unwrap().unwrap();
        assert_eq!(record.analysis, Some(analysis.clone()));

        let err = store.set_analysis(Uuid::new_v4(), analysis).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_and_delete() {
        let store = MemoryDocumentStore::new();
        let a = store.put(DocumentRecord::new("a.txt", "text/plain", "A".into())).await.unwrap();
        store.put(DocumentRecord::new("b.txt", "text/plain", "B".into())).await.unwrap();
        assert_eq!(store.list().await.unwrap().len(), 2);

        assert!(store.delete(a).await.unwrap());
        let remaining = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].file_name, "b.txt");
    }

    #[test]
    fn store_errors_map_to_lexis_errors() {
        let id = Uuid::new_v4();
        let err = LexisError::from(StoreError::NotFound(id));
        assert_eq!(err.to_string(), format!("Document not found: {id}"));

        let err = LexisError::from(StoreError::Backend("lock poisoned".into()));
        assert!(matches!(err, LexisError::Storage(_)));
        assert_eq!(err.to_string(), "Storage error: lock poisoned");
    }

    #[test]
    fn title_without_extension() {
        let record = DocumentRecord::new("README", "text/plain", String::new());
        assert_eq!(record.title(), "README");
        let record = DocumentRecord::new(".env", "text/plain", String::new());
        assert_eq!(record.title(), ".env");
    }
}

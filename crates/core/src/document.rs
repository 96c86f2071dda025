use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Durable identifier handed out by the document store.
pub type DocId = Uuid;

/// An uploaded file before text extraction. Dropped once text is extracted.
#[derive(Debug, Clone)]
pub struct RawDocument {
    pub source_bytes: Vec<u8>,
    pub declared_mime_type: String,
    pub file_name: String,
}

impl RawDocument {
    pub fn new(source_bytes: Vec<u8>, declared_mime_type: &str, file_name: &str) -> Self {
        Self {
            source_bytes,
            declared_mime_type: declared_mime_type.to_string(),
            file_name: file_name.to_string(),
        }
    }

    /// Lower-cased extension of the file name, empty if there is none.
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((_, ext)) => ext.to_lowercase(),
            None => String::new(),
        }
    }
}

/// Plain text extracted from one [`RawDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedText {
    pub text: String,
    /// File name of the source document.
    pub source_document_ref: String,
}

/// Descriptive fields a report header needs about its source document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub title: String,
    pub original_text: String,
    pub generated_at: DateTime<Utc>,
}

impl DocumentMeta {
    pub fn new(title: &str, original_text: &str) -> Self {
        Self {
            title: title.to_string(),
            original_text: original_text.to_string(),
            generated_at: Utc::now(),
        }
    }

    /// Title reduced to `[A-Za-z0-9_]` for use in download file names.
    pub fn file_stem(&self) -> String {
        self.title
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl Default for DocumentMeta {
    fn default() -> Self {
        Self::new("Legal Document", "")
    }
}

mod docx;
mod pdf;
mod txt;

use lexis_core::{ExtractedText, LexisError, RawDocument};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("DOCX extraction failed: {0}")]
    DocxError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExtractionError> for LexisError {
    fn from(e: ExtractionError) -> Self {
        LexisError::Extraction(e.to_string())
    }
}

/// Format family resolved from the declared MIME type, then the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
    Docx,
    /// Binary `.doc`; no parser in the stack.
    LegacyWord,
    Unknown,
}

impl DocumentKind {
    pub fn detect(mime_type: &str, extension: &str) -> Self {
        let mime = mime_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();
        match mime.as_str() {
            "application/pdf" => return DocumentKind::Pdf,
            "text/plain" | "text/markdown" => return DocumentKind::Text,
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => {
                return DocumentKind::Docx
            }
            "application/msword" => return DocumentKind::LegacyWord,
            _ => {}
        }
        match extension {
            "pdf" => DocumentKind::Pdf,
            "txt" | "text" | "md" | "markdown" => DocumentKind::Text,
            "docx" => DocumentKind::Docx,
            "doc" => DocumentKind::LegacyWord,
            _ => DocumentKind::Unknown,
        }
    }
}

/// Turns raw uploaded bytes into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, raw: &RawDocument) -> Result<ExtractedText, ExtractionError>;
}

/// Extractor backed by `pdf-extract` for PDFs, `zip` + `quick-xml` for DOCX
/// and UTF-8 decoding for text.
///
/// Legacy `.doc` files are rejected; unknown types are decoded as text.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileTextExtractor;

impl TextExtractor for FileTextExtractor {
    fn extract(&self, raw: &RawDocument) -> Result<ExtractedText, ExtractionError> {
        let kind = DocumentKind::detect(&raw.declared_mime_type, &raw.extension());
        let text = match kind {
            DocumentKind::Pdf => pdf::extract_pdf(&raw.source_bytes)?,
            DocumentKind::Docx => docx::extract_docx(&raw.source_bytes)?,
            DocumentKind::Text | DocumentKind::Unknown => txt::extract_txt(&raw.source_bytes),
            DocumentKind::LegacyWord => {
                return Err(ExtractionError::UnsupportedType(
                    raw.declared_mime_type.clone(),
                ))
            }
        };

        tracing::info!(
            "Extracted {} characters from {} ({:?})",
            text.chars().count(),
            raw.file_name,
            kind
        );

        Ok(ExtractedText {
            text,
            source_document_ref: raw.file_name.clone(),
        })
    }
}

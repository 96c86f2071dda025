//! Collaborators around the analysis core: turning uploaded bytes into text
//! and keeping uploaded documents addressable by id.

pub mod document;
pub mod store;

pub use document::{ExtractionError, FileTextExtractor, TextExtractor};
pub use store::{DocumentRecord, DocumentStore, MemoryDocumentStore, StoreError, StoredAnalysis};

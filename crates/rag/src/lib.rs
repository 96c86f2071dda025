//! Legal document analysis core: normalization, chunking, keyword retrieval,
//! section extraction, confidence estimation and report assembly, plus the
//! service that runs them around an AI provider.

pub mod cache;
pub mod chunker;
pub mod confidence;
pub mod extractor;
pub mod fallback;
pub mod normalize;
pub mod profile;
pub mod report;
pub mod retriever;
pub mod risk;
pub mod service;

pub use cache::AnswerCache;
pub use chunker::{chunk, Chunk};
pub use confidence::{estimate, ConfidenceFactors};
pub use extractor::{extract, AnalysisReport, Section, SectionKind};
pub use normalize::normalize;
pub use profile::DocumentProfile;
pub use report::{assemble, ReportKind};
pub use retriever::{retrieve, RetrievalOrder, RetrievalResult, ScoredChunk};
pub use risk::RiskAssessment;
pub use service::{answer_question, AnalysisOutcome, AnalysisService, Answer, QuestionContext};

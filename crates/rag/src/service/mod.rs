//! Orchestration of the analysis and question-answering pipelines.
//!
//! Text is normalized, chunked and either handed whole to the AI (analysis) or
//! narrowed to retrieved chunks first (questions). Whatever the AI returns, or
//! the fallback text when it fails, is run through section extraction. Every
//! outcome carries a confidence figure and the degradations that applied.

use chrono::{DateTime, Utc};
use lexis_core::config::{AnalysisConfig, Config};
use lexis_core::{Degradation, DocId, DocumentMeta};
use lexis_llm::prompts::{analysis_prompt, question_prompt};
use lexis_llm::{AiClient, AiResponse, AnalysisType};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::AnswerCache;
use crate::chunker::{chunk, Chunk};
use crate::confidence::{estimate, ConfidenceFactors};
use crate::extractor::{extract_as, AnalysisReport};
use crate::fallback::{fallback_analysis, fallback_answer, FALLBACK_CONFIDENCE, FALLBACK_SOURCE};
use crate::normalize::{normalize_checked, Normalized};
use crate::profile::{profile, DocumentProfile, DocumentType};
use crate::report::{assemble, ReportKind};
use crate::retriever::{retrieve_ordered, RetrievalOrder, RetrievalResult};
use crate::risk::{assess, RiskAssessment};

/// Engine label for output produced without the AI.
pub const FALLBACK_ENGINE: &str = "fallback";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutcome {
    pub report: AnalysisReport,
    pub confidence: f64,
    pub profile: DocumentProfile,
    pub risk: RiskAssessment,
    pub chunk_count: usize,
    pub degradations: Vec<Degradation>,
}

impl AnalysisOutcome {
    pub fn is_degraded(&self) -> bool {
        !self.degradations.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: String,
    pub confidence: f64,
    pub sources: Vec<String>,
    /// Indices of the chunks the answer was grounded on.
    pub relevant_chunks: Vec<usize>,
    pub engine: String,
    pub degradations: Vec<Degradation>,
    pub answered_at: DateTime<Utc>,
}

/// Retrieved chunks for a question and the prompt context built from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionContext {
    pub retrieved: RetrievalResult,
    pub prompt_context: String,
}

/// Retrieve context for `question` in document order. An empty result is a
/// valid outcome and gives an empty prompt context.
pub fn answer_question(question: &str, chunks: &[Chunk], top_k: usize) -> QuestionContext {
    question_context(question, chunks, top_k, RetrievalOrder::Document)
}

fn question_context(
    question: &str,
    chunks: &[Chunk],
    top_k: usize,
    order: RetrievalOrder,
) -> QuestionContext {
    let retrieved = retrieve_ordered(question, chunks, top_k, order);
    let prompt_context = retrieved.prompt_context();
    QuestionContext {
        retrieved,
        prompt_context,
    }
}

/// Normalized text, its degradations and a text-quality figure.
struct Prepared {
    normalized: Normalized,
    quality: f64,
    degradations: Vec<Degradation>,
}

pub struct AnalysisService {
    ai: AiClient,
    answers: AnswerCache<Answer>,
    config: AnalysisConfig,
    order: RetrievalOrder,
}

impl AnalysisService {
    pub fn new(ai: AiClient, answers: AnswerCache<Answer>, config: AnalysisConfig) -> Self {
        Self {
            ai,
            answers,
            config,
            order: RetrievalOrder::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            AiClient::from_config(&config.ai),
            AnswerCache::from_config(&config.cache),
            config.analysis.clone(),
        )
    }

    pub fn with_retrieval_order(mut self, order: RetrievalOrder) -> Self {
        self.order = order;
        self
    }

    pub fn ai_configured(&self) -> bool {
        self.ai.is_configured()
    }

    pub fn engine(&self) -> &str {
        self.ai.provider_name()
    }

    pub fn answer_cache(&self) -> &AnswerCache<Answer> {
        &self.answers
    }

    fn prepare(&self, text: &str) -> Prepared {
        let normalized = normalize_checked(text, self.config.max_text_chars);
        let mut degradations = Vec::new();

        if normalized.text.is_empty() {
            degradations.push(Degradation::InputDegraded {
                detail: "document text is empty after normalization".to_string(),
            });
        }
        if normalized.truncated {
            warn!(
                cleaned = normalized.cleaned_chars,
                kept = self.config.max_text_chars,
                "document truncated"
            );
            degradations.push(Degradation::Truncated {
                original_chars: normalized.cleaned_chars,
                kept_chars: self.config.max_text_chars,
            });
        }

        let raw_visible = text.chars().filter(|c| !c.is_whitespace()).count();
        let kept_visible = normalized.text.chars().filter(|c| *c != ' ').count();
        let quality = if raw_visible == 0 {
            0.0
        } else {
            kept_visible as f64 / raw_visible as f64
        };

        Prepared {
            normalized,
            quality,
            degradations,
        }
    }

    /// Normalize and chunk with the configured size.
    pub fn chunks(&self, text: &str) -> Vec<Chunk> {
        let prepared = self.prepare(text);
        chunk(&prepared.normalized.text, self.config.chunk_size)
    }

    /// Analyze a whole document.
    ///
    /// Never fails: an unusable AI response or empty input yields fallback
    /// text, recorded in `degradations`.
    pub async fn analyze(&self, document_text: &str, analysis_type: AnalysisType) -> AnalysisOutcome {
        let Prepared {
            normalized,
            quality,
            mut degradations,
        } = self.prepare(document_text);
        let text = normalized.text.as_str();

        let chunk_count = chunk(text, self.config.chunk_size).len();
        let doc_profile = profile(text);
        let risk = assess(text);

        // Nothing to send when normalization left no text.
        let response = if text.is_empty() {
            None
        } else {
            Some(self.ai.generate(&analysis_prompt(text, analysis_type)).await)
        };

        let (analysis_text, hint, engine) = match response {
            Some(AiResponse::Success {
                text: analysis,
                confidence_hint,
            }) => (analysis, Some(confidence_hint), self.engine().to_string()),
            other => {
                if let Some(AiResponse::Failure { reason }) = other {
                    warn!(%reason, "analysis degraded to fallback");
                    degradations.push(Degradation::UpstreamUnavailable { reason });
                }
                (
                    fallback_analysis(text, analysis_type, self.ai_configured()),
                    None,
                    FALLBACK_ENGINE.to_string(),
                )
            }
        };

        let report = extract_as(&analysis_text, analysis_type, &engine);
        let mut confidence = estimate(&ConfidenceFactors::for_analysis(
            quality,
            doc_profile.document_type != DocumentType::Document,
            doc_profile.word_count,
            hint,
        ));
        if hint.is_none() {
            confidence = confidence.min(FALLBACK_CONFIDENCE);
        }

        info!(
            %analysis_type,
            %engine,
            chunks = chunk_count,
            confidence,
            degraded = !degradations.is_empty(),
            "document analyzed"
        );

        AnalysisOutcome {
            report,
            confidence,
            profile: doc_profile,
            risk,
            chunk_count,
            degradations,
        }
    }

    /// Answer a question against a document.
    ///
    /// With a `doc_id` the answer is cached; concurrent identical questions
    /// share one AI call. Fallback answers are never cached.
    pub async fn answer(&self, doc_id: Option<DocId>, document_text: &str, question: &str) -> Answer {
        match doc_id {
            Some(id) => self
                .answers
                .get_or_try_insert_with(id, question, || self.compute_answer(document_text, question))
                .await
                .unwrap_or_else(|fallback| fallback),
            None => self
                .compute_answer(document_text, question)
                .await
                .unwrap_or_else(|fallback| fallback),
        }
    }

    /// `Ok` for an AI answer, `Err` for a fallback one.
    async fn compute_answer(&self, document_text: &str, question: &str) -> Result<Answer, Answer> {
        let Prepared {
            normalized,
            mut degradations,
            ..
        } = self.prepare(document_text);

        if question.trim().is_empty() {
            degradations.push(Degradation::InputDegraded {
                detail: "question is empty".to_string(),
            });
        }

        let chunks = chunk(&normalized.text, self.config.chunk_size);
        let context = question_context(question, &chunks, self.config.top_k, self.order);
        if context.retrieved.is_empty() {
            degradations.push(Degradation::RetrievalEmpty);
        }
        debug!(
            chunks = chunks.len(),
            retrieved = context.retrieved.chunks.len(),
            "question context built"
        );

        let response = if question.trim().is_empty() {
            None
        } else {
            Some(
                self.ai
                    .generate(&question_prompt(question, &context.prompt_context))
                    .await,
            )
        };

        let retrieved = context.retrieved.chunks.len();
        let relevant_chunks = context.retrieved.indices();
        let sources = context.retrieved.sources();

        let failure = match response {
            Some(AiResponse::Success {
                text,
                confidence_hint,
            }) => {
                return Ok(Answer {
                    question: question.to_string(),
                    answer: text,
                    confidence: estimate(&ConfidenceFactors::for_answer(
                        retrieved,
                        self.config.top_k,
                        Some(confidence_hint),
                    )),
                    sources,
                    relevant_chunks,
                    engine: self.engine().to_string(),
                    degradations,
                    answered_at: Utc::now(),
                });
            }
            Some(AiResponse::Failure { reason }) => Some(reason),
            None => None,
        };

        if let Some(reason) = failure {
            warn!(%reason, "answer degraded to fallback");
            degradations.push(Degradation::UpstreamUnavailable { reason });
        }
        let confidence =
            estimate(&ConfidenceFactors::for_answer(retrieved, self.config.top_k, None))
                .min(FALLBACK_CONFIDENCE);
        let sources = if sources.is_empty() {
            vec![FALLBACK_SOURCE.to_string()]
        } else {
            sources
        };
        Err(Answer {
            question: question.to_string(),
            answer: fallback_answer(question, retrieved > 0, self.ai_configured()),
            confidence,
            sources,
            relevant_chunks,
            engine: FALLBACK_ENGINE.to_string(),
            degradations,
            answered_at: Utc::now(),
        })
    }

    /// Rebuild a report from stored analysis text.
    pub fn report_from_text(
        &self,
        analysis_text: &str,
        analysis_type: AnalysisType,
        engine: &str,
    ) -> AnalysisReport {
        extract_as(analysis_text, analysis_type, engine)
    }

    pub fn assemble_report(
        &self,
        report: &AnalysisReport,
        meta: &DocumentMeta,
        kind: ReportKind,
    ) -> String {
        assemble(report, meta, kind)
    }

    /// Forget cached answers for a document whose text changed or was removed.
    pub fn forget(&self, doc_id: DocId) {
        let dropped = self.answers.invalidate(doc_id);
        debug!(%doc_id, dropped, "answer cache invalidated");
    }
}

#[cfg(test)]
mod tests;

//! Service tests against a scripted provider.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use lexis_llm::{LlmError, LlmProvider, Message};
use uuid::Uuid;

use super::*;
use crate::extractor::SectionKind;

const CONTRACT: &str =
    "Pay $500 within 30 days. Keep this confidential for 5 years. Terminate with 60 days notice.";

/// Replies in order; an exhausted script answers with an API error.
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, u16>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Duration,
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        if let Some(last) = messages.last() {
            self.prompts.lock().unwrap().push(last.content.clone());
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Ok(text)) => Ok(text),
            Some(Err(status)) => Err(LlmError::Api {
                status,
                body: "scripted failure".into(),
            }),
            None => Err(LlmError::Api {
                status: 500,
                body: "script exhausted".into(),
            }),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Sleeps, then records that the completion ran to the end.
struct SlowProvider {
    started: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    delay: Duration,
}

#[async_trait]
impl LlmProvider for SlowProvider {
    async fn complete(
        &self,
        _messages: Vec<Message>,
        _temperature: f32,
        _max_tokens: u32,
    ) -> Result<String, LlmError> {
        self.started.store(true, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        Ok("Risk: late payment".to_string())
    }

    fn name(&self) -> &str {
        "slow"
    }
}

fn slow() -> (AnalysisService, Arc<AtomicBool>, Arc<AtomicBool>) {
    let started = Arc::new(AtomicBool::new(false));
    let finished = Arc::new(AtomicBool::new(false));
    let provider = SlowProvider {
        started: Arc::clone(&started),
        finished: Arc::clone(&finished),
        delay: Duration::from_secs(10),
    };
    let ai = AiClient::new(Box::new(provider), 0.2, 512, Duration::from_secs(30));
    let service = AnalysisService::new(
        ai,
        AnswerCache::new(16, Duration::from_secs(60)),
        AnalysisConfig::default(),
    );
    (service, started, finished)
}

struct Harness {
    service: AnalysisService,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl Harness {
    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

fn scripted(replies: Vec<Result<&str, u16>>, delay: Duration) -> Harness {
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let provider = ScriptedProvider {
        replies: Mutex::new(replies.into_iter().map(|r| r.map(str::to_string)).collect()),
        prompts: Arc::clone(&prompts),
        delay,
    };
    let ai = AiClient::new(Box::new(provider), 0.2, 512, Duration::from_secs(30));
    let config = AnalysisConfig {
        max_text_chars: 50_000,
        chunk_size: 40,
        top_k: 3,
    };
    Harness {
        service: AnalysisService::new(ai, AnswerCache::new(16, Duration::from_secs(60)), config),
        prompts,
    }
}

fn unconfigured() -> AnalysisService {
    AnalysisService::new(
        AiClient::unconfigured(),
        AnswerCache::new(16, Duration::from_secs(60)),
        AnalysisConfig::default(),
    )
}

// ── Pure question context ───────────────────────────────────────────

#[test]
fn answer_question_builds_context_in_document_order() {
    let chunks = chunk(CONTRACT, 40);
    let ctx = answer_question("notice period within days", &chunks, 3);
    assert_eq!(ctx.retrieved.indices(), vec![0, 2]);
    assert_eq!(
        ctx.prompt_context,
        "Pay $500 within 30 days.\n\nTerminate with 60 days notice."
    );

    let empty = answer_question("Is it ok?", &chunks, 3);
    assert!(empty.retrieved.is_empty());
    assert_eq!(empty.prompt_context, "");
}

// ── Analysis ────────────────────────────────────────────────────────

#[tokio::test]
async fn analysis_extracts_sections_from_ai_text() {
    let ai_text = "1. The client must pay a fee of 500.\n\
                   Risk: the penalty for breach is high.\n\
                   We recommend negotiating the notice period.";
    let h = scripted(vec![Ok(ai_text)], Duration::ZERO);

    let outcome = h.service.analyze(CONTRACT, AnalysisType::Comprehensive).await;

    assert!(!outcome.is_degraded());
    assert_eq!(outcome.report.engine, "scripted");
    assert_eq!(outcome.report.raw_analysis_text, ai_text);
    assert_eq!(
        outcome.report.lines(SectionKind::Risks),
        &["Risk: the penalty for breach is high.".to_string()]
    );
    assert!(!outcome.report.is_fallback(SectionKind::Recommendations));
    assert_eq!(outcome.chunk_count, 3);
    assert!(outcome.confidence > FALLBACK_CONFIDENCE);
    assert!(h.last_prompt().contains("Pay 500 within 30 days."));
}

#[tokio::test]
async fn analysis_failure_degrades_to_fallback() {
    let h = scripted(vec![Err(503)], Duration::ZERO);

    let outcome = h.service.analyze(CONTRACT, AnalysisType::Summary).await;

    assert_eq!(outcome.report.engine, FALLBACK_ENGINE);
    assert!(outcome.report.raw_analysis_text.starts_with("Legal Document Analysis (summary)"));
    assert!(outcome.report.raw_analysis_text.contains("AI service was unavailable"));
    assert!(outcome.degradations.iter().any(Degradation::is_upstream));
    assert!(outcome.confidence <= FALLBACK_CONFIDENCE);
    for kind in SectionKind::ALL {
        assert!(!outcome.report.lines(kind).is_empty());
    }
}

#[tokio::test]
async fn empty_document_skips_the_ai() {
    let h = scripted(vec![Ok("unused")], Duration::ZERO);

    let outcome = h.service.analyze("  $$$  ", AnalysisType::Comprehensive).await;

    assert_eq!(h.calls(), 0);
    assert!(outcome
        .degradations
        .iter()
        .any(|d| matches!(d, Degradation::InputDegraded { .. })));
    assert_eq!(outcome.chunk_count, 1);
    assert_eq!(outcome.report.engine, FALLBACK_ENGINE);
}

#[tokio::test]
async fn truncation_is_reported() {
    let service = AnalysisService::new(
        AiClient::unconfigured(),
        AnswerCache::new(4, Duration::from_secs(1)),
        AnalysisConfig {
            max_text_chars: 10,
            chunk_size: 40,
            top_k: 3,
        },
    );

    let outcome = service.analyze(CONTRACT, AnalysisType::Comprehensive).await;
    assert!(outcome.degradations.contains(&Degradation::Truncated {
        original_chars: 90,
        kept_chars: 10,
    }));
    assert!(outcome.report.raw_analysis_text.contains("- Document length: 10 characters"));
}

#[tokio::test]
async fn unconfigured_service_uses_configure_hint() {
    let service = unconfigured();
    assert!(!service.ai_configured());
    assert_eq!(service.engine(), "fallback");

    let outcome = service.analyze(CONTRACT, AnalysisType::Comprehensive).await;
    assert!(outcome.report.raw_analysis_text.contains("please configure your API key"));
}

// ── Answers ─────────────────────────────────────────────────────────

#[tokio::test]
async fn answer_is_grounded_on_retrieved_chunks() {
    let h = scripted(vec![Ok("Payment is due within 30 days.")], Duration::ZERO);

    let answer = h
        .service
        .answer(None, CONTRACT, "When is payment due within the month?")
        .await;

    assert_eq!(answer.answer, "Payment is due within 30 days.");
    assert_eq!(answer.relevant_chunks, vec![0]);
    assert_eq!(answer.sources, vec!["Chunk 1"]);
    assert_eq!(answer.engine, "scripted");
    assert!(answer.degradations.is_empty());
    let prompt = h.last_prompt();
    assert!(prompt.contains("Context:\nPay 500 within 30 days."));
}

#[tokio::test]
async fn empty_retrieval_still_answers_without_context() {
    let h = scripted(vec![Ok("The document does not say.")], Duration::ZERO);

    let answer = h.service.answer(None, CONTRACT, "What is the payment amount?").await;

    assert_eq!(answer.degradations, vec![Degradation::RetrievalEmpty]);
    assert!(answer.relevant_chunks.is_empty());
    assert!(h.last_prompt().contains("No passage of the document matched"));
}

#[tokio::test]
async fn failed_answer_falls_back_and_is_not_cached() {
    let h = scripted(vec![Err(429), Ok("Recovered answer")], Duration::ZERO);
    let doc = Uuid::new_v4();
    let question = "How long is the confidential period?";

    let first = h.service.answer(Some(doc), CONTRACT, question).await;
    assert_eq!(first.engine, FALLBACK_ENGINE);
    assert!(first.answer.contains(question));
    assert!(first.confidence <= FALLBACK_CONFIDENCE);
    assert!(first.degradations.iter().any(Degradation::is_upstream));

    let second = h.service.answer(Some(doc), CONTRACT, question).await;
    assert_eq!(second.answer, "Recovered answer");
    assert_eq!(h.calls(), 2);

    let third = h.service.answer(Some(doc), CONTRACT, question).await;
    assert_eq!(third, second);
    assert_eq!(h.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn concurrent_identical_questions_share_one_call() {
    let h = scripted(vec![Ok("Sixty days.")], Duration::from_secs(2));
    let doc = Uuid::new_v4();

    let asks = (0..4).map(|_| h.service.answer(Some(doc), CONTRACT, "notice period for termination"));
    let answers = futures::future::join_all(asks).await;

    assert_eq!(h.calls(), 1);
    assert!(answers.iter().all(|a| a.answer == "Sixty days."));
}

#[tokio::test]
async fn forget_drops_cached_answers() {
    let h = scripted(vec![Ok("one"), Ok("two")], Duration::ZERO);
    let doc = Uuid::new_v4();

    h.service.answer(Some(doc), CONTRACT, "notice terms").await;
    h.service.forget(doc);
    let again = h.service.answer(Some(doc), CONTRACT, "notice terms").await;

    assert_eq!(again.answer, "two");
    assert_eq!(h.calls(), 2);
}

#[tokio::test]
async fn empty_question_is_degraded_without_ai_call() {
    let h = scripted(vec![Ok("unused")], Duration::ZERO);

    let answer = h.service.answer(None, CONTRACT, "   ").await;

    assert_eq!(h.calls(), 0);
    assert_eq!(answer.engine, FALLBACK_ENGINE);
    assert!(answer
        .degradations
        .iter()
        .any(|d| matches!(d, Degradation::InputDegraded { .. })));
    assert_eq!(answer.sources, vec![FALLBACK_SOURCE]);
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn stored_analysis_rebuilds_the_same_report_text() {
    let h = scripted(vec![Ok("Key point: the vendor shall deliver.")], Duration::ZERO);
    let outcome = h.service.analyze(CONTRACT, AnalysisType::Clauses).await;

    let rebuilt = h.service.report_from_text(
        &outcome.report.raw_analysis_text,
        outcome.report.analysis_type,
        &outcome.report.engine,
    );
    assert_eq!(rebuilt.sections, outcome.report.sections);

    let meta = DocumentMeta::new("Supply Contract", CONTRACT);
    let text = h.service.assemble_report(&rebuilt, &meta, ReportKind::Full);
    assert!(text.contains("Key point: the vendor shall deliver."));
    assert!(text.contains(CONTRACT));
}

// ── Cancellation ────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn dropping_analysis_cancels_ai_call() {
    let (service, started, finished) = slow();

    let cut_short = tokio::time::timeout(
        Duration::from_secs(1),
        service.analyze(CONTRACT, AnalysisType::Comprehensive),
    )
    .await;
    assert!(cut_short.is_err());
    assert!(started.load(Ordering::SeqCst));

    // Well past the provider delay: the dropped call never resumes.
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert!(!finished.load(Ordering::SeqCst));
}

#[tokio::test(start_paused = true)]
async fn uncancelled_analysis_waits_for_ai_call() {
    let (service, _started, finished) = slow();

    let outcome = service.analyze(CONTRACT, AnalysisType::Comprehensive).await;
    assert!(finished.load(Ordering::SeqCst));
    assert_eq!(outcome.report.engine, "slow");
    assert!(outcome.degradations.is_empty());
}

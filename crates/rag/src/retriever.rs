//! Keyword retrieval over chunks.
//!
//! A question token is any whitespace-separated word longer than three
//! characters, lowercased. A chunk is relevant when its lowercased text
//! contains at least one token as a substring.

use serde::{Deserialize, Serialize};

use crate::chunker::Chunk;

/// Default number of chunks handed to a question prompt.
pub const DEFAULT_TOP_K: usize = 3;

/// Tokens of this many characters or fewer are ignored.
const MIN_TOKEN_CHARS: usize = 3;

/// How relevant chunks are ordered before the `top_k` cut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalOrder {
    /// First `top_k` relevant chunks in document order.
    #[default]
    Document,
    /// Highest score first; ties keep document order.
    Score,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    /// Number of distinct question tokens found in the chunk.
    pub score: usize,
}

/// Relevant chunks for one question. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub tokens: Vec<String>,
    pub chunks: Vec<ScoredChunk>,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn indices(&self) -> Vec<usize> {
        self.chunks.iter().map(|c| c.chunk.index).collect()
    }

    pub fn sources(&self) -> Vec<String> {
        self.chunks.iter().map(|c| c.chunk.label()).collect()
    }

    /// Chunk texts joined by blank lines, ready for a prompt.
    pub fn prompt_context(&self) -> String {
        self.chunks
            .iter()
            .map(|c| c.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Distinct lowercased question tokens, in first-seen order.
pub fn question_tokens(question: &str) -> Vec<String> {
    let mut tokens: Vec<String> = Vec::new();
    for word in question.to_lowercase().split_whitespace() {
        if word.chars().count() > MIN_TOKEN_CHARS && !tokens.iter().any(|t| t == word) {
            tokens.push(word.to_string());
        }
    }
    tokens
}

/// Retrieve in document order.
pub fn retrieve(question: &str, chunks: &[Chunk], top_k: usize) -> RetrievalResult {
    retrieve_ordered(question, chunks, top_k, RetrievalOrder::Document)
}

pub fn retrieve_ordered(
    question: &str,
    chunks: &[Chunk],
    top_k: usize,
    order: RetrievalOrder,
) -> RetrievalResult {
    let tokens = question_tokens(question);
    if tokens.is_empty() || top_k == 0 {
        return RetrievalResult {
            tokens,
            chunks: Vec::new(),
        };
    }

    let mut relevant: Vec<ScoredChunk> = chunks
        .iter()
        .filter_map(|chunk| {
            let haystack = chunk.text.to_lowercase();
            let score = tokens.iter().filter(|t| haystack.contains(t.as_str())).count();
            (score > 0).then(|| ScoredChunk {
                chunk: chunk.clone(),
                score,
            })
        })
        .collect();

    if order == RetrievalOrder::Score {
        // sort_by is stable, so equal scores stay in document order
        relevant.sort_by(|a, b| b.score.cmp(&a.score));
    }
    relevant.truncate(top_k);

    tracing::debug!(
        tokens = tokens.len(),
        matched = relevant.len(),
        ?order,
        "retrieved chunks"
    );
    RetrievalResult {
        tokens,
        chunks: relevant,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::chunk;

    const CONTRACT: &str =
        "Pay $500 within 30 days. Keep this confidential for 5 years. Terminate with 60 days notice.";

    fn contract_chunks() -> Vec<Chunk> {
        chunk(CONTRACT, 40)
    }

    #[test]
    fn tokens_skip_short_words_and_duplicates() {
        assert_eq!(
            question_tokens("What is the FEE and the fee?"),
            vec!["what".to_string(), "fee?".to_string()]
        );
        assert!(question_tokens("is it ok to go").is_empty());
        assert!(question_tokens("").is_empty());
    }

    #[test]
    fn payment_question_finds_the_payment_chunk() {
        let result = retrieve("When must the payment within days be made", &contract_chunks(), 3);
        assert_eq!(result.indices(), vec![0, 2]);
        assert_eq!(result.chunks[0].score, 2);
        assert_eq!(result.chunks[1].score, 1);
        assert_eq!(result.sources(), vec!["Chunk 1", "Chunk 3"]);
    }

    #[test]
    fn tokens_keep_their_punctuation() {
        // "amount?" and "payment" appear nowhere; "what" neither.
        let result = retrieve("What is the payment amount?", &contract_chunks(), 3);
        assert!(result.is_empty());
        assert_eq!(result.prompt_context(), "");
    }

    #[test]
    fn no_chunks_retrieves_nothing() {
        let result = retrieve("payment terms", &[], 3);
        assert!(result.is_empty());
        assert_eq!(result.prompt_context(), "");
        assert_eq!(result.tokens, vec!["payment".to_string(), "terms".to_string()]);

        let result = retrieve_ordered("payment terms", &[], 3, RetrievalOrder::Score);
        assert!(result.is_empty());
    }

    #[test]
    fn short_word_question_retrieves_nothing() {
        let result = retrieve("Is it ok?", &contract_chunks(), 3);
        assert!(result.is_empty());
        assert!(result.tokens.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_substring() {
        let result = retrieve("CONFIDENTIALITY terms? confidential", &contract_chunks(), 3);
        assert_eq!(result.indices(), vec![1]);
    }

    #[test]
    fn respects_top_k() {
        let chunks = chunk("Days one. Days two. Days three. Days four.", 5);
        assert_eq!(chunks.len(), 4);
        let result = retrieve("days", &chunks, 2);
        assert_eq!(result.indices(), vec![0, 1]);
        assert!(retrieve("days", &chunks, 0).is_empty());
    }

    #[test]
    fn score_order_ranks_by_distinct_tokens() {
        let chunks = chunk("Notice only. Notice and termination. Termination only.", 5);
        let result = retrieve_ordered("notice termination", &chunks, 2, RetrievalOrder::Score);
        assert_eq!(result.indices(), vec![1, 0]);

        let result = retrieve_ordered("notice termination", &chunks, 3, RetrievalOrder::Document);
        assert_eq!(result.indices(), vec![0, 1, 2]);
    }

    #[test]
    fn prompt_context_joins_with_blank_lines() {
        let result = retrieve("days", &contract_chunks(), 3);
        assert_eq!(
            result.prompt_context(),
            "Pay $500 within 30 days.\n\nTerminate with 60 days notice."
        );
    }

    #[test]
    fn results_are_subset_of_input_and_each_matches() {
        let chunks = contract_chunks();
        for question in ["keep years", "notice", "within confidential terminate"] {
            let result = retrieve(question, &chunks, DEFAULT_TOP_K);
            assert!(result.chunks.len() <= DEFAULT_TOP_K);
            for scored in &result.chunks {
                assert!(chunks.contains(&scored.chunk));
                let lower = scored.chunk.text.to_lowercase();
                assert!(result.tokens.iter().any(|t| lower.contains(t.as_str())));
            }
        }
    }
}

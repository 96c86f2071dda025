//! Document profiling: size, reading time, type, language and complexity.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

const WORDS_PER_MINUTE: usize = 200;

/// Function-word hits above this count mark a text as English.
const ENGLISH_THRESHOLD: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Contract,
    Policy,
    Nda,
    Sla,
    Terms,
    Invoice,
    Report,
    Document,
}

impl DocumentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::Policy => "policy",
            DocumentType::Nda => "nda",
            DocumentType::Sla => "sla",
            DocumentType::Terms => "terms",
            DocumentType::Invoice => "invoice",
            DocumentType::Report => "report",
            DocumentType::Document => "document",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProfile {
    pub word_count: usize,
    pub character_count: usize,
    pub reading_minutes: usize,
    pub reading_time: String,
    pub document_type: DocumentType,
    /// "en" or "unknown".
    pub language: String,
    pub complexity: Complexity,
    pub title: String,
}

// Patterns are matched against lowercased text; `.` stands for any separator.
static TYPE_PATTERNS: Lazy<Vec<(DocumentType, Regex)>> = Lazy::new(|| {
    [
        (DocumentType::Contract, r"\b(contract|agreement|party|parties|whereas|hereby)\b"),
        (DocumentType::Policy, r"\b(policy|procedure|guideline|standard|compliance)\b"),
        (DocumentType::Nda, r"\b(confidential|non.disclosure|proprietary|trade.secret)\b"),
        (DocumentType::Sla, r"\b(service.level|sla|uptime|availability|performance)\b"),
        (DocumentType::Terms, r"\b(terms.of.service|terms.and.conditions|user.agreement)\b"),
        (DocumentType::Invoice, r"\b(invoice|bill|payment|amount.due|total)\b"),
        (DocumentType::Report, r"\b(report|analysis|findings|summary|conclusion)\b"),
    ]
    .into_iter()
    .filter_map(|(kind, pattern)| match Regex::new(pattern) {
        Ok(re) => Some((kind, re)),
        Err(e) => {
            tracing::error!(%kind, error = %e, "invalid document type pattern");
            None
        }
    })
    .collect()
});

static ENGLISH_WORDS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)\b(the|and|or|but|in|on|at|to|for|of|with|by)\b").ok());

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Minutes at 200 words per minute, rounded up.
pub fn reading_minutes(text: &str) -> usize {
    word_count(text).div_ceil(WORDS_PER_MINUTE)
}

/// "1 minute", "3 minutes".
pub fn reading_time(text: &str) -> String {
    let minutes = reading_minutes(text);
    format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" })
}

/// The type whose pattern matches most often. Ties go to the earlier type;
/// no matches at all gives [`DocumentType::Document`].
pub fn detect_document_type(text: &str) -> DocumentType {
    let lower = text.to_lowercase();
    let mut best = (0usize, DocumentType::Document);
    for (kind, pattern) in TYPE_PATTERNS.iter() {
        let hits = pattern.find_iter(&lower).count();
        if hits > best.0 {
            best = (hits, *kind);
        }
    }
    best.1
}

pub fn detect_language(text: &str) -> &'static str {
    let hits = ENGLISH_WORDS
        .as_ref()
        .map_or(0, |re| re.find_iter(text).count());
    if hits > ENGLISH_THRESHOLD {
        "en"
    } else {
        "unknown"
    }
}

pub fn assess_complexity(text: &str) -> Complexity {
    let words = word_count(text);
    // Non-empty segments between terminators.
    let sentences = text
        .split(|c| matches!(c, '.' | '!' | '?'))
        .filter(|s| !s.is_empty())
        .count()
        .max(1);
    let avg = words as f64 / sentences as f64;

    if avg > 25.0 || words > 10_000 {
        Complexity::High
    } else if avg > 15.0 || words > 5_000 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

/// Human-facing document title guessed from the text.
pub fn display_title(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    if lower.contains("agreement") || lower.contains("contract") {
        "Contract/Agreement"
    } else if lower.contains("policy") {
        "Policy Document"
    } else if lower.contains("terms") {
        "Terms and Conditions"
    } else if lower.contains("license") {
        "License Agreement"
    } else {
        "Legal Document"
    }
}

pub fn profile(text: &str) -> DocumentProfile {
    DocumentProfile {
        word_count: word_count(text),
        character_count: text.chars().count(),
        reading_minutes: reading_minutes(text),
        reading_time: reading_time(text),
        document_type: detect_document_type(text),
        language: detect_language(text).to_string(),
        complexity: assess_complexity(text),
        title: display_title(text).to_string(),
    }
}

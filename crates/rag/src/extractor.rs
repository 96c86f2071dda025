//! Keyword section extraction.
//!
//! Each line of an AI analysis is tested against every section's rule
//! independently, so one line may land in several sections. Matching is
//! literal, case-insensitive substring containment: "requires" does not match
//! the keyword "required".

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use lexis_llm::AnalysisType;
use serde::{Deserialize, Serialize};

// ── Keyword sets ────────────────────────────────────────────────────

pub const KEY_POINT_KEYWORDS: &[&str] = &["key", "important", "main"];

/// Leading characters that mark a line as a list item.
pub const KEY_POINT_MARKERS: &[char] = &['-', '*', '•'];

pub const PARTY_KEYWORDS: &[&str] = &[
    "party",
    "parties",
    "client",
    "contractor",
    "vendor",
    "company",
    "organization",
];

pub const TERMS_KEYWORDS: &[&str] = &["term", "condition", "clause", "provision", "requirement"];

pub const OBLIGATION_KEYWORDS: &[&str] = &[
    "obligation",
    "responsibility",
    "duty",
    "must",
    "shall",
    "required",
];

pub const DATE_KEYWORDS: &[&str] = &["date", "deadline", "due", "expire", "term", "period"];

pub const FINANCIAL_KEYWORDS: &[&str] = &[
    "payment",
    "fee",
    "cost",
    "price",
    "amount",
    "money",
    "financial",
    "compensation",
];

pub const RISK_KEYWORDS: &[&str] = &["risk", "warning", "caution", "liability", "penalty", "breach"];

pub const RECOMMENDATION_KEYWORDS: &[&str] =
    &["recommend", "suggest", "advice", "should", "consider"];

// ── Sections ────────────────────────────────────────────────────────

/// Report sections, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    KeyPoints,
    Parties,
    TermsAndConditions,
    Obligations,
    DatesAndDeadlines,
    FinancialTerms,
    Risks,
    Recommendations,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::KeyPoints,
        SectionKind::Parties,
        SectionKind::TermsAndConditions,
        SectionKind::Obligations,
        SectionKind::DatesAndDeadlines,
        SectionKind::FinancialTerms,
        SectionKind::Risks,
        SectionKind::Recommendations,
    ];

    /// Heading used in assembled reports.
    pub fn heading(self) -> &'static str {
        match self {
            SectionKind::KeyPoints => "KEY POINTS SUMMARY",
            SectionKind::Parties => "MAIN PARTIES",
            SectionKind::TermsAndConditions => "IMPORTANT TERMS & CONDITIONS",
            SectionKind::Obligations => "OBLIGATIONS & RESPONSIBILITIES",
            SectionKind::DatesAndDeadlines => "DATES & DEADLINES",
            SectionKind::FinancialTerms => "FINANCIAL TERMS",
            SectionKind::Risks => "RISKS & CONSIDERATIONS",
            SectionKind::Recommendations => "RECOMMENDATIONS",
        }
    }

    /// Keyword set for the section. Key points also accept list markers.
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            SectionKind::KeyPoints => KEY_POINT_KEYWORDS,
            SectionKind::Parties => PARTY_KEYWORDS,
            SectionKind::TermsAndConditions => TERMS_KEYWORDS,
            SectionKind::Obligations => OBLIGATION_KEYWORDS,
            SectionKind::DatesAndDeadlines => DATE_KEYWORDS,
            SectionKind::FinancialTerms => FINANCIAL_KEYWORDS,
            SectionKind::Risks => RISK_KEYWORDS,
            SectionKind::Recommendations => RECOMMENDATION_KEYWORDS,
        }
    }

    /// Maximum lines kept per section. Key points are capped like every other
    /// section instead of being listed in full.
    pub fn cap(self) -> usize {
        match self {
            SectionKind::Parties => 5,
            _ => 3,
        }
    }

    /// Placeholder used when no line matched.
    pub fn fallback(self) -> &'static str {
        match self {
            SectionKind::KeyPoints => {
                "Key points extracted from AI analysis (see full analysis for details)"
            }
            SectionKind::Parties => "Parties information available in full analysis",
            SectionKind::TermsAndConditions => "Terms and conditions detailed in full analysis",
            SectionKind::Obligations => "Obligations detailed in full analysis",
            SectionKind::DatesAndDeadlines => "Dates and deadlines detailed in full analysis",
            SectionKind::FinancialTerms => "Financial terms detailed in full analysis",
            SectionKind::Risks => "Risk assessment available in full analysis",
            SectionKind::Recommendations => "Recommendations available in full analysis",
        }
    }

    /// Whether a trimmed line belongs in this section.
    pub fn matches(self, line: &str) -> bool {
        if self == SectionKind::KeyPoints && starts_with_marker(line) {
            return true;
        }
        let lower = line.to_lowercase();
        self.keywords().iter().any(|k| lower.contains(k))
    }
}

fn starts_with_marker(line: &str) -> bool {
    line.chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit() || KEY_POINT_MARKERS.contains(&c))
}

/// Lines for one section. Never empty: unmatched sections carry their fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub lines: Vec<String>,
    pub is_fallback: bool,
}

impl Section {
    fn from_matches(kind: SectionKind, lines: Vec<String>) -> Self {
        if lines.is_empty() {
            Self {
                lines: vec![kind.fallback().to_string()],
                is_fallback: true,
            }
        } else {
            Self {
                lines,
                is_fallback: false,
            }
        }
    }
}

/// Structured view of one AI analysis. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sections: BTreeMap<SectionKind, Section>,
    pub raw_analysis_text: String,
    pub generated_at: DateTime<Utc>,
    pub analysis_type: AnalysisType,
    /// Provider that produced the analysis text, or "fallback".
    pub engine: String,
}

impl AnalysisReport {
    /// Lines for `kind`; the fallback placeholder when nothing matched.
    pub fn lines(&self, kind: SectionKind) -> &[String] {
        self.sections
            .get(&kind)
            .map(|s| s.lines.as_slice())
            .unwrap_or_default()
    }

    pub fn is_fallback(&self, kind: SectionKind) -> bool {
        self.sections.get(&kind).map_or(true, |s| s.is_fallback)
    }
}

/// Classify every line of `analysis_text` into report sections.
pub fn extract(analysis_text: &str) -> AnalysisReport {
    extract_as(analysis_text, AnalysisType::Comprehensive, "fallback")
}

/// [`extract`] with the analysis type and engine recorded on the report.
pub fn extract_as(analysis_text: &str, analysis_type: AnalysisType, engine: &str) -> AnalysisReport {
    let mut matched: BTreeMap<SectionKind, Vec<String>> =
        SectionKind::ALL.iter().map(|k| (*k, Vec::new())).collect();

    for line in analysis_text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        for kind in SectionKind::ALL {
            let Some(lines) = matched.get_mut(&kind) else {
                continue;
            };
            if lines.len() < kind.cap() && kind.matches(line) {
                lines.push(line.to_string());
            }
        }
    }

    let sections: BTreeMap<SectionKind, Section> = matched
        .into_iter()
        .map(|(kind, lines)| (kind, Section::from_matches(kind, lines)))
        .collect();

    let fallbacks = sections.values().filter(|s| s.is_fallback).count();
    tracing::debug!(fallbacks, "extracted report sections");

    AnalysisReport {
        sections,
        raw_analysis_text: analysis_text.to_string(),
        generated_at: Utc::now(),
        analysis_type,
        engine: engine.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_line_uses_literal_substrings() {
        let report = extract("The termination clause requires 60 days notice.");
        let line = "The termination clause requires 60 days notice.".to_string();

        assert_eq!(report.lines(SectionKind::TermsAndConditions), &[line.clone()]);
        // "term" is also a date keyword.
        assert_eq!(report.lines(SectionKind::DatesAndDeadlines), &[line]);
        // "requires" is not "required".
        assert!(report.is_fallback(SectionKind::Obligations));
        assert_eq!(
            report.lines(SectionKind::Obligations),
            &["Obligations detailed in full analysis".to_string()]
        );
    }

    #[test]
    fn missing_risks_use_placeholder() {
        let report = extract("The vendor shall deliver goods.");
        assert!(report.is_fallback(SectionKind::Risks));
        assert_eq!(
            report.lines(SectionKind::Risks),
            &["Risk assessment available in full analysis".to_string()]
        );
        assert!(!report.is_fallback(SectionKind::Parties));
        assert!(!report.is_fallback(SectionKind::Obligations));
    }

    #[test]
    fn empty_text_is_all_fallbacks() {
        let report = extract("");
        for kind in SectionKind::ALL {
            assert!(report.is_fallback(kind));
            assert_eq!(report.lines(kind), &[kind.fallback().to_string()]);
        }
        assert_eq!(report.raw_analysis_text, "");
    }

    #[test]
    fn key_points_accept_markers_and_keywords() {
        let text = "- first bullet\n* second\n• third\n4. numbered\nThe main idea\nplain line";
        let report = extract(text);
        assert_eq!(
            report.lines(SectionKind::KeyPoints),
            &[
                "- first bullet".to_string(),
                "* second".to_string(),
                "• third".to_string(),
            ]
        );

        let report = extract("plain line\nAn IMPORTANT notice");
        assert_eq!(
            report.lines(SectionKind::KeyPoints),
            &["An IMPORTANT notice".to_string()]
        );
    }

    #[test]
    fn lines_are_trimmed_and_blank_lines_skipped() {
        let report = extract("\n\n   The client pays.   \n\t\n");
        assert_eq!(report.lines(SectionKind::Parties), &["The client pays.".to_string()]);
    }

    #[test]
    fn caps_limit_section_size() {
        let text = (0..10)
            .map(|i| format!("Party {i} has a payment risk"))
            .collect::<Vec<_>>()
            .join("\n");
        let report = extract(&text);
        assert_eq!(report.lines(SectionKind::Parties).len(), 5);
        assert_eq!(report.lines(SectionKind::FinancialTerms).len(), 3);
        assert_eq!(report.lines(SectionKind::Risks).len(), 3);
        assert_eq!(report.lines(SectionKind::Parties)[0], "Party 0 has a payment risk");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let report = extract("WE RECOMMEND REVIEW");
        assert_eq!(report.lines(SectionKind::Recommendations).len(), 1);
    }

    #[test]
    fn every_section_present_and_non_empty() {
        for text in ["", "x", "1. Payment due date for the client\nRisk: breach"] {
            let report = extract(text);
            assert_eq!(report.sections.len(), SectionKind::ALL.len());
            for kind in SectionKind::ALL {
                assert!(!report.lines(kind).is_empty());
                assert!(report.lines(kind).len() <= kind.cap());
            }
        }
    }

    #[test]
    fn extract_as_records_metadata() {
        let report = extract_as("text", AnalysisType::Parties, "gemini");
        assert_eq!(report.analysis_type, AnalysisType::Parties);
        assert_eq!(report.engine, "gemini");
    }
}

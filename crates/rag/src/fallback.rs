//! Deterministic stand-ins for AI output.
//!
//! Used whenever the AI collaborator is unconfigured or fails. The text is
//! labelled as fallback and laid out so section extraction still finds
//! key points, risks and recommendations in it.

use lexis_llm::AnalysisType;

use crate::profile;
use crate::risk::{self, RiskLevel};

/// Upper bound on the confidence reported for fallback output.
pub const FALLBACK_CONFIDENCE: f64 = 0.7;

/// Source label for answers produced without retrieved context.
pub const FALLBACK_SOURCE: &str = "Document Context";

fn closing_note(ai_configured: bool) -> &'static str {
    if ai_configured {
        "This is a fallback analysis because the AI service was unavailable. Retry later for a detailed AI analysis."
    } else {
        "This is a fallback analysis. For detailed AI analysis, please configure your API key."
    }
}

/// Keyword-driven analysis of `document_text`.
pub fn fallback_analysis(
    document_text: &str,
    analysis_type: AnalysisType,
    ai_configured: bool,
) -> String {
    let doc_profile = profile::profile(document_text);
    let risks = risk::assess(document_text);

    let mut out = String::new();
    out.push_str(&format!("Legal Document Analysis ({analysis_type})\n\n"));
    out.push_str(&format!("Document Type: {}\n\n", doc_profile.title));

    out.push_str("Key Information:\n");
    out.push_str(&format!(
        "- Document length: {} characters\n",
        doc_profile.character_count
    ));
    out.push_str(&format!(
        "- Estimated reading time: {}\n",
        doc_profile.reading_time
    ));
    out.push_str(&format!(
        "- Detected category: {}, complexity {:?}\n\n",
        doc_profile.document_type, doc_profile.complexity
    ));

    out.push_str("Risk Overview:\n");
    for category in &risks.categories {
        out.push_str(&format!(
            "{} risk level {}: {}\n",
            category.category.label(),
            category.level.as_str(),
            category.findings.join("; ")
        ));
    }
    if risks.overall != RiskLevel::Low {
        out.push_str(&format!(
            "Overall risk level: {}\n",
            risks.overall.as_str()
        ));
    }
    out.push('\n');

    for recommendation in &risks.recommendations {
        out.push_str(&format!("Recommendation: {recommendation}\n"));
    }
    out.push('\n');
    out.push_str(closing_note(ai_configured));
    out
}

/// Holding answer for a question the AI could not answer.
pub fn fallback_answer(question: &str, has_context: bool, ai_configured: bool) -> String {
    let context_note = if has_context {
        "The relevant context has been identified and can be analyzed further with proper AI integration."
    } else {
        "No passage of the document matched the question's keywords."
    };
    let ai_note = if ai_configured {
        "However, the AI service is currently unavailable."
    } else {
        "However, for detailed AI-powered responses, please configure your API key."
    };
    format!(
        "Based on the document context, I can see information related to your question about \"{question}\". {ai_note} {context_note}"
    )
}

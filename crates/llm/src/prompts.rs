//! Prompt templates for document analysis and grounded question answering.

use serde::{Deserialize, Serialize};

pub const SYSTEM_PROMPT: &str = "You are a legal document analysis expert.";

/// Which analysis prompt to run over a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisType {
    #[default]
    Comprehensive,
    Summary,
    Clauses,
    Parties,
}

impl AnalysisType {
    /// Case-insensitive parse; anything unrecognised is `Comprehensive`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "summary" => AnalysisType::Summary,
            "clauses" => AnalysisType::Clauses,
            "parties" => AnalysisType::Parties,
            _ => AnalysisType::Comprehensive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Comprehensive => "comprehensive",
            AnalysisType::Summary => "summary",
            AnalysisType::Clauses => "clauses",
            AnalysisType::Parties => "parties",
        }
    }

    fn instructions(&self) -> &'static str {
        match self {
            AnalysisType::Comprehensive => {
                "Please provide a comprehensive analysis of this legal document. Include:

1. Document Type: What type of legal document is this?
2. Key Parties: Who are the main parties involved?
3. Main Purpose: What is the primary purpose of this document?
4. Key Terms & Clauses: List the most important clauses and terms
5. Obligations: What are the key obligations for each party?
6. Important Dates: Any critical dates, deadlines, or durations
7. Financial Terms: Any monetary amounts, payment terms, or financial obligations
8. Risk Factors: Potential risks or concerning clauses
9. Termination Conditions: How can this agreement be terminated?
10. Summary: A concise summary of the document and your recommendations"
            }
            AnalysisType::Summary => {
                "Please provide a concise summary of this legal document including:
- Document type and purpose
- Key parties involved
- Main terms and obligations
- Important dates and amounts"
            }
            AnalysisType::Clauses => {
                "Please extract and categorize all clauses from this legal document:
- Liability clauses
- Confidentiality clauses
- Termination clauses
- Payment clauses
- Intellectual property clauses
- Force majeure clauses
- Dispute resolution clauses
- Other important clauses

For each clause, provide the clause text and explain its significance."
            }
            AnalysisType::Parties => {
                "Please identify all parties mentioned in this legal document:
- Primary parties (main signatories)
- Secondary parties (witnesses, guarantors, etc.)
- Third parties mentioned
- Roles and responsibilities of each party"
            }
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prompt asking for a structured analysis of the whole document.
pub fn analysis_prompt(document_text: &str, analysis_type: AnalysisType) -> String {
    format!(
        "{}\n\nProvide the response in a structured format with clear sections, \
         one finding per line.\n\nDocument Content:\n{}",
        analysis_type.instructions(),
        document_text
    )
}

/// Prompt asking a question against retrieved context.
///
/// An empty context switches to a prompt that tells the model no supporting
/// passage was found.
pub fn question_prompt(question: &str, context: &str) -> String {
    if context.trim().is_empty() {
        format!(
            "Answer this question about a legal document: {question}\n\n\
             No passage of the document matched the question. Say so clearly, \
             then give general guidance and state that it is not grounded in the document."
        )
    } else {
        format!(
            "Based on the following document context, answer this question: {question}\n\n\
             Context:\n{context}\n\n\
             Provide a clear, accurate answer based only on the provided context. \
             Quote the relevant passages and state plainly if the context does not contain the answer."
        )
    }
}

//! Plain-text report assembly for download.
//!
//! The output is meant for people, not for parsing. Keep the
//! [`AnalysisReport`] around if structure is needed later.

use lexis_core::DocumentMeta;
use serde::{Deserialize, Serialize};

use crate::extractor::{AnalysisReport, SectionKind};

pub const SIMPLIFIED_FOOTER: &str = "---\n\
This simplified form is generated by AI and should be reviewed by a legal professional.\n\
For the complete analysis, please refer to the full analysis document.";

pub const DISCLAIMER: &str = "This analysis is generated by artificial intelligence and is intended for informational\n\
purposes only. It should not be considered as legal advice. Please consult with a\n\
qualified legal professional for official legal guidance and interpretation.";

const FULL_FOOTER: &str = "---\nReport generated by Legal Document Analyzer";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    #[default]
    Simplified,
    Full,
}

impl ReportKind {
    /// Case-insensitive; anything other than "full" is `Simplified`.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("full") {
            ReportKind::Full
        } else {
            ReportKind::Simplified
        }
    }

    /// Download file name for a document title.
    pub fn file_name(self, meta: &DocumentMeta) -> String {
        let prefix = match self {
            ReportKind::Simplified => "simplified",
            ReportKind::Full => "full-analysis",
        };
        format!("{prefix}-{}.txt", meta.file_stem())
    }
}

/// Append `text` and a newline.
fn line(out: &mut String, text: &str) {
    out.push_str(text);
    out.push('\n');
}

fn heading(out: &mut String, title: &str, rule: char) {
    line(out, title);
    line(out, &rule.to_string().repeat(title.chars().count()));
}

fn section_body(out: &mut String, report: &AnalysisReport, kind: SectionKind) {
    let lines = report.lines(kind);
    if lines.is_empty() {
        // Reports never show a blank body, even for a hand-built report.
        line(out, kind.fallback());
    } else {
        for text in lines {
            line(out, text);
        }
    }
}

fn header(out: &mut String, title: &str, meta: &DocumentMeta, engine: &str) {
    heading(out, title, '=');
    out.push('\n');
    line(out, &format!("Document Title: {}", meta.title));
    line(
        out,
        &format!(
            "Generated on: {} at {}",
            meta.generated_at.format("%Y-%m-%d"),
            meta.generated_at.format("%H:%M:%S UTC")
        ),
    );
    line(out, &format!("Generated by: Legal Document Analyzer AI ({engine})"));
    out.push('\n');
}

fn overview(out: &mut String, report: &AnalysisReport, meta: &DocumentMeta) {
    heading(out, "DOCUMENT OVERVIEW", '-');
    line(out, &format!("Document Name: {}", meta.title));
    line(
        out,
        &format!(
            "Original Document Length: {} characters",
            meta.original_text.chars().count()
        ),
    );
    line(out, &format!("Analysis Type: {}", report.analysis_type));
    line(
        out,
        &format!("Analysis Date: {}", report.generated_at.format("%Y-%m-%d")),
    );
    out.push('\n');
}

fn sections(out: &mut String, report: &AnalysisReport) {
    for kind in SectionKind::ALL {
        heading(out, kind.heading(), '-');
        section_body(out, report, kind);
        out.push('\n');
    }
}

/// Render `report` as a downloadable text document.
///
/// Full reports carry every simplified section, then the raw analysis, the
/// original document text, technical details and a disclaimer.
pub fn assemble(report: &AnalysisReport, meta: &DocumentMeta, kind: ReportKind) -> String {
    let mut out = String::new();
    match kind {
        ReportKind::Simplified => {
            header(&mut out, "SIMPLIFIED LEGAL DOCUMENT SUMMARY", meta, &report.engine);
            overview(&mut out, report, meta);
            sections(&mut out, report);
            out.push_str(SIMPLIFIED_FOOTER);
        }
        ReportKind::Full => {
            header(
                &mut out,
                "COMPREHENSIVE LEGAL DOCUMENT ANALYSIS REPORT",
                meta,
                &report.engine,
            );
            overview(&mut out, report, meta);
            sections(&mut out, report);

            heading(&mut out, "FULL AI ANALYSIS", '-');
            line(&mut out, &report.raw_analysis_text);
            out.push('\n');

            heading(&mut out, "ORIGINAL DOCUMENT TEXT", '-');
            line(&mut out, &meta.original_text);
            out.push('\n');

            heading(&mut out, "TECHNICAL DETAILS", '-');
            line(&mut out, &format!("AI Model: {}", report.engine));
            line(
                &mut out,
                &format!(
                    "Analysis Generated: {}",
                    report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
                ),
            );
            line(
                &mut out,
                "Analysis Method: Natural Language Processing with keyword section extraction",
            );
            out.push('\n');

            heading(&mut out, "DISCLAIMER", '-');
            line(&mut out, DISCLAIMER);
            out.push('\n');
            out.push_str(SIMPLIFIED_FOOTER);
            out.push('\n');
            out.push_str(FULL_FOOTER);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;
    use lexis_llm::AnalysisType;

    use super::*;
    use crate::extractor::extract;

    fn meta() -> DocumentMeta {
        DocumentMeta::new("Lease Agreement", "Tenant pays rent.")
    }

    #[test]
    fn empty_simplified_report_has_only_placeholders() {
        let out = assemble(&extract(""), &meta(), ReportKind::Simplified);
        assert!(out.starts_with("SIMPLIFIED LEGAL DOCUMENT SUMMARY\n================================="));
        for kind in SectionKind::ALL {
            let at = out.find(kind.heading()).unwrap();
            let body = out[at..].lines().nth(2).unwrap();
            assert_eq!(body, kind.fallback());
        }
        assert!(out.ends_with(SIMPLIFIED_FOOTER));
        assert!(!out.contains("ORIGINAL DOCUMENT TEXT"));
    }

    #[test]
    fn hand_built_empty_sections_still_render_placeholders() {
        let report = AnalysisReport {
            sections: BTreeMap::new(),
            raw_analysis_text: String::new(),
            generated_at: Utc::now(),
            analysis_type: AnalysisType::Comprehensive,
            engine: "fallback".into(),
        };
        let out = assemble(&report, &meta(), ReportKind::Simplified);
        assert!(out.contains("Risk assessment available in full analysis"));
        assert!(!out.contains("RISKS & CONSIDERATIONS\n----------------------\n\n"));
    }

    #[test]
    fn simplified_lists_extracted_lines_in_order() {
        let report = extract("The client must pay the fee.\nRisk: late payment penalty.");
        let out = assemble(&report, &meta(), ReportKind::Simplified);
        let parties = out.find("MAIN PARTIES").unwrap();
        let financial = out.find("FINANCIAL TERMS").unwrap();
        let risks = out.find("RISKS & CONSIDERATIONS").unwrap();
        assert!(parties < financial && financial < risks);
        assert!(out[parties..financial].contains("The client must pay the fee."));
        assert!(out[risks..].contains("Risk: late payment penalty."));
        assert!(out.contains("Original Document Length: 17 characters"));
    }

    #[test]
    fn full_report_is_superset_of_simplified() {
        let report = extract("Key: the vendor shall deliver.");
        let meta = meta();
        let simplified = assemble(&report, &meta, ReportKind::Simplified);
        let full = assemble(&report, &meta, ReportKind::Full);

        for line in simplified.lines().skip(2) {
            assert!(full.contains(line), "missing {line:?}");
        }
        assert!(full.starts_with("COMPREHENSIVE LEGAL DOCUMENT ANALYSIS REPORT"));
        assert!(full.contains("ORIGINAL DOCUMENT TEXT\n----------------------\nTenant pays rent."));
        assert!(full.contains("FULL AI ANALYSIS\n----------------\nKey: the vendor shall deliver."));
        assert!(full.contains(DISCLAIMER));
        assert!(full.ends_with("Report generated by Legal Document Analyzer"));
    }

    #[test]
    fn header_and_overview_lines_are_newline_terminated() {
        let report = extract("");
        let out = assemble(&report, &meta(), ReportKind::Simplified);
        assert!(out.contains(
            "\n\nDocument Title: Lease Agreement\nGenerated on: "
        ));
        assert!(out.contains("Generated by: Legal Document Analyzer AI (fallback)\n\n"));
        assert!(out.contains(
            "DOCUMENT OVERVIEW\n-----------------\n\
             Document Name: Lease Agreement\n\
             Original Document Length: 17 characters\n\
             Analysis Type: comprehensive\n"
        ));
        let date = report.generated_at.format("%Y-%m-%d").to_string();
        assert!(out.contains(&format!("Analysis Date: {date}\n\nKEY POINTS SUMMARY\n")));
    }

    #[test]
    fn report_kind_parse_and_file_names() {
        assert_eq!(ReportKind::parse("FULL"), ReportKind::Full);
        assert_eq!(ReportKind::parse("simplified"), ReportKind::Simplified);
        assert_eq!(ReportKind::parse("other"), ReportKind::Simplified);
        assert_eq!(ReportKind::Simplified.file_name(&meta()), "simplified-Lease_Agreement.txt");
        assert_eq!(ReportKind::Full.file_name(&meta()), "full-analysis-Lease_Agreement.txt");
    }
}

//! Keyword risk assessment across legal, financial and operational categories.

use serde::{Deserialize, Serialize};

pub const LEGAL_RISK_KEYWORDS: &[&str] = &["liability", "breach", "penalty", "lawsuit"];
pub const FINANCIAL_RISK_KEYWORDS: &[&str] = &["payment", "cost", "fee", "penalty"];
pub const OPERATIONAL_RISK_KEYWORDS: &[&str] = &["performance", "delivery", "timeline", "resource"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Legal,
    Financial,
    Operational,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [
        RiskCategory::Legal,
        RiskCategory::Financial,
        RiskCategory::Operational,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Legal => "Legal",
            RiskCategory::Financial => "Financial",
            RiskCategory::Operational => "Operational",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            RiskCategory::Legal => LEGAL_RISK_KEYWORDS,
            RiskCategory::Financial => FINANCIAL_RISK_KEYWORDS,
            RiskCategory::Operational => OPERATIONAL_RISK_KEYWORDS,
        }
    }

    /// Keyword whose presence yields this category's specific finding.
    fn signal(self) -> (&'static str, &'static str) {
        match self {
            RiskCategory::Legal => ("liability", "Liability clauses identified"),
            RiskCategory::Financial => ("payment", "Payment terms specified"),
            RiskCategory::Operational => ("performance", "Performance requirements defined"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    fn from_matches(matches: usize) -> Self {
        match matches {
            0 => RiskLevel::Low,
            1 | 2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRisk {
    pub category: RiskCategory,
    pub level: RiskLevel,
    /// Share of the category's keywords present in the text.
    pub score: f64,
    pub findings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub overall: RiskLevel,
    pub categories: Vec<CategoryRisk>,
    pub recommendations: Vec<String>,
}

pub fn assess_category(text: &str, category: RiskCategory) -> CategoryRisk {
    let lower = text.to_lowercase();
    let keywords = category.keywords();
    let matches = keywords.iter().filter(|k| lower.contains(*k)).count();

    let (signal, finding) = category.signal();
    let findings = if lower.contains(signal) {
        vec![finding.to_string()]
    } else {
        vec!["Standard terms identified".to_string()]
    };

    CategoryRisk {
        category,
        level: RiskLevel::from_matches(matches),
        score: matches as f64 / keywords.len() as f64,
        findings,
    }
}

/// Any High category makes the whole document High; two or more Medium make it Medium.
pub fn overall_level(categories: &[CategoryRisk]) -> RiskLevel {
    let high = categories.iter().filter(|c| c.level == RiskLevel::High).count();
    let medium = categories.iter().filter(|c| c.level == RiskLevel::Medium).count();
    if high > 0 {
        RiskLevel::High
    } else if medium > 1 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn assess(text: &str) -> RiskAssessment {
    let categories: Vec<CategoryRisk> = RiskCategory::ALL
        .iter()
        .map(|c| assess_category(text, *c))
        .collect();

    let mut recommendations: Vec<String> = categories
        .iter()
        .filter(|c| c.level == RiskLevel::High)
        .map(|c| format!("Address high {} risk factors", c.category.label()))
        .collect();
    if recommendations.is_empty() {
        recommendations.push("Continue monitoring identified risk factors".to_string());
    }

    RiskAssessment {
        overall: overall_level(&categories),
        categories,
        recommendations,
    }
}

//! Heuristic confidence figures.
//!
//! A weighted sum of four factors in `[0, 1]`. It is not a calibrated
//! probability.

use serde::{Deserialize, Serialize};

pub const MODEL_PERFORMANCE_WEIGHT: f64 = 0.4;
pub const TEXT_QUALITY_WEIGHT: f64 = 0.3;
pub const DOCUMENT_TYPE_WEIGHT: f64 = 0.2;
pub const CONTENT_LENGTH_WEIGHT: f64 = 0.1;

pub const DEFAULT_TEXT_QUALITY: f64 = 0.8;
pub const DEFAULT_MODEL_PERFORMANCE: f64 = 0.9;
pub const DEFAULT_DOCUMENT_TYPE_MATCH: f64 = 0.85;
pub const DEFAULT_CONTENT_LENGTH: f64 = 0.75;

/// Model performance assumed for deterministic fallback output.
pub const FALLBACK_MODEL_PERFORMANCE: f64 = 0.5;

/// Documents at or above this many words count as full length.
const FULL_LENGTH_WORDS: usize = 500;

/// Inputs to [`estimate`]. Missing factors take their baseline default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceFactors {
    pub text_quality: Option<f64>,
    pub model_performance: Option<f64>,
    pub document_type_match: Option<f64>,
    pub content_length: Option<f64>,
}

impl ConfidenceFactors {
    /// Factors for an analysis of a document.
    ///
    /// `kept_ratio` is the share of cleaned characters that survived the
    /// length ceiling, `type_detected` whether profiling recognised a concrete
    /// document type, and `model_hint` the provider's hint (`None` for fallback).
    pub fn for_analysis(
        kept_ratio: f64,
        type_detected: bool,
        word_count: usize,
        model_hint: Option<f64>,
    ) -> Self {
        Self {
            text_quality: Some(kept_ratio),
            model_performance: Some(model_hint.unwrap_or(FALLBACK_MODEL_PERFORMANCE)),
            document_type_match: type_detected.then_some(DEFAULT_DOCUMENT_TYPE_MATCH),
            content_length: Some(length_factor(word_count)),
        }
    }

    /// Factors for an answer: retrieval coverage stands in for text quality.
    pub fn for_answer(retrieved: usize, top_k: usize, model_hint: Option<f64>) -> Self {
        let coverage = if top_k == 0 {
            0.0
        } else {
            retrieved as f64 / top_k as f64
        };
        Self {
            text_quality: Some(coverage),
            model_performance: Some(model_hint.unwrap_or(FALLBACK_MODEL_PERFORMANCE)),
            document_type_match: None,
            content_length: None,
        }
    }
}

fn length_factor(word_count: usize) -> f64 {
    (word_count as f64 / FULL_LENGTH_WORDS as f64).min(1.0)
}

/// Weighted sum of the factors, clamped to `[0, 1]` and rounded to 2 places.
pub fn estimate(factors: &ConfidenceFactors) -> f64 {
    let factor = |v: Option<f64>, default: f64| clamp_unit(v.unwrap_or(default));

    let score = factor(factors.text_quality, DEFAULT_TEXT_QUALITY) * TEXT_QUALITY_WEIGHT
        + factor(factors.model_performance, DEFAULT_MODEL_PERFORMANCE) * MODEL_PERFORMANCE_WEIGHT
        + factor(factors.document_type_match, DEFAULT_DOCUMENT_TYPE_MATCH) * DOCUMENT_TYPE_WEIGHT
        + factor(factors.content_length, DEFAULT_CONTENT_LENGTH) * CONTENT_LENGTH_WEIGHT;

    round2(clamp_unit(score))
}

fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Round half away from zero at 2 places. The first pass drops float noise so
/// that a sum landing just under 0.845 still rounds to 0.85.
fn round2(v: f64) -> f64 {
    let settled = (v * 1e6).round() / 1e6;
    (settled * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_defaults_give_fixed_constant() {
        assert_eq!(estimate(&ConfidenceFactors::default()), 0.85);
    }

    #[test]
    fn all_ones_and_zeros() {
        let ones = ConfidenceFactors {
            text_quality: Some(1.0),
            model_performance: Some(1.0),
            document_type_match: Some(1.0),
            content_length: Some(1.0),
        };
        assert_eq!(estimate(&ones), 1.0);

        let zeros = ConfidenceFactors {
            text_quality: Some(0.0),
            model_performance: Some(0.0),
            document_type_match: Some(0.0),
            content_length: Some(0.0),
        };
        assert_eq!(estimate(&zeros), 0.0);
    }

    #[test]
    fn out_of_range_factors_are_clamped() {
        let wild = ConfidenceFactors {
            text_quality: Some(7.0),
            model_performance: Some(-3.0),
            document_type_match: Some(f64::NAN),
            content_length: Some(1.0),
        };
        // 0.3 * 1 + 0.4 * 0 + 0.2 * 0 + 0.1 * 1
        assert_eq!(estimate(&wild), 0.4);
    }

    #[test]
    fn model_weight_dominates() {
        let weak_model = ConfidenceFactors {
            model_performance: Some(0.0),
            ..Default::default()
        };
        // 0.24 + 0 + 0.17 + 0.075 = 0.485
        assert_eq!(estimate(&weak_model), 0.49);
    }

    #[test]
    fn fallback_scores_below_ai() {
        let ai = estimate(&ConfidenceFactors::for_analysis(1.0, true, 800, Some(0.9)));
        let fallback = estimate(&ConfidenceFactors::for_analysis(1.0, true, 800, None));
        assert!(ai > fallback);
        // 0.3 + 0.36 + 0.17 + 0.1
        assert_eq!(ai, 0.93);
    }

    #[test]
    fn answer_factors_track_coverage() {
        let full = estimate(&ConfidenceFactors::for_answer(3, 3, Some(0.9)));
        let none = estimate(&ConfidenceFactors::for_answer(0, 3, Some(0.9)));
        assert!(full > none);
        assert_eq!(ConfidenceFactors::for_answer(1, 0, None).text_quality, Some(0.0));
    }

    #[test]
    fn result_stays_in_unit_interval() {
        for tq in [0.0, 0.33, 0.5, 1.0] {
            for mp in [0.0, 0.7, 0.9, 1.0] {
                let score = estimate(&ConfidenceFactors {
                    text_quality: Some(tq),
                    model_performance: Some(mp),
                    ..Default::default()
                });
                assert!((0.0..=1.0).contains(&score));
                assert_eq!(score, (score * 100.0).round() / 100.0);
            }
        }
    }
}

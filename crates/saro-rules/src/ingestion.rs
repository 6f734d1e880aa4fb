//! # Regulatory Document Ingestion
//!
//! Keyword-based entity tagging and risk scoring for ingested regulatory
//! text.

use rand::Rng;
use saro_core::{round_to, uniform};
use serde::{Deserialize, Serialize};

/// Maximum characters kept in a document summary.
pub const SUMMARY_CHARS: usize = 500;

const ENTITY_PATTERNS: &[(&str, &[&str])] = &[
    ("EU AI Act", &["eu", "ai act", "article"]),
    ("GDPR", &["gdpr", "data protection", "personal data"]),
    ("SEC", &["sec", "securities", "financial"]),
    ("NIST AI RMF", &["nist", "risk management framework"]),
    ("HIPAA", &["hipaa", "healthcare", "phi"]),
    ("ISO 42001", &["iso", "42001", "management system"]),
];

const RISK_KEYWORDS: &[(&str, f64)] = &[
    ("high-risk", 0.75),
    ("bias", 0.6),
    ("transparency", 0.5),
    ("safety", 0.65),
    ("discrimination", 0.7),
    ("surveillance", 0.8),
    ("accountability", 0.5),
    ("explainability", 0.55),
];

/// A risk keyword found in a document with its jittered probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskTag {
    pub tag: String,
    pub probability: f64,
}

/// Regulatory frameworks referenced by `text`.
pub fn extract_entities(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    ENTITY_PATTERNS
        .iter()
        .filter(|(_, kws)| kws.iter().any(|k| lowered.contains(k)))
        .map(|(name, _)| (*name).to_string())
        .collect()
}

/// Tag risk keywords and compute the mean tag probability.
///
/// Each tag's base probability is jittered by ±0.05 and clamped to `[0, 1]`.
/// A document with no risk keywords scores 0.1.
pub fn score_risk<R: Rng + ?Sized>(rng: &mut R, text: &str) -> (Vec<RiskTag>, f64) {
    let lowered = text.to_lowercase();
    let mut tags = Vec::new();
    let mut sum = 0.0;
    for (kw, base) in RISK_KEYWORDS {
        if lowered.contains(kw) {
            let prob = (base + uniform(rng, -0.05, 0.05)).clamp(0.0, 1.0);
            sum += prob;
            tags.push(RiskTag {
                tag: (*kw).to_string(),
                probability: round_to(prob, 3),
            });
        }
    }
    let overall = if tags.is_empty() {
        0.1
    } else {
        round_to(sum / tags.len() as f64, 3)
    };
    (tags, overall)
}

/// First [`SUMMARY_CHARS`] characters, with an ellipsis when truncated.
pub fn summarize(content: &str) -> String {
    truncate_with_ellipsis(content, SUMMARY_CHARS)
}

/// Keep at most `max` characters of `text`, appending `...` when cut.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

//! # Policy Library & Regulatory Feed
//!
//! Seed content for the policy library and the regulatory feed log, plus
//! risk scoring for user-uploaded policy documents.

use rand::Rng;
use saro_core::{round_to, uniform, RiskLevel};
use serde::{Deserialize, Serialize};

use crate::ingestion::{truncate_with_ellipsis, RiskTag};

/// Characters kept in an uploaded policy's preview.
pub const PREVIEW_CHARS: usize = 300;

/// Tags reported for an upload.
pub const MAX_UPLOAD_TAGS: usize = 5;

const UPLOAD_RISK_KEYWORDS: &[(&str, f64)] = &[
    ("high-risk", 0.8),
    ("bias", 0.7),
    ("discrimination", 0.9),
    ("surveillance", 0.95),
    ("facial recognition", 0.9),
    ("transparency", 0.5),
    ("prohibited", 0.95),
    ("penalty", 0.7),
    ("fundamental rights", 0.85),
];

/// Review state of a policy or feed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Reviewed,
    PendingReview,
    Flagged,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reviewed => "reviewed",
            Self::PendingReview => "pending_review",
            Self::Flagged => "flagged",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reviewed" => Some(Self::Reviewed),
            "pending_review" => Some(Self::PendingReview),
            "flagged" => Some(Self::Flagged),
            _ => None,
        }
    }
}

/// A policy library seed entry.
#[derive(Debug, Clone, Copy)]
pub struct SamplePolicy {
    pub title: &'static str,
    pub source: &'static str,
    pub jurisdiction: &'static str,
    pub regulation: &'static str,
    pub risk_score: f64,
    pub status: ReviewStatus,
    pub doc_type: &'static str,
}

pub const SAMPLE_POLICIES: [SamplePolicy; 8] = [
    SamplePolicy {
        title: "EU AI Act: Article 9 Risk Management Systems",
        source: "EUR-Lex",
        jurisdiction: "EU",
        regulation: "EU AI Act",
        risk_score: 0.82,
        status: ReviewStatus::Reviewed,
        doc_type: "regulation",
    },
    SamplePolicy {
        title: "NIST AI RMF 2.0: MAP Function Controls",
        source: "NIST",
        jurisdiction: "US",
        regulation: "NIST AI RMF",
        risk_score: 0.61,
        status: ReviewStatus::Reviewed,
        doc_type: "guideline",
    },
    SamplePolicy {
        title: "UK AI Whitepaper: High-Risk System Criteria",
        source: "GOV.UK",
        jurisdiction: "UK",
        regulation: "UK AI Bill",
        risk_score: 0.74,
        status: ReviewStatus::PendingReview,
        doc_type: "whitepaper",
    },
    SamplePolicy {
        title: "FDA Guidance on AI/ML-Based SaMD",
        source: "FDA RSS",
        jurisdiction: "US",
        regulation: "FDA SaMD",
        risk_score: 0.91,
        status: ReviewStatus::Flagged,
        doc_type: "guidance",
    },
    SamplePolicy {
        title: "MAS TREx Framework v2: Model Risk",
        source: "MAS",
        jurisdiction: "SG",
        regulation: "MAS TREx",
        risk_score: 0.68,
        status: ReviewStatus::Reviewed,
        doc_type: "standard",
    },
    SamplePolicy {
        title: "China AIGC Regulation: Article 4 Obligations",
        source: "CAC",
        jurisdiction: "CN",
        regulation: "China AIGC",
        risk_score: 0.77,
        status: ReviewStatus::Reviewed,
        doc_type: "regulation",
    },
    SamplePolicy {
        title: "ISO 42001:2023 Annex B Bias Testing Controls",
        source: "ISO",
        jurisdiction: "GLOBAL",
        regulation: "ISO 42001",
        risk_score: 0.58,
        status: ReviewStatus::Reviewed,
        doc_type: "standard",
    },
    SamplePolicy {
        title: "GDPR Article 22: Automated Decision-Making",
        source: "EUR-Lex",
        jurisdiction: "EU",
        regulation: "GDPR",
        risk_score: 0.79,
        status: ReviewStatus::Reviewed,
        doc_type: "regulation",
    },
];

/// A regulatory feed seed entry.
#[derive(Debug, Clone, Copy)]
pub struct SampleFeed {
    pub feed: &'static str,
    pub jurisdiction: &'static str,
    pub regulation: &'static str,
    pub headline: &'static str,
    pub status: ReviewStatus,
    pub is_new: bool,
    pub impact: RiskLevel,
}

pub const SAMPLE_FEEDS: [SampleFeed; 6] = [
    SampleFeed {
        feed: "EUR-Lex Official Journal",
        jurisdiction: "EU",
        regulation: "EU AI Act",
        headline: "New implementing acts published for Article 52 transparency obligations",
        status: ReviewStatus::Reviewed,
        is_new: true,
        impact: RiskLevel::High,
    },
    SampleFeed {
        feed: "NIST AI RMF Updates",
        jurisdiction: "US",
        regulation: "NIST AI RMF",
        headline: "NIST releases AI RMF Playbook v1.1 with 45 new subcategory actions",
        status: ReviewStatus::Reviewed,
        is_new: true,
        impact: RiskLevel::Medium,
    },
    SampleFeed {
        feed: "GOV.UK Policy Papers",
        jurisdiction: "UK",
        regulation: "UK AI Bill",
        headline: "UK AI Safety Institute publishes evaluation framework for frontier models",
        status: ReviewStatus::PendingReview,
        is_new: true,
        impact: RiskLevel::High,
    },
    SampleFeed {
        feed: "FDA MedTech Digest",
        jurisdiction: "US",
        regulation: "FDA SaMD",
        headline: "FDA issues draft guidance on predetermined change control plans for AI/ML",
        status: ReviewStatus::Flagged,
        is_new: true,
        impact: RiskLevel::Critical,
    },
    SampleFeed {
        feed: "ISO Standards Bulletin",
        jurisdiction: "GLOBAL",
        regulation: "ISO 42001",
        headline: "ISO 42001:2023 Annex B controls updated with additional bias testing requirements",
        status: ReviewStatus::Reviewed,
        is_new: false,
        impact: RiskLevel::Medium,
    },
    SampleFeed {
        feed: "MAS TREx Feed",
        jurisdiction: "SG",
        regulation: "MAS TREx",
        headline: "MAS issues revised guidelines on model risk governance for AI systems",
        status: ReviewStatus::PendingReview,
        is_new: false,
        impact: RiskLevel::High,
    },
];

/// Risk scoring of an uploaded policy document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadScore {
    pub risk_score: f64,
    pub risk_tags: Vec<RiskTag>,
    pub word_count: usize,
    pub content_preview: String,
}

/// Score an upload by the highest-probability risk keyword it mentions.
///
/// With no keywords the score is drawn from `[0.2, 0.6]`. The score never
/// exceeds 0.99.
pub fn score_upload<R: Rng + ?Sized>(rng: &mut R, content: &str) -> UploadScore {
    let lowered = content.to_lowercase();
    let found: Vec<(&str, f64)> = UPLOAD_RISK_KEYWORDS
        .iter()
        .copied()
        .filter(|(kw, _)| lowered.contains(kw))
        .collect();
    let max = found
        .iter()
        .map(|(_, p)| *p)
        .fold(None, |acc: Option<f64>, p| Some(acc.map_or(p, |a| a.max(p))));
    let risk_score = max
        .unwrap_or_else(|| round_to(uniform(rng, 0.2, 0.6), 2))
        .min(0.99);
    UploadScore {
        risk_score,
        risk_tags: found
            .into_iter()
            .take(MAX_UPLOAD_TAGS)
            .map(|(tag, probability)| RiskTag {
                tag: tag.to_string(),
                probability,
            })
            .collect(),
        word_count: content.split_whitespace().count(),
        content_preview: truncate_with_ellipsis(content, PREVIEW_CHARS),
    }
}

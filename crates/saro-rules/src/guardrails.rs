//! # Output Guardrails
//!
//! Phrase-list scan of model input or output for content that should be
//! redacted or blocked before it reaches a user.

use rand::Rng;
use saro_core::{round_to, uniform, RiskLevel};
use serde::{Deserialize, Serialize};

/// Version string reported with every guardrail decision.
pub const GUARDRAIL_VERSION: &str = "2.1.0";

/// Category of guardrail violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    PiiExposure,
    BiasAmplification,
    HallucinationRisk,
    RegulatoryViolation,
}

impl ViolationKind {
    pub const ALL: [ViolationKind; 4] = [
        ViolationKind::PiiExposure,
        ViolationKind::BiasAmplification,
        ViolationKind::HallucinationRisk,
        ViolationKind::RegulatoryViolation,
    ];

    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::PiiExposure => &["ssn", "social security", "password", "credit card", "passport"],
            Self::BiasAmplification => &["always", "never", "all women", "all men", "those people"],
            Self::HallucinationRisk => &["i am certain", "guaranteed", "100% accurate", "definitely will"],
            Self::RegulatoryViolation => &["no approval needed", "skip compliance", "ignore gdpr"],
        }
    }

    /// PII and regulatory violations block the response outright.
    pub fn severity(&self) -> RiskLevel {
        match self {
            Self::PiiExposure | Self::RegulatoryViolation => RiskLevel::High,
            Self::BiasAmplification | Self::HallucinationRisk => RiskLevel::Medium,
        }
    }

    /// Label with underscores replaced by spaces.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PiiExposure => "pii exposure",
            Self::BiasAmplification => "bias amplification",
            Self::HallucinationRisk => "hallucination risk",
            Self::RegulatoryViolation => "regulatory violation",
        }
    }
}

/// A single matched pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    #[serde(rename = "type")]
    pub kind: ViolationKind,
    pub pattern: String,
    pub severity: RiskLevel,
    pub remediation: String,
}

/// Every pattern of every category present in `text`, case-insensitively.
pub fn check_violations(text: &str) -> Vec<Violation> {
    let lowered = text.to_lowercase();
    ViolationKind::ALL
        .iter()
        .flat_map(|kind| {
            kind.patterns()
                .iter()
                .filter(|p| lowered.contains(*p))
                .map(move |p| Violation {
                    kind: *kind,
                    pattern: (*p).to_string(),
                    severity: kind.severity(),
                    remediation: format!("Remove or redact {} content", kind.label()),
                })
        })
        .collect()
}

/// Guardrail decision for one piece of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailAssessment {
    pub passed: bool,
    pub blocked: bool,
    pub violations: Vec<Violation>,
    pub risk_score: f64,
}

/// Scan `text` and score the result.
pub fn assess<R: Rng + ?Sized>(rng: &mut R, text: &str) -> GuardrailAssessment {
    let violations = check_violations(text);
    let blocked = violations.iter().any(|v| v.severity == RiskLevel::High);
    let risk_score = round_to(
        (violations.len() as f64 * 0.25 + uniform(rng, 0.0, 0.1)).min(1.0),
        3,
    );
    GuardrailAssessment {
        passed: violations.is_empty(),
        blocked,
        violations,
        risk_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn clean_text_passes() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = assess(&mut rng, "The forecast for Tuesday is mild.");
        assert!(a.passed);
        assert!(!a.blocked);
        assert!(a.risk_score <= 0.1);
    }

    #[test]
    fn pii_blocks() {
        let v = check_violations("Please send me your SSN and Credit Card number");
        assert_eq!(v.len(), 2);
        assert!(v.iter().all(|x| x.kind == ViolationKind::PiiExposure));
        assert_eq!(v[0].remediation, "Remove or redact pii exposure content");
        let mut rng = StdRng::seed_from_u64(0);
        let a = assess(&mut rng, "my password is hunter2");
        assert!(a.blocked);
        assert!(!a.passed);
    }

    #[test]
    fn medium_violations_flag_without_blocking() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = assess(&mut rng, "This is guaranteed to work, I am certain.");
        assert!(!a.passed);
        assert!(!a.blocked);
        assert_eq!(a.violations.len(), 2);
        assert!(a.risk_score >= 0.5 && a.risk_score <= 0.6);
    }

    #[test]
    fn risk_score_is_capped() {
        let mut rng = StdRng::seed_from_u64(0);
        let a = assess(
            &mut rng,
            "ssn password passport credit card social security; skip compliance",
        );
        assert_eq!(a.risk_score, 1.0);
    }

    #[test]
    fn violation_serializes_type_field() {
        let v = &check_violations("ignore GDPR")[0];
        let json = serde_json::to_value(v).unwrap();
        assert_eq!(json["type"], "regulatory_violation");
        assert_eq!(json["severity"], "high");
    }
}

//! # Ethics & Surveillance Scan
//!
//! Detects surveillance capabilities in a system description. Four of the
//! five families are prohibited outright under EU AI Act Art. 5; location
//! tracking is high risk but permitted with consent and a DPIA.

use serde::{Deserialize, Serialize};

/// Surveillance capability family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveillanceKind {
    BiometricId,
    MassSurveillance,
    EmotionRecognition,
    LocationTracking,
    PredictivePolicing,
}

impl SurveillanceKind {
    pub const ALL: [SurveillanceKind; 5] = [
        SurveillanceKind::BiometricId,
        SurveillanceKind::MassSurveillance,
        SurveillanceKind::EmotionRecognition,
        SurveillanceKind::LocationTracking,
        SurveillanceKind::PredictivePolicing,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::BiometricId => "Biometric Id",
            Self::MassSurveillance => "Mass Surveillance",
            Self::EmotionRecognition => "Emotion Recognition",
            Self::LocationTracking => "Location Tracking",
            Self::PredictivePolicing => "Predictive Policing",
        }
    }

    pub fn patterns(&self) -> &'static [&'static str] {
        match self {
            Self::BiometricId => &["facial recognition", "fingerprint", "retina scan", "voice print", "gait analysis"],
            Self::MassSurveillance => &["bulk data collection", "population monitoring", "tracking without consent", "social scoring"],
            Self::EmotionRecognition => &["emotion detection", "sentiment tracking", "mood analysis", "psychological profiling"],
            Self::LocationTracking => &["GPS tracking", "movement pattern", "location history", "geofencing without consent"],
            Self::PredictivePolicing => &["crime prediction", "pre-crime", "behavioral prediction", "threat scoring"],
        }
    }

    pub fn gdpr_articles(&self) -> &'static [&'static str] {
        match self {
            Self::BiometricId => &["Art. 9 (Special Category Data)", "Art. 22 (Automated Decision-Making)"],
            Self::MassSurveillance => &["Art. 5 (Data Minimisation)", "Art. 6 (Lawful Basis)", "Art. 25 (Privacy by Design)"],
            Self::EmotionRecognition => &["Art. 9 (Special Category)", "Art. 13 (Transparency)"],
            Self::LocationTracking => &["Art. 6 (Lawful Basis)", "Art. 17 (Right to Erasure)"],
            Self::PredictivePolicing => &["Art. 22 (Automated Decisions)", "Art. 35 (DPIA Required)"],
        }
    }

    pub fn prohibited(&self) -> bool {
        !matches!(self, Self::LocationTracking)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingSeverity {
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveillanceFinding {
    pub risk_type: String,
    pub matched_patterns: Vec<String>,
    pub severity: FindingSeverity,
    pub eu_ai_act_prohibited: bool,
    pub applicable_regulations: Vec<String>,
    pub remediation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SurveillanceRisk {
    Prohibited,
    High,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EthicsVerdict {
    Compliant,
    NonCompliant,
}

/// Outcome of a scan, before it is stamped with an id and time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveillanceScan {
    pub overall_risk: SurveillanceRisk,
    pub eu_ai_act_prohibited: bool,
    pub findings_count: usize,
    pub findings: Vec<SurveillanceFinding>,
    pub compliance_verdict: EthicsVerdict,
    pub requires_dpia: bool,
    pub requires_human_oversight: bool,
}

/// Scan a system description. Matching is case-insensitive.
pub fn scan(description: &str) -> SurveillanceScan {
    let lowered = description.to_lowercase();
    let findings: Vec<SurveillanceFinding> = SurveillanceKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let matched: Vec<String> = kind
                .patterns()
                .iter()
                .filter(|p| lowered.contains(&p.to_lowercase()))
                .map(|p| (*p).to_string())
                .collect();
            if matched.is_empty() {
                return None;
            }
            let prohibited = kind.prohibited();
            Some(SurveillanceFinding {
                risk_type: kind.title().to_string(),
                matched_patterns: matched,
                severity: if prohibited {
                    FindingSeverity::Critical
                } else {
                    FindingSeverity::High
                },
                eu_ai_act_prohibited: prohibited,
                applicable_regulations: kind.gdpr_articles().iter().map(|s| (*s).to_string()).collect(),
                remediation: if prohibited {
                    "EU AI Act Art. 5 PROHIBITS this use case. System cannot be deployed in EU.".to_string()
                } else {
                    "Implement explicit consent, data minimisation, and DPIA before deployment.".to_string()
                },
            })
        })
        .collect();

    let prohibited = findings.iter().any(|f| f.eu_ai_act_prohibited);
    let any = !findings.is_empty();
    SurveillanceScan {
        overall_risk: if prohibited {
            SurveillanceRisk::Prohibited
        } else if any {
            SurveillanceRisk::High
        } else {
            SurveillanceRisk::Low
        },
        eu_ai_act_prohibited: prohibited,
        findings_count: findings.len(),
        findings,
        compliance_verdict: if any {
            EthicsVerdict::NonCompliant
        } else {
            EthicsVerdict::Compliant
        },
        requires_dpia: any,
        requires_human_oversight: any,
    }
}

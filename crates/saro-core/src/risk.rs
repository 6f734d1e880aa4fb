//! # Risk, Severity and Verdict Vocabulary
//!
//! The enums every evaluation in the platform reports with.
//!
//! [`Severity`] is totally ordered `Pass < Warn < Critical`, so the
//! [`Verdict`] of a checklist is a fold over `max`: any critical item fails
//! the checklist, otherwise any warning sends it to review.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity & Verdict
// ---------------------------------------------------------------------------

/// Outcome of a single checklist item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The measured value satisfies the rule.
    Pass,
    /// The value misses the threshold but is within tolerance.
    Warn,
    /// The value is outside tolerance.
    Critical,
}

impl Severity {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Warn => "warn",
            Self::Critical => "critical",
        }
    }

    /// Status label used on checklist items (`PASS`, `WARN`, `FAIL`).
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Warn => "WARN",
            Self::Critical => "FAIL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall checklist verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    /// Every item passed.
    Pass,
    /// At least one warning, no critical items.
    Review,
    /// At least one critical item.
    Fail,
}

impl Verdict {
    /// Derive the verdict from the worst severity present.
    pub fn from_severities<I: IntoIterator<Item = Severity>>(items: I) -> Self {
        match items.into_iter().max() {
            Some(Severity::Critical) => Self::Fail,
            Some(Severity::Warn) => Self::Review,
            Some(Severity::Pass) | None => Self::Pass,
        }
    }

    /// Uppercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "PASS",
            Self::Review => "REVIEW",
            Self::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate counts over a checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSummary {
    /// Number of items evaluated.
    pub total: usize,
    /// Items that passed.
    pub passed: usize,
    /// Items that warned.
    pub warnings: usize,
    /// Items that were critical.
    pub critical: usize,
    /// Percentage of passing items, one decimal place.
    pub pass_rate: f64,
    /// Worst-severity verdict.
    pub verdict: Verdict,
}

impl ChecklistSummary {
    /// Summarise a sequence of item severities.
    pub fn from_severities<I: IntoIterator<Item = Severity>>(items: I) -> Self {
        let (mut passed, mut warnings, mut critical) = (0, 0, 0);
        for s in items {
            match s {
                Severity::Pass => passed += 1,
                Severity::Warn => warnings += 1,
                Severity::Critical => critical += 1,
            }
        }
        let total = passed + warnings + critical;
        let pass_rate = if total == 0 {
            0.0
        } else {
            crate::numeric::round_to(passed as f64 / total as f64 * 100.0, 1)
        };
        let verdict = if critical > 0 {
            Verdict::Fail
        } else if warnings > 0 {
            Verdict::Review
        } else {
            Verdict::Pass
        };
        Self {
            total,
            passed,
            warnings,
            critical,
            pass_rate,
            verdict,
        }
    }

    /// Weighted compliance score: passes count fully, warnings count half.
    pub fn compliance_score(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        crate::numeric::round_to(
            (self.passed as f64 + self.warnings as f64 * 0.5) / self.total as f64,
            3,
        )
    }
}

// ---------------------------------------------------------------------------
// Risk level & compliance status
// ---------------------------------------------------------------------------

/// Coarse risk classification reported by audits and feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Low risk.
    Low,
    /// Medium risk.
    Medium,
    /// High risk.
    High,
    /// Critical risk.
    Critical,
}

impl RiskLevel {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    /// Parse a lowercase level name; unknown names yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compliance status of an audited system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    /// Meets all applicable requirements.
    Compliant,
    /// At least one critical gap.
    NonCompliant,
    /// Awaiting further evidence.
    Pending,
    /// Flagged for human review.
    Review,
}

impl ComplianceStatus {
    /// Snake-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "compliant",
            Self::NonCompliant => "non_compliant",
            Self::Pending => "pending",
            Self::Review => "review",
        }
    }
}

impl std::fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn verdict_is_worst_severity() {
        use Severity::*;
        assert_eq!(Verdict::from_severities([Pass, Pass]), Verdict::Pass);
        assert_eq!(Verdict::from_severities([Pass, Warn]), Verdict::Review);
        assert_eq!(Verdict::from_severities([Warn, Critical, Pass]), Verdict::Fail);
        assert_eq!(Verdict::from_severities([]), Verdict::Pass);
    }

    #[test]
    fn summary_counts_and_rate() {
        use Severity::*;
        let s = ChecklistSummary::from_severities([Pass, Pass, Warn, Critical]);
        assert_eq!(s.total, 4);
        assert_eq!(s.passed, 2);
        assert_eq!(s.warnings, 1);
        assert_eq!(s.critical, 1);
        assert_eq!(s.pass_rate, 50.0);
        assert_eq!(s.verdict, Verdict::Fail);
        assert_eq!(s.compliance_score(), 0.625);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let s = ChecklistSummary::from_severities(std::iter::empty());
        assert_eq!(s.total, 0);
        assert_eq!(s.pass_rate, 0.0);
        assert_eq!(s.compliance_score(), 0.0);
        assert_eq!(s.verdict, Verdict::Pass);
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
        assert_eq!(serde_json::to_string(&Verdict::Review).unwrap(), "\"REVIEW\"");
        assert_eq!(
            serde_json::to_string(&ComplianceStatus::NonCompliant).unwrap(),
            "\"non_compliant\""
        );
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"high\"");
        assert_eq!(Severity::Critical.status_label(), "FAIL");
    }

    #[test]
    fn risk_level_parse_and_order() {
        assert_eq!(RiskLevel::parse("HIGH"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::parse("extreme"), None);
        assert!(RiskLevel::Critical > RiskLevel::High);
        assert!(RiskLevel::Medium > RiskLevel::Low);
    }

    fn severity() -> impl Strategy<Value = Severity> {
        prop_oneof![
            Just(Severity::Pass),
            Just(Severity::Warn),
            Just(Severity::Critical)
        ]
    }

    proptest! {
        #[test]
        fn summary_verdict_matches_fold(items in proptest::collection::vec(severity(), 0..32)) {
            let summary = ChecklistSummary::from_severities(items.iter().copied());
            prop_assert_eq!(summary.verdict, Verdict::from_severities(items.iter().copied()));
            prop_assert_eq!(summary.total, items.len());
            prop_assert!(summary.pass_rate >= 0.0 && summary.pass_rate <= 100.0);
        }
    }
}

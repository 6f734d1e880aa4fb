//! # Policy Benchmarks and Domains
//!
//! The regulatory frameworks a model can be benchmarked against and the
//! deployment domains that tune expected metric ranges. Unknown names fall
//! back to [`Policy::EuAiAct`] and [`Domain::General`].

use serde::{Deserialize, Serialize};

/// A regulatory framework with a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    /// EU Artificial Intelligence Act.
    #[serde(rename = "EU AI Act")]
    EuAiAct,
    /// NIST AI Risk Management Framework.
    #[serde(rename = "NIST AI RMF")]
    NistAiRmf,
    /// ISO/IEC 42001 AI management systems.
    #[serde(rename = "ISO 42001")]
    Iso42001,
    /// FDA Software as a Medical Device guidance.
    #[serde(rename = "FDA SaMD")]
    FdaSamd,
}

impl Policy {
    /// Every policy, in display order.
    pub const ALL: [Policy; 4] = [
        Policy::EuAiAct,
        Policy::NistAiRmf,
        Policy::Iso42001,
        Policy::FdaSamd,
    ];

    /// Display name, also the wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EuAiAct => "EU AI Act",
            Self::NistAiRmf => "NIST AI RMF",
            Self::Iso42001 => "ISO 42001",
            Self::FdaSamd => "FDA SaMD",
        }
    }

    /// Exact-name lookup.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name.trim())
    }

    /// Lookup with fallback to the EU AI Act.
    pub fn resolve(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(policy = name, "unknown policy, falling back to EU AI Act");
            Self::EuAiAct
        })
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment domain of the evaluated model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// Credit, lending, trading.
    Finance,
    /// Clinical and diagnostic systems.
    Healthcare,
    /// Hiring and workforce decisions.
    Hr,
    /// Anything else.
    General,
}

impl Domain {
    /// Lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finance => "finance",
            Self::Healthcare => "healthcare",
            Self::Hr => "hr",
            Self::General => "general",
        }
    }

    /// Title-cased label used in checklist item names.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Finance => "Finance",
            Self::Healthcare => "Healthcare",
            Self::Hr => "Hr",
            Self::General => "General",
        }
    }

    /// Case-insensitive lookup with fallback to [`Domain::General`].
    pub fn resolve(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "finance" => Self::Finance,
            "healthcare" => Self::Healthcare,
            "hr" => Self::Hr,
            _ => Self::General,
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_round_trips_names() {
        for p in Policy::ALL {
            assert_eq!(Policy::parse(p.as_str()), Some(p));
            assert_eq!(
                serde_json::to_string(&p).unwrap(),
                format!("\"{}\"", p.as_str())
            );
        }
    }

    #[test]
    fn unknown_policy_falls_back_to_eu() {
        assert_eq!(Policy::parse("GDPR"), None);
        assert_eq!(Policy::resolve("GDPR"), Policy::EuAiAct);
    }

    #[test]
    fn domain_is_case_insensitive() {
        assert_eq!(Domain::resolve("Healthcare"), Domain::Healthcare);
        assert_eq!(Domain::resolve("HR"), Domain::Hr);
        assert_eq!(Domain::resolve("retail"), Domain::General);
    }
}

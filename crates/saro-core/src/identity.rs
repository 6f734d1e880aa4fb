//! # Record Identifiers
//!
//! Every record the platform stores is keyed by a category prefix plus a
//! short uppercase hex tail drawn from a v4 UUID, e.g. `AUDIT-9F2C01AB`.
//! The prefix makes the record family visible in logs and URLs.
//!
//! API keys handed out by onboarding flows follow the same idea with a
//! lowercase `saro-` family prefix and a full 32-character hex tail.

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// ---------------------------------------------------------------------------
// Prefixes
// ---------------------------------------------------------------------------

/// Category prefix for a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdPrefix {
    /// Agent pipeline run.
    Run,
    /// Regulatory audit.
    Audit,
    /// Enterprise tenant.
    Tenant,
    /// Compliance or standards-aligned report.
    Report,
    /// Model-output upload.
    Upload,
    /// Non-standard document ingested by the agent.
    Document,
    /// Policy library entry.
    Policy,
    /// Regulatory feed item.
    Feed,
    /// Marketplace listing.
    Listing,
    /// Marketplace purchase.
    Transaction,
    /// Remediation bot job.
    Bot,
    /// Finding referenced by a bot job.
    Finding,
    /// Ethics surveillance scan.
    Scan,
    /// Data protection impact assessment.
    Dpia,
    /// Commercial customer.
    Customer,
}

impl IdPrefix {
    /// The literal prefix, without the trailing dash.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Run => "RUN",
            Self::Audit => "AUDIT",
            Self::Tenant => "TEN",
            Self::Report => "RPT",
            Self::Upload => "UPL",
            Self::Document => "DOC",
            Self::Policy => "POL",
            Self::Feed => "FEED",
            Self::Listing => "MKT",
            Self::Transaction => "TXN",
            Self::Bot => "BOT",
            Self::Finding => "FIND",
            Self::Scan => "ETH",
            Self::Dpia => "DPIA",
            Self::Customer => "CUST",
        }
    }

    /// Length of the hex tail for this family.
    pub fn tail_len(&self) -> usize {
        match self {
            Self::Finding => 6,
            _ => 8,
        }
    }
}

impl std::fmt::Display for IdPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RecordId
// ---------------------------------------------------------------------------

/// A category-prefixed record identifier such as `RUN-1A2B3C4D`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a fresh identifier in the given family.
    pub fn generate(prefix: IdPrefix) -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        let tail = hex[..prefix.tail_len()].to_uppercase();
        Self(format!("{}-{}", prefix.as_str(), tail))
    }

    /// Wrap an existing identifier, checking that it belongs to `prefix`.
    pub fn parse(prefix: IdPrefix, raw: &str) -> Result<Self, ValidationError> {
        let expected = format!("{}-", prefix.as_str());
        if raw.starts_with(&expected) && raw.len() > expected.len() {
            Ok(Self(raw.to_string()))
        } else {
            Err(ValidationError::WrongPrefix {
                id: raw.to_string(),
                expected: prefix.as_str(),
            })
        }
    }

    /// Access the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier, returning the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// API keys and tokens
// ---------------------------------------------------------------------------

/// Family of an issued API key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyKind {
    /// Enterprise tenant key (`saro-…`).
    Tenant,
    /// Production key (`saro-live-…`).
    Live,
    /// Sandbox key (`saro-test-…`).
    Test,
}

impl ApiKeyKind {
    /// Literal prefix including the trailing dash.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Tenant => "saro-",
            Self::Live => "saro-live-",
            Self::Test => "saro-test-",
        }
    }

    /// Issue a new key of this kind.
    pub fn issue(&self) -> String {
        format!("{}{}", self.prefix(), Uuid::new_v4().simple())
    }
}

/// Random lowercase hex string of `len` characters, prefixed with `0x`.
///
/// Used for the synthetic ledger hashes returned by marketplace and
/// verification endpoints.
pub fn hex_hash<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    const DIGITS: &[u8] = b"abcdef0123456789";
    let mut out = String::with_capacity(len + 2);
    out.push_str("0x");
    for _ in 0..len {
        out.push(DIGITS[rng.gen_range(0..DIGITS.len())] as char);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn generated_ids_carry_prefix_and_uppercase_tail() {
        let id = RecordId::generate(IdPrefix::Audit);
        let s = id.as_str();
        assert!(s.starts_with("AUDIT-"));
        let tail = &s["AUDIT-".len()..];
        assert_eq!(tail.len(), 8);
        assert!(tail
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase()));
    }

    #[test]
    fn finding_ids_use_short_tail() {
        let id = RecordId::generate(IdPrefix::Finding);
        assert_eq!(id.as_str().len(), "FIND-".len() + 6);
    }

    #[test]
    fn generated_ids_are_distinct() {
        let a = RecordId::generate(IdPrefix::Run);
        let b = RecordId::generate(IdPrefix::Run);
        assert_ne!(a, b);
    }

    #[test]
    fn parse_accepts_matching_prefix() {
        let id = RecordId::parse(IdPrefix::Tenant, "TEN-ABCDEF01").unwrap();
        assert_eq!(id.to_string(), "TEN-ABCDEF01");
    }

    #[test]
    fn parse_rejects_other_family() {
        let err = RecordId::parse(IdPrefix::Tenant, "RUN-ABCDEF01").unwrap_err();
        assert!(matches!(err, ValidationError::WrongPrefix { expected: "TEN", .. }));
        assert!(RecordId::parse(IdPrefix::Tenant, "TEN-").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::parse(IdPrefix::Run, "RUN-0000AAAA").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"RUN-0000AAAA\"");
    }

    #[test]
    fn api_keys_have_family_prefix_and_32_hex() {
        for kind in [ApiKeyKind::Tenant, ApiKeyKind::Live, ApiKeyKind::Test] {
            let key = kind.issue();
            let tail = key.strip_prefix(kind.prefix()).unwrap();
            assert_eq!(tail.len(), 32);
            assert!(tail.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn hex_hash_has_requested_length() {
        let mut rng = StdRng::seed_from_u64(7);
        let h = hex_hash(&mut rng, 40);
        assert_eq!(h.len(), 42);
        assert!(h.starts_with("0x"));
        assert!(h[2..].chars().all(|c| c.is_ascii_hexdigit()));
    }
}

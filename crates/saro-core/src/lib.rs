//! # saro-core: Foundational Types for the SARO Platform
//!
//! Shared vocabulary for every crate in the workspace. No internal crate
//! dependencies; only `serde`, `thiserror`, `chrono`, `uuid` and `rand`.
//!
//! ## Design Principles
//!
//! 1. **One severity lattice.** Checklist items are [`Severity::Pass`],
//!    [`Severity::Warn`] or [`Severity::Critical`], ordered so that the
//!    verdict of a checklist is simply the worst severity present.
//!
//! 2. **Category-prefixed identifiers.** Every stored record is keyed by a
//!    [`RecordId`] such as `RUN-1A2B3C4D`. The prefix is fixed by [`IdPrefix`]
//!    so two record families never share a namespace.
//!
//! 3. **Randomness is injected.** Helpers that need entropy take a
//!    `rand::Rng` so callers can seed them for reproducible output.

pub mod error;
pub mod identity;
pub mod numeric;
pub mod risk;
pub mod temporal;

pub use error::{SaroError, ValidationError};
pub use identity::{hex_hash, ApiKeyKind, IdPrefix, RecordId};
pub use numeric::{round_to, uniform};
pub use risk::{ChecklistSummary, ComplianceStatus, RiskLevel, Severity, Verdict};
pub use temporal::{date_in_days, minutes_after, minutes_before, month_label, now};

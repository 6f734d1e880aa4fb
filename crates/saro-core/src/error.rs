//! # Error Hierarchy
//!
//! Structured error types shared by the SARO crates, built with `thiserror`.
//! No `Box<dyn Error>`, no `.unwrap()` outside tests.

use thiserror::Error;

/// Top-level error type for the SARO domain crates.
#[derive(Error, Debug)]
pub enum SaroError {
    /// Input failed a domain validation rule.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A record referenced by identifier does not exist.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Human-readable record family (e.g. "run", "report").
        kind: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised when validating domain primitives.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A record identifier did not carry the expected category prefix.
    #[error("identifier {id:?} does not start with {expected}-")]
    WrongPrefix {
        /// The offending identifier.
        id: String,
        /// The prefix that was required.
        expected: &'static str,
    },

    /// A required text field was empty after trimming.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// A numeric field was outside its permitted range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Value supplied.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
}

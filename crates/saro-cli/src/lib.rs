//! # saro-cli: Command-Line Tool for SARO
//!
//! Provides the `saro` command-line interface.
//!
//! ## Subcommands
//!
//! - `saro seed` - populate a running server with demo documents, audits,
//!   tenants, guardrail checks and reports.
//! - `saro evaluate` - run the agent pipeline locally on a piece of model
//!   output and print the run as JSON.
//!
//! ```bash
//! saro seed --url http://localhost:8000
//! saro evaluate --policy "FDA SaMD" --domain healthcare --text "..." --seed 42
//! ```

pub mod evaluate;
pub mod seed;

/// Version of the platform this tool targets.
pub const PLATFORM_VERSION: &str = "4.0.0";

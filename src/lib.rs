//! compatcheck - Pre-job host compatibility diagnostics.
//!
//! Before a job starts, compatcheck looks for signs that the host cannot
//! run it well: it scans OS-provided files for known-bad patterns and runs
//! a tiny probe program to confirm the runtime executes on this OS and CPU.
//! Both checks are advisory. They annotate the job with at most one warning
//! plus telemetry and never fail it.
//!
//! # Modules
//!
//! - [`cancel`] - Job cancellation token
//! - [`checks`] - Host file scan, runtime probe and their orchestration
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading
//! - [`context`] - Execution context the checker reports into
//! - [`error`] - Error types and result aliases
//! - [`lines`] - Lossy line reading for host files and program output
//! - [`process`] - External process launching
//! - [`telemetry`] - Job telemetry entries
//!
//! # Example
//!
//! ```
//! use compatcheck::checks::FileScanner;
//! use compatcheck::context::MockContext;
//!
//! let mut ctx = MockContext::new();
//! // No rules means nothing to flag.
//! assert!(FileScanner::new().scan(&[], &mut ctx));
//! ```

pub mod cancel;
pub mod checks;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod lines;
pub mod process;
pub mod telemetry;

pub use error::{CompatError, Result};

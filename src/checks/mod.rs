//! Pre-job compatibility checks.
//!
//! # Modules
//!
//! - [`rule`] - Warning rule definitions
//! - [`scanner`] - Host file pattern scan
//! - [`probe`] - Out-of-process runtime probe
//! - [`checker`] - Orchestration and warning suppression

pub mod checker;
pub mod probe;
pub mod rule;
pub mod scanner;

pub use checker::{CheckReport, CheckerMode, CompatibilityChecker};
pub use probe::{ProbeResult, ProbeSettings, ProbeVerdict, RuntimeProbe};
pub use rule::WarningRule;
pub use scanner::{FileScanner, ScanOutcome};

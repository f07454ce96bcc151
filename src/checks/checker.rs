//! Compatibility checker orchestration.
//!
//! Runs the host file scan (when the platform supports it) and then the
//! runtime probe. The probe always runs, but its warning is withheld when
//! the scan already warned, so an operator sees at most one compatibility
//! warning per job.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;

use super::probe::{ProbeVerdict, RuntimeProbe};
use super::rule::WarningRule;
use super::scanner::{FileScanner, ScanOutcome};

/// Which checks the checker runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckerMode {
    /// Decide from the host OS at startup.
    #[default]
    Auto,
    /// File scan followed by the runtime probe.
    Full,
    /// Runtime probe only.
    ProbeOnly,
}

impl CheckerMode {
    /// Resolve `Auto` for the running host.
    pub fn resolve(self) -> Self {
        self.resolve_for(std::env::consts::OS)
    }

    /// Resolve `Auto` for the given OS name. The file scan targets Linux
    /// host files, so only Linux gets `Full`.
    pub fn resolve_for(self, os: &str) -> Self {
        match self {
            Self::Auto if os == "linux" => Self::Full,
            Self::Auto => Self::ProbeOnly,
            resolved => resolved,
        }
    }

    /// Whether the host file scan runs in this mode.
    pub fn scans_files(self) -> bool {
        matches!(self.resolve(), Self::Full)
    }
}

impl FromStr for CheckerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "auto" => Ok(Self::Auto),
            "full" => Ok(Self::Full),
            "probe_only" => Ok(Self::ProbeOnly),
            _ => Err(format!("unknown checker mode: {}", s)),
        }
    }
}

impl fmt::Display for CheckerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckerMode::Auto => write!(f, "auto"),
            CheckerMode::Full => write!(f, "full"),
            CheckerMode::ProbeOnly => write!(f, "probe_only"),
        }
    }
}

/// Summary of one checker run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Mode the checker ran in, after resolving `Auto`.
    pub mode: CheckerMode,
    /// Scan result; `None` when the scan did not run or was cancelled.
    pub host_compatible: Option<bool>,
    /// Probe verdict.
    pub probe: ProbeVerdict,
}

/// Pre-job compatibility checker.
pub struct CompatibilityChecker {
    mode: CheckerMode,
    rules: Vec<WarningRule>,
    scanner: FileScanner,
    probe: RuntimeProbe,
}

impl CompatibilityChecker {
    /// Create a checker. `Auto` mode is resolved here, once.
    pub fn new(mode: CheckerMode, rules: Vec<WarningRule>, probe: RuntimeProbe) -> Self {
        Self {
            mode: mode.resolve(),
            rules,
            scanner: FileScanner::new(),
            probe,
        }
    }

    /// Replace the file scanner (e.g. to change the match budget).
    pub fn with_scanner(mut self, scanner: FileScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// The resolved mode.
    pub fn mode(&self) -> CheckerMode {
        self.mode
    }

    /// Run all applicable checks against the job. Never fails.
    pub fn run(&self, ctx: &mut dyn ExecutionContext) -> CheckReport {
        let scan = if self.mode.scans_files() {
            Some(self.scanner.scan_outcome(&self.rules, ctx))
        } else {
            tracing::debug!("Host file scan not applicable in {} mode", self.mode);
            None
        };

        let suppress_warning = scan == Some(ScanOutcome::Incompatible);
        let host_compatible = scan.and_then(ScanOutcome::host_compatible);
        let probe = self.probe.check(ctx, suppress_warning);

        CheckReport {
            mode: self.mode,
            host_compatible,
            probe,
        }
    }
}

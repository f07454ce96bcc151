//! Host file pattern scan.
//!
//! Walks the configured [`WarningRule`]s in order and reports the first one
//! whose file contains a matching line. A rule that cannot be evaluated
//! (unreadable file, bad pattern, slow match) is logged, recorded as
//! telemetry and skipped; it never hides a later rule.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::{Duration, Instant};

use regex::{Regex, RegexBuilder};

use crate::cancel::CancellationToken;
use crate::context::ExecutionContext;
use crate::error::{CompatError, Result};
use crate::lines::LossyLines;
use crate::telemetry::TelemetryEntry;

use super::rule::WarningRule;

/// Time allowed for matching a single line.
pub const DEFAULT_MATCH_BUDGET: Duration = Duration::from_millis(100);

/// Upper bound on compiled pattern size.
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Result of a host file scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No rule matched.
    Compatible,
    /// A rule matched and its warning was shown.
    Incompatible,
    /// The job was cancelled before the scan finished.
    Cancelled,
}

impl ScanOutcome {
    /// `Some(compatible)` for a finished scan, `None` if it was cut short.
    pub fn host_compatible(self) -> Option<bool> {
        match self {
            Self::Compatible => Some(true),
            Self::Incompatible => Some(false),
            Self::Cancelled => None,
        }
    }
}

/// Scans host files for known-incompatible patterns.
#[derive(Debug, Clone)]
pub struct FileScanner {
    match_budget: Duration,
}

impl Default for FileScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl FileScanner {
    /// Create a scanner with the default per-line match budget.
    pub fn new() -> Self {
        Self {
            match_budget: DEFAULT_MATCH_BUDGET,
        }
    }

    /// Create a scanner with a custom per-line match budget.
    pub fn with_match_budget(match_budget: Duration) -> Self {
        Self { match_budget }
    }

    /// Scan the rules in order. Returns `true` if the host looks compatible.
    ///
    /// A cancelled scan found nothing to flag, so it also returns `true`;
    /// use [`scan_outcome`](Self::scan_outcome) to tell the two apart.
    pub fn scan(&self, rules: &[WarningRule], ctx: &mut dyn ExecutionContext) -> bool {
        self.scan_outcome(rules, ctx) != ScanOutcome::Incompatible
    }

    /// Scan the rules in order.
    ///
    /// On the first match the rule's message is surfaced as a warning, a
    /// telemetry entry names the rule, and no further files are read.
    pub fn scan_outcome(
        &self,
        rules: &[WarningRule],
        ctx: &mut dyn ExecutionContext,
    ) -> ScanOutcome {
        let cancel = ctx.cancellation();

        for (index, rule) in rules.iter().enumerate() {
            if let Err(e) = rule.validate() {
                tracing::error!("Skipping warning rule #{}: {}", index, e);
                continue;
            }

            let path = Path::new(&rule.file_path);
            if !path.exists() {
                tracing::debug!(
                    "Skipping warning rule #{}: {} does not exist",
                    index,
                    path.display()
                );
                continue;
            }

            match self.evaluate(rule, path, &cancel) {
                Ok(true) => {
                    tracing::info!(
                        "Warning rule #{} matched {} with pattern '{}'",
                        index,
                        rule.file_path,
                        rule.pattern
                    );
                    ctx.warning(&rule.message);
                    ctx.add_telemetry(TelemetryEntry::general(format!(
                        "OS warning: file '{}' matched pattern '{}'",
                        rule.file_path, rule.pattern
                    )));
                    return ScanOutcome::Incompatible;
                }
                Ok(false) => {}
                Err(CompatError::Cancelled) => {
                    tracing::info!("Host file scan cancelled at rule #{}", index);
                    return ScanOutcome::Cancelled;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to check {} against pattern '{}': {}",
                        rule.file_path,
                        rule.pattern,
                        e
                    );
                    ctx.add_telemetry(TelemetryEntry::general(format!(
                        "OS warning check failed: file '{}', pattern '{}': {}",
                        rule.file_path, rule.pattern, e
                    )));
                }
            }
        }

        ScanOutcome::Compatible
    }

    /// Test every line of `path` against the rule's pattern.
    fn evaluate(
        &self,
        rule: &WarningRule,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<bool> {
        let regex = compile_pattern(&rule.pattern)?;
        let reader = BufReader::new(File::open(path)?);

        for line in LossyLines::new(reader) {
            cancel.check()?;
            let line = line?;

            let started = Instant::now();
            let matched = regex.is_match(&line);
            if started.elapsed() >= self.match_budget {
                return Err(CompatError::MatchTimeout {
                    pattern: rule.pattern.clone(),
                    budget_ms: self.match_budget.as_millis(),
                });
            }

            if matched {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| CompatError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

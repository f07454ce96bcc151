//! Mock execution context for testing.
//!
//! `MockContext` implements [`ExecutionContext`] and captures all
//! interactions for later assertion.
//!
//! # Example
//!
//! ```
//! use compatcheck::context::{ExecutionContext, MockContext};
//!
//! let mut ctx = MockContext::new();
//! ctx.output("Checking host");
//! assert!(ctx.outputs().contains(&"Checking host".to_string()));
//! assert!(ctx.warnings().is_empty());
//! ```

use crate::cancel::CancellationToken;
use crate::telemetry::TelemetryEntry;

use super::ExecutionContext;

/// Mock execution context.
#[derive(Debug, Default)]
pub struct MockContext {
    outputs: Vec<String>,
    warnings: Vec<String>,
    telemetry: Vec<TelemetryEntry>,
    cancellation: CancellationToken,
}

impl MockContext {
    /// Create a new mock context with a fresh cancellation token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock context bound to an existing token.
    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self {
            cancellation,
            ..Default::default()
        }
    }

    /// Get all captured output lines.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Get all captured warnings.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Get all captured telemetry entries.
    pub fn telemetry(&self) -> &[TelemetryEntry] {
        &self.telemetry
    }

    /// Check if a warning containing `msg` was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|w| w.contains(msg))
    }

    /// Check if a telemetry entry containing `msg` was recorded.
    pub fn has_telemetry(&self, msg: &str) -> bool {
        self.telemetry.iter().any(|e| e.message.contains(msg))
    }
}

impl ExecutionContext for MockContext {
    fn output(&mut self, msg: &str) {
        self.outputs.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    fn add_telemetry(&mut self, entry: TelemetryEntry) {
        self.telemetry.push(entry);
    }
}

//! Terminal-backed execution context.

use console::{Style, Term};
use std::io::Write;

use crate::cancel::CancellationToken;
use crate::telemetry::TelemetryEntry;

use super::ExecutionContext;

/// Execution context for running the checker from a terminal.
///
/// Output lines go to stdout, warnings to stderr. Telemetry is kept in
/// memory so the caller can print or forward it once the run is over.
pub struct TerminalContext {
    out: Term,
    err: Term,
    warning_style: Style,
    cancellation: CancellationToken,
    telemetry: Vec<TelemetryEntry>,
}

impl TerminalContext {
    /// Create a context bound to the given cancellation token.
    pub fn new(cancellation: CancellationToken) -> Self {
        let warning_style = if console::colors_enabled_stderr() {
            Style::new().color256(208)
        } else {
            Style::new()
        };

        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            warning_style,
            cancellation,
            telemetry: Vec::new(),
        }
    }

    /// Send output lines to stderr, keeping stdout free for machine-readable
    /// results.
    pub fn with_output_on_stderr(mut self) -> Self {
        self.out = Term::stderr();
        self
    }

    /// Telemetry recorded so far.
    pub fn telemetry(&self) -> &[TelemetryEntry] {
        &self.telemetry
    }

    /// Take ownership of the recorded telemetry, leaving the context empty.
    pub fn take_telemetry(&mut self) -> Vec<TelemetryEntry> {
        std::mem::take(&mut self.telemetry)
    }
}

impl ExecutionContext for TerminalContext {
    fn output(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(
            self.err,
            "{}",
            self.warning_style.apply_to(format!("⚠ {}", msg))
        )
        .ok();
    }

    fn cancellation(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    fn add_telemetry(&mut self, entry: TelemetryEntry) {
        tracing::debug!("Telemetry ({}): {}", entry.category, entry.message);
        self.telemetry.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_accumulates_in_order() {
        let mut ctx = TerminalContext::new(CancellationToken::new());
        ctx.add_telemetry(TelemetryEntry::general("first"));
        ctx.add_telemetry(TelemetryEntry::general("second"));

        let messages: Vec<_> = ctx.telemetry().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn take_telemetry_drains() {
        let mut ctx = TerminalContext::new(CancellationToken::new());
        ctx.add_telemetry(TelemetryEntry::general("only"));

        assert_eq!(ctx.take_telemetry().len(), 1);
        assert!(ctx.telemetry().is_empty());
    }

    #[test]
    fn cancellation_is_shared_with_caller() {
        let token = CancellationToken::new();
        let ctx = TerminalContext::new(token.clone());
        token.cancel();
        assert!(ctx.cancellation().is_cancelled());
    }
}

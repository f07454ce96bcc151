//! Job execution context.
//!
//! The checker never talks to the job host directly. It goes through the
//! [`ExecutionContext`] trait, which exposes the job's output stream, its
//! operator-facing warning surface, its cancellation token and its
//! telemetry collection.
//!
//! - [`TerminalContext`] writes to the terminal and keeps telemetry in memory
//! - [`MockContext`] captures every interaction for assertions in tests
//!
//! # Example
//!
//! ```
//! use compatcheck::context::{ExecutionContext, MockContext};
//! use compatcheck::telemetry::TelemetryEntry;
//!
//! let mut ctx = MockContext::new();
//! ctx.warning("Host is not supported");
//! ctx.add_telemetry(TelemetryEntry::general("rule fired"));
//!
//! assert!(ctx.has_warning("not supported"));
//! assert_eq!(ctx.telemetry().len(), 1);
//! ```

pub mod mock;
pub mod terminal;

pub use mock::MockContext;
pub use terminal::TerminalContext;

use crate::cancel::CancellationToken;
use crate::telemetry::TelemetryEntry;

/// Trait for the job host the checker reports into.
///
/// This trait allows mocking the host in tests.
pub trait ExecutionContext {
    /// Write an informational line to the job log.
    fn output(&mut self, msg: &str);

    /// Surface a warning to the job operator.
    fn warning(&mut self, msg: &str);

    /// The job's cancellation token.
    fn cancellation(&self) -> CancellationToken;

    /// Append an entry to the job's telemetry collection.
    fn add_telemetry(&mut self, entry: TelemetryEntry);
}

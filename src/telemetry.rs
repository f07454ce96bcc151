//! Job telemetry entries.
//!
//! Telemetry is an append-only list of diagnostics attached to the job,
//! separate from the warnings an operator sees. The checker only appends;
//! the collection itself belongs to the [`ExecutionContext`].
//!
//! [`ExecutionContext`]: crate::context::ExecutionContext

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of characters of probe output kept in a telemetry entry.
pub const MAX_OUTPUT_CHARS: usize = 200;

/// Marker appended to output that was cut at [`MAX_OUTPUT_CHARS`].
pub const TRUNCATION_MARKER: &str = "[...]";

/// Telemetry category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TelemetryCategory {
    /// General diagnostics.
    #[default]
    General,
}

impl fmt::Display for TelemetryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryCategory::General => write!(f, "general"),
        }
    }
}

/// A single telemetry message attached to the job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryEntry {
    /// Category of the entry.
    pub category: TelemetryCategory,
    /// Free-form message.
    pub message: String,
    /// When the entry was recorded.
    pub recorded_at: DateTime<Utc>,
}

impl TelemetryEntry {
    /// Create a general-category entry stamped with the current time.
    pub fn general(message: impl Into<String>) -> Self {
        Self {
            category: TelemetryCategory::General,
            message: message.into(),
            recorded_at: Utc::now(),
        }
    }
}

/// Truncate captured output for telemetry.
///
/// Output of at most [`MAX_OUTPUT_CHARS`] characters is returned verbatim.
/// Longer output keeps its first `MAX_OUTPUT_CHARS` characters followed by
/// [`TRUNCATION_MARKER`]. Counts characters, not bytes.
pub fn truncate_output(output: &str) -> String {
    match output.char_indices().nth(MAX_OUTPUT_CHARS) {
        Some((cut, _)) => format!("{}{}", &output[..cut], TRUNCATION_MARKER),
        None => output.to_string(),
    }
}

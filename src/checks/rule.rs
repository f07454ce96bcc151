//! Warning rules for the host file scan.

use serde::{Deserialize, Serialize};

use crate::error::{CompatError, Result};

/// A known-incompatible host condition.
///
/// If any line of `file_path` matches `pattern` (case-insensitively), the
/// operator is shown `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WarningRule {
    /// Absolute path to an OS-provided file, e.g. `/etc/os-release`.
    pub file_path: String,

    /// Regular expression tested against each line of the file.
    pub pattern: String,

    /// Warning text shown to the operator when the pattern matches.
    pub message: String,
}

impl WarningRule {
    pub fn new(
        file_path: impl Into<String>,
        pattern: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file_path.into(),
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Check that every field is non-empty.
    pub fn validate(&self) -> Result<()> {
        let missing: Vec<&str> = [
            ("file_path", &self.file_path),
            ("pattern", &self.pattern),
            ("message", &self.message),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| *name)
        .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(CompatError::InvalidRule {
                message: format!("missing {}", missing.join(", ")),
            })
        }
    }
}

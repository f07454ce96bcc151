//! Error types for compatibility checks.
//!
//! This module defines [`CompatError`], the error type returned by the
//! fallible building blocks of the checker, and a [`Result`] alias.
//!
//! # Error Handling Strategy
//!
//! - Building blocks (config loading, rule scanning, process launching)
//!   return `CompatError` so callers can tell failure kinds apart
//! - The checker itself never returns an error: every `CompatError` is
//!   caught where it happens and turned into a log event and telemetry
//! - Use `anyhow::Error` (via `CompatError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for compatibility checks.
#[derive(Debug, Error)]
pub enum CompatError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A warning rule is missing one of its fields.
    #[error("Invalid warning rule: {message}")]
    InvalidRule { message: String },

    /// A warning rule pattern failed to compile.
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Matching a single line took longer than the allowed budget.
    #[error("Matching '{pattern}' hit the {budget_ms} ms budget")]
    MatchTimeout { pattern: String, budget_ms: u128 },

    /// The runtime probe executable does not exist.
    #[error("Probe executable not found: {path}")]
    ProbeNotFound { path: PathBuf },

    /// An external program could not be started or awaited.
    #[error("Failed to launch {program}: {message}")]
    LaunchFailed { program: String, message: String },

    /// The operation was cancelled through the job's cancellation token.
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompatError {
    /// Short name of the error kind, used in log events and telemetry.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "ConfigNotFound",
            Self::ConfigParseError { .. } => "ConfigParseError",
            Self::InvalidRule { .. } => "InvalidRule",
            Self::InvalidPattern { .. } => "InvalidPattern",
            Self::MatchTimeout { .. } => "MatchTimeout",
            Self::ProbeNotFound { .. } => "ProbeNotFound",
            Self::LaunchFailed { .. } => "LaunchFailed",
            Self::Cancelled => "Cancelled",
            Self::Io(_) => "Io",
            Self::Other(_) => "Other",
        }
    }

    /// Whether this error came from cancellation rather than a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type alias for compatibility check operations.
pub type Result<T> = std::result::Result<T, CompatError>;

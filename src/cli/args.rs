//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::checks::CheckerMode;

/// compatcheck - Pre-job host compatibility diagnostics.
#[derive(Debug, Parser)]
#[command(name = "compatcheck")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (defaults to ./compatcheck.yml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Job working-directory root used by the runtime probe
    #[arg(short, long)]
    pub work_dir: Option<PathBuf>,

    /// Directory containing the probe binaries
    #[arg(long)]
    pub bin_dir: Option<PathBuf>,

    /// Which checks to run: auto, full or probe_only
    #[arg(long)]
    pub mode: Option<CheckerMode>,

    /// Print recorded telemetry as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_without_arguments() {
        let cli = Cli::parse_from(["compatcheck"]);
        assert!(cli.config.is_none());
        assert!(cli.mode.is_none());
        assert!(!cli.json);
    }

    #[test]
    fn parses_all_flags() {
        let cli = Cli::parse_from([
            "compatcheck",
            "--config",
            "/etc/compatcheck.yml",
            "--work-dir",
            "/work",
            "--bin-dir",
            "/opt/bin",
            "--mode",
            "probe_only",
            "--json",
            "--debug",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/compatcheck.yml")));
        assert_eq!(cli.work_dir, Some(PathBuf::from("/work")));
        assert_eq!(cli.bin_dir, Some(PathBuf::from("/opt/bin")));
        assert_eq!(cli.mode, Some(CheckerMode::ProbeOnly));
        assert!(cli.json);
        assert!(cli.debug);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["compatcheck", "--mode", "never"]).is_err());
    }
}

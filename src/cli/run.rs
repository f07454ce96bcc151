//! The check run.
//!
//! Loads configuration, applies CLI overrides, runs the checker once
//! against the given context and optionally prints telemetry as JSON.

use std::path::{Path, PathBuf};

use crate::checks::{CheckReport, CompatibilityChecker, RuntimeProbe};
use crate::config::{absolute_from, load_or_default, resolve_bin_dir, CheckerConfig};
use crate::context::ExecutionContext;
use crate::error::Result;
use crate::process::SystemLauncher;

use super::args::Cli;

/// A configured check run.
pub struct RunCommand {
    config: CheckerConfig,
    bin_dir: PathBuf,
    work_dir: PathBuf,
}

impl RunCommand {
    /// Build a run from CLI arguments, looking for config in `cwd`.
    pub fn from_cli(cli: &Cli, cwd: &Path) -> Result<Self> {
        let mut config = load_or_default(cli.config.as_deref(), cwd)?;

        if let Some(mode) = cli.mode {
            config.mode = mode;
        }
        if let Some(bin_dir) = &cli.bin_dir {
            config.probe.bin_dir = Some(bin_dir.clone());
        }
        if let Some(work_dir) = &cli.work_dir {
            config.work_dir = Some(work_dir.clone());
        }

        let bin_dir = resolve_bin_dir(&config, cwd)?;
        let work_dir = match &config.work_dir {
            Some(dir) => absolute_from(cwd, dir),
            None => cwd.to_path_buf(),
        };

        Ok(Self {
            config,
            bin_dir,
            work_dir,
        })
    }

    /// The effective configuration.
    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Run the checker once.
    pub fn execute(&self, ctx: &mut dyn ExecutionContext) -> CheckReport {
        let probe = RuntimeProbe::new(
            Box::new(SystemLauncher::new()),
            &self.bin_dir,
            &self.work_dir,
            &self.config.probe,
        );
        tracing::debug!("Runtime probe at {}", probe.executable().display());
        let checker =
            CompatibilityChecker::new(self.config.mode, self.config.rules.clone(), probe);

        tracing::debug!(
            "Running compatibility checks in {} mode with {} rule(s)",
            checker.mode(),
            self.config.rules.len()
        );

        let report = checker.run(ctx);
        ctx.output(&format!(
            "Compatibility checks finished (mode: {}, probe: {})",
            report.mode, report.probe
        ));
        report
    }
}

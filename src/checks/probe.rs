//! Runtime compatibility probe.
//!
//! The probe is a small pre-built program shipped next to the host's own
//! binaries. All it does is print a fixed greeting, so if it exits cleanly
//! with exactly that output the runtime works on this OS and CPU. Running it
//! out of process means a runtime that crashes on this host cannot take the
//! checker down with it.
//!
//! # Example
//!
//! ```no_run
//! use compatcheck::checks::probe::{ProbeSettings, RuntimeProbe};
//! use compatcheck::context::MockContext;
//! use compatcheck::process::SystemLauncher;
//! use std::path::Path;
//!
//! let settings = ProbeSettings::default();
//! let probe = RuntimeProbe::new(
//!     Box::new(SystemLauncher::new()),
//!     Path::new("/opt/runner/bin"),
//!     Path::new("/opt/runner/_work"),
//!     &settings,
//! );
//! let mut ctx = MockContext::new();
//! probe.check(&mut ctx, false);
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::context::ExecutionContext;
use crate::error::{CompatError, Result};
use crate::process::{LaunchOptions, ProcessLauncher};
use crate::telemetry::{truncate_output, TelemetryEntry};

/// Greeting the default probe prints when the runtime loads.
pub const DEFAULT_EXPECTED_OUTPUT: &str = "Hello from .NET 8!";

/// Default probe program name, used for both its directory and executable.
pub const DEFAULT_PROBE_NAME: &str = "testDotNet8Compatibility";

/// Warning shown to the operator when the probe fails.
pub const PROBE_WARNING: &str = "The runtime failed a compatibility check on this host. \
     This operating system or CPU may not be supported by upcoming releases; \
     consider upgrading the host.";

/// Probe settings from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSettings {
    /// Binaries root; defaults to the directory of the running executable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<PathBuf>,

    /// Probe name. The executable lives at `<bin_dir>/<name>/<name>`.
    pub name: String,

    /// Exact output the probe must print.
    pub expected_output: String,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            bin_dir: None,
            name: DEFAULT_PROBE_NAME.to_string(),
            expected_output: DEFAULT_EXPECTED_OUTPUT.to_string(),
        }
    }
}

/// Path of the probe executable under `bin_dir`, with the OS executable suffix.
pub fn probe_executable_path(bin_dir: &Path, name: &str) -> PathBuf {
    bin_dir
        .join(name)
        .join(format!("{}{}", name, std::env::consts::EXE_SUFFIX))
}

/// Outcome of one probe run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Process exit code.
    pub exit_code: i32,
    /// Combined stdout/stderr lines in arrival order.
    pub lines: Vec<String>,
}

impl ProbeResult {
    /// Captured lines joined with newlines and trimmed.
    pub fn output(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }

    /// Whether the probe honored its contract.
    pub fn is_success(&self, expected_output: &str) -> bool {
        self.exit_code == 0 && self.output() == expected_output
    }
}

/// Verdict of a probe check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeVerdict {
    /// Exit code 0 and the expected greeting.
    Passed,
    /// The probe ran but broke its contract.
    Failed,
    /// The probe could not be located or launched.
    Errored,
    /// The job was cancelled while the probe ran.
    Cancelled,
}

impl fmt::Display for ProbeVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeVerdict::Passed => write!(f, "passed"),
            ProbeVerdict::Failed => write!(f, "failed"),
            ProbeVerdict::Errored => write!(f, "errored"),
            ProbeVerdict::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Runs the runtime probe and reports contract violations.
pub struct RuntimeProbe {
    launcher: Box<dyn ProcessLauncher>,
    executable: PathBuf,
    work_dir: PathBuf,
    expected_output: String,
}

impl RuntimeProbe {
    /// Create a probe for `<bin_dir>/<name>/<name>` run from `work_dir`.
    pub fn new(
        launcher: Box<dyn ProcessLauncher>,
        bin_dir: &Path,
        work_dir: &Path,
        settings: &ProbeSettings,
    ) -> Self {
        Self {
            launcher,
            executable: probe_executable_path(bin_dir, &settings.name),
            work_dir: work_dir.to_path_buf(),
            expected_output: settings.expected_output.clone(),
        }
    }

    /// Path of the probe executable.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Run the probe and compare it against its contract.
    ///
    /// With `suppress_warning` set, a failing probe is recorded only in
    /// telemetry and no warning reaches the operator.
    pub fn check(&self, ctx: &mut dyn ExecutionContext, suppress_warning: bool) -> ProbeVerdict {
        let result = match self.run(ctx) {
            Ok(result) => result,
            Err(CompatError::Cancelled) => {
                tracing::info!("Runtime probe cancelled");
                return ProbeVerdict::Cancelled;
            }
            Err(e) => {
                tracing::error!("Runtime probe could not run: {}: {}", e.kind(), e);
                ctx.add_telemetry(TelemetryEntry::general(format!(
                    "Runtime probe error: {}: {}",
                    e.kind(),
                    e
                )));
                return ProbeVerdict::Errored;
            }
        };

        if result.is_success(&self.expected_output) {
            tracing::debug!("Runtime probe passed");
            return ProbeVerdict::Passed;
        }

        let output = result.output();
        tracing::warn!(
            "Runtime probe failed with exit code {}: {}",
            result.exit_code,
            output
        );

        if suppress_warning {
            tracing::debug!("Runtime probe warning suppressed by earlier host warning");
        } else {
            ctx.warning(PROBE_WARNING);
        }

        ctx.add_telemetry(TelemetryEntry::general(format!(
            "Runtime probe failed: exit code {}, output: '{}'",
            result.exit_code,
            truncate_output(&output)
        )));

        ProbeVerdict::Failed
    }

    /// Launch the probe and collect its output.
    pub fn run(&self, ctx: &dyn ExecutionContext) -> Result<ProbeResult> {
        if !self.executable.is_file() {
            return Err(CompatError::ProbeNotFound {
                path: self.executable.clone(),
            });
        }

        let options = LaunchOptions {
            cwd: Some(self.work_dir.clone()),
            ..Default::default()
        };

        tracing::debug!("Launching runtime probe {}", self.executable.display());

        let mut lines = Vec::new();
        let exit_code = self.launcher.execute(
            &self.executable,
            &options,
            &ctx.cancellation(),
            &mut |line| {
                tracing::debug!("[{}] {}", line.stream(), line.text());
                lines.push(line.text().to_string());
            },
        )?;

        Ok(ProbeResult { exit_code, lines })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cancel::CancellationToken;
    use crate::context::MockContext;
    use crate::process::OutputLine;
    use std::fs;
    use tempfile::TempDir;

    /// Launcher that replays canned output.
    struct ScriptedLauncher {
        exit_code: i32,
        lines: Vec<OutputLine>,
    }

    impl ProcessLauncher for ScriptedLauncher {
        fn execute(
            &self,
            _program: &Path,
            _options: &LaunchOptions,
            cancel: &CancellationToken,
            on_line: &mut dyn FnMut(OutputLine),
        ) -> Result<i32> {
            cancel.check()?;
            for line in &self.lines {
                on_line(line.clone());
            }
            Ok(self.exit_code)
        }
    }

    /// Bin dir with an (empty) probe file in place.
    fn bin_dir_with_probe() -> TempDir {
        let temp = TempDir::new().unwrap();
        let path = probe_executable_path(temp.path(), DEFAULT_PROBE_NAME);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        temp
    }

    fn probe(bin: &TempDir, exit_code: i32, lines: Vec<OutputLine>) -> RuntimeProbe {
        RuntimeProbe::new(
            Box::new(ScriptedLauncher { exit_code, lines }),
            bin.path(),
            bin.path(),
            &ProbeSettings::default(),
        )
    }

    fn stdout(text: &str) -> OutputLine {
        OutputLine::Stdout(text.to_string())
    }

    #[test]
    fn executable_path_uses_name_twice() {
        let path = probe_executable_path(Path::new("/opt/bin"), "probe");
        let expected = format!("probe{}", std::env::consts::EXE_SUFFIX);
        assert_eq!(path, Path::new("/opt/bin").join("probe").join(expected));
    }

    #[test]
    fn executable_is_resolved_under_bin_dir() {
        let bin = bin_dir_with_probe();
        let runtime = probe(&bin, 0, Vec::new());
        assert_eq!(
            runtime.executable(),
            probe_executable_path(bin.path(), DEFAULT_PROBE_NAME)
        );
    }

    #[test]
    fn result_output_is_joined_and_trimmed() {
        let result = ProbeResult {
            exit_code: 0,
            lines: vec!["".to_string(), "  Hello  ".to_string(), "".to_string()],
        };
        assert_eq!(result.output(), "Hello");
        assert!(result.is_success("Hello"));
        assert!(!result.is_success("hello"));
    }

    #[test]
    fn expected_greeting_passes_silently() {
        let bin = bin_dir_with_probe();
        let mut ctx = MockContext::new();

        let verdict = probe(&bin, 0, vec![stdout(DEFAULT_EXPECTED_OUTPUT)]).check(&mut ctx, false);

        assert_eq!(verdict, ProbeVerdict::Passed);
        assert!(ctx.warnings().is_empty());
        assert!(ctx.telemetry().is_empty());
    }

    #[test]
    fn nonzero_exit_warns_and_records_telemetry() {
        let bin = bin_dir_with_probe();
        let mut ctx = MockContext::new();

        let verdict = probe(&bin, 134, vec![stdout(DEFAULT_EXPECTED_OUTPUT)]).check(&mut ctx, false);

        assert_eq!(verdict, ProbeVerdict::Failed);
        assert_eq!(ctx.warnings(), [PROBE_WARNING]);
        assert!(ctx.has_telemetry("exit code 134"));
    }

    #[test]
    fn unexpected_output_fails_even_with_zero_exit() {
        let bin = bin_dir_with_probe();
        let mut ctx = MockContext::new();
        let lines = vec![
            stdout(DEFAULT_EXPECTED_OUTPUT),
            OutputLine::Stderr("GC heap initialization failed".to_string()),
        ];

        let verdict = probe(&bin, 0, lines).check(&mut ctx, false);

        assert_eq!(verdict, ProbeVerdict::Failed);
        assert!(ctx.has_telemetry("GC heap initialization failed"));
    }

    #[test]
    fn suppressed_failure_records_telemetry_only() {
        let bin = bin_dir_with_probe();
        let mut ctx = MockContext::new();

        let verdict = probe(&bin, 1, vec![stdout("Illegal instruction")]).check(&mut ctx, true);

        assert_eq!(verdict, ProbeVerdict::Failed);
        assert!(ctx.warnings().is_empty());
        assert!(ctx.has_telemetry("Illegal instruction"));
    }

    #[test]
    fn long_output_is_truncated_in_telemetry() {
        let bin = bin_dir_with_probe();
        let mut ctx = MockContext::new();
        let output = "x".repeat(250);

        probe(&bin, 1, vec![stdout(&output)]).check(&mut ctx, false);

        let message = &ctx.telemetry()[0].message;
        assert!(message.contains(&format!("'{}[...]'", "x".repeat(200))));
        assert!(!message.contains(&"x".repeat(201)));
    }

    #[test]
    fn missing_executable_is_recorded_not_warned() {
        let bin = TempDir::new().unwrap();
        let mut ctx = MockContext::new();

        let verdict = probe(&bin, 0, Vec::new()).check(&mut ctx, false);

        assert_eq!(verdict, ProbeVerdict::Errored);
        assert!(ctx.warnings().is_empty());
        assert!(ctx.has_telemetry("ProbeNotFound"));
    }

    #[test]
    fn cancellation_records_nothing() {
        let bin = bin_dir_with_probe();
        let token = CancellationToken::new();
        token.cancel();
        let mut ctx = MockContext::with_cancellation(token);

        let verdict = probe(&bin, 1, vec![stdout("boom")]).check(&mut ctx, false);

        assert_eq!(verdict, ProbeVerdict::Cancelled);
        assert!(ctx.warnings().is_empty());
        assert!(ctx.telemetry().is_empty());
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: ProbeSettings = serde_yaml::from_str("bin_dir: /opt/bin\n").unwrap();
        assert_eq!(settings.bin_dir, Some(PathBuf::from("/opt/bin")));
        assert_eq!(settings.name, DEFAULT_PROBE_NAME);
        assert_eq!(settings.expected_output, DEFAULT_EXPECTED_OUTPUT);
    }
}

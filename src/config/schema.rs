//! Configuration schema.
//!
//! Maps the YAML configuration file onto the checker's settings.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::checks::{CheckerMode, ProbeSettings, WarningRule};

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Which checks run: auto, full or probe_only.
    pub mode: CheckerMode,

    /// Host file rules, evaluated in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<WarningRule>,

    /// Runtime probe settings.
    pub probe: ProbeSettings,

    /// Job working-directory root, used as the probe's working directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::probe::{DEFAULT_EXPECTED_OUTPUT, DEFAULT_PROBE_NAME};

    #[test]
    fn empty_document_uses_defaults() {
        let config: CheckerConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, CheckerConfig::default());
        assert_eq!(config.mode, CheckerMode::Auto);
        assert_eq!(config.probe.name, DEFAULT_PROBE_NAME);
        assert_eq!(config.probe.expected_output, DEFAULT_EXPECTED_OUTPUT);
    }

    #[test]
    fn full_document_parses() {
        let yaml = r#"
mode: probe_only
rules:
  - file_path: /etc/os-release
    pattern: 'VERSION_ID="?16\.04'
    message: Ubuntu 16.04 is no longer supported.
  - file_path: /etc/redhat-release
    message: missing pattern
probe:
  bin_dir: /opt/runner/bin
  expected_output: ok
work_dir: /opt/runner/_work
"#;
        let config: CheckerConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.mode, CheckerMode::ProbeOnly);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].pattern, r#"VERSION_ID="?16\.04"#);
        assert!(config.rules[1].pattern.is_empty());
        assert_eq!(config.probe.bin_dir, Some(PathBuf::from("/opt/runner/bin")));
        assert_eq!(config.probe.name, DEFAULT_PROBE_NAME);
        assert_eq!(config.probe.expected_output, "ok");
        assert_eq!(config.work_dir, Some(PathBuf::from("/opt/runner/_work")));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        let result: Result<CheckerConfig, _> = serde_yaml::from_str("mode: sometimes\n");
        assert!(result.is_err());
    }
}

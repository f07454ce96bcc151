//! Configuration file discovery and loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::CheckerConfig;
use crate::error::{CompatError, Result};

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "compatcheck.yml";

/// Load configuration from an explicit file.
pub fn load_config(path: &Path) -> Result<CheckerConfig> {
    if !path.exists() {
        return Err(CompatError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    parse_config(&content, path)
}

/// Load `explicit` if given, else `compatcheck.yml` in `dir` if present,
/// else the defaults.
///
/// An explicit path that does not exist is an error; a missing default file
/// is not.
pub fn load_or_default(explicit: Option<&Path>, dir: &Path) -> Result<CheckerConfig> {
    if let Some(path) = explicit {
        return load_config(path);
    }

    let default_path = dir.join(DEFAULT_CONFIG_FILE);
    if default_path.is_file() {
        load_config(&default_path)
    } else {
        tracing::debug!(
            "No {} in {}, using defaults",
            DEFAULT_CONFIG_FILE,
            dir.display()
        );
        Ok(CheckerConfig::default())
    }
}

/// Binaries root for the probe: configured, else the running executable's
/// directory.
///
/// A relative configured path is taken relative to `base`, so the probe
/// still resolves once it is launched from a different working directory.
pub fn resolve_bin_dir(config: &CheckerConfig, base: &Path) -> Result<PathBuf> {
    if let Some(dir) = &config.probe.bin_dir {
        return Ok(absolute_from(base, dir));
    }

    let exe = std::env::current_exe()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        CompatError::Other(anyhow::anyhow!(
            "executable {} has no parent directory",
            exe.display()
        ))
    })
}

/// Join `path` onto `base` unless it is already absolute.
pub fn absolute_from(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn parse_config(content: &str, path: &Path) -> Result<CheckerConfig> {
    if content.trim().is_empty() {
        return Ok(CheckerConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| CompatError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

//! Configuration loading.
//!
//! - [`schema`] - YAML schema for rules, probe settings and mode
//! - [`loader`] - File discovery and parsing

pub mod loader;
pub mod schema;

pub use loader::{
    absolute_from, load_config, load_or_default, resolve_bin_dir, DEFAULT_CONFIG_FILE,
};
pub use schema::CheckerConfig;

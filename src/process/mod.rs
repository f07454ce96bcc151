//! External process launching.

pub mod launcher;

pub use launcher::{LaunchOptions, OutputLine, ProcessLauncher, SystemLauncher};

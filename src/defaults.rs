//! Default values for taglock projects.
//!
//! This module provides centralized default values used across the library
//! and the CLI, ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// File name of the project manifest inside the base directory.
pub const MANIFEST_FILENAME: &str = ".taglock.yaml";

/// File name of the lockfile inside the base directory.
pub const LOCK_FILENAME: &str = ".taglock.lock";

/// Executable used by the default repository adapter.
pub const DEFAULT_GIT_PROGRAM: &str = "git";

/// Returns the default project base directory.
///
/// This is the current working directory, falling back to `.` when it
/// cannot be determined. It can be overridden by the `--chdir` CLI flag or
/// the `TAGLOCK_DIR` environment variable.
pub fn default_base_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

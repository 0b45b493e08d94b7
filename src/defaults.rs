//! Default values for resource-type-sync configuration.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Base URL of the GitHub REST API.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// HTTP timeout applied to every remote request, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Key used for the change list in the change-summary file.
pub const CHANGES_OUTPUT_KEY: &str = "changes";

/// User agent sent with remote requests. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("resource-type-sync/", env!("CARGO_PKG_VERSION"));

/// Returns the default configuration file path.
///
/// This can be overridden by the `--config` CLI flag or the `CONFIG_FILE`
/// environment variable.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".github").join("resource-type-sync-config.yaml")
}

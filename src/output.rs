//! Console decoration and the CI change summary.
//!
//! Progress lines use emoji only when color is wanted. `--color` decides
//! when set to `always` or `never`; in `auto` mode `NO_COLOR`, `CLICOLOR`,
//! `CLICOLOR_FORCE` and `TERM=dumb` are honored before asking the terminal.
//!
//! The change summary is the one machine-readable output: a heredoc block
//! appended to the file named by `GITHUB_OUTPUT`.

use crate::error::{Error, Result};
use crate::pipeline::ChangeLog;
use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Whether console output may use color and emoji.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag (`always`, `never`, anything else is
    /// `auto`) against the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// `emoji_str` when color is on, otherwise the bracketed `plain` tag.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Render `changes` as a `key<<EOF` heredoc block.
pub fn change_summary_block(key: &str, changes: &ChangeLog) -> String {
    format!("{}<<EOF\n{}\nEOF\n", key, changes)
}

/// Append the change summary to `path` (the file named by `GITHUB_OUTPUT`).
///
/// Nothing is written when there are no changes.
pub fn append_change_summary(path: &Path, key: &str, changes: &ChangeLog) -> Result<()> {
    if changes.is_empty() {
        return Ok(());
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| Error::Filesystem {
            message: format!("Failed to open '{}': {}", path.display(), e),
        })?;
    file.write_all(change_summary_block(key, changes).as_bytes())
        .map_err(|e| Error::Filesystem {
            message: format!("Failed to write '{}': {}", path.display(), e),
        })
}

//! Path filtering and the opt-in gate.
//!
//! Both checks decide whether a remote file is synced, but at different
//! costs. `PathFilter` only looks at the path, so it runs before any content
//! is fetched. `OptInGate` may look at the content and runs afterwards.

use crate::config::{Strategy, SyncConfig};
use crate::error::Result;
use crate::manifest::ParsedManifest;
use crate::pattern::ShellPattern;
use log::warn;

/// Compiled base-path, include, and exclude rules.
///
/// Globs use shell filename semantics (see `pattern`) against the full path
/// string, so `*` also matches `/` and `**/x` needs at least one `/`.
#[derive(Debug, Clone)]
pub struct PathFilter {
    base_path: String,
    include: Vec<ShellPattern>,
    exclude: Vec<ShellPattern>,
}

impl PathFilter {
    /// Compile a filter from raw patterns.
    pub fn new<S: AsRef<str>>(base_path: &str, include: &[S], exclude: &[S]) -> Result<Self> {
        Ok(Self {
            base_path: base_path.to_string(),
            include: compile(include)?,
            exclude: compile(exclude)?,
        })
    }

    /// Build the filter described by a configuration.
    pub fn from_config(config: &SyncConfig) -> Result<Self> {
        Self::new(
            &config.source.base_path,
            &config.file_patterns,
            &config.exclude_patterns,
        )
    }

    /// True when `path` is under the base path, matches an include glob, and
    /// matches no exclude glob. Checks run in that order.
    pub fn matches(&self, path: &str) -> bool {
        if !path.starts_with(&self.base_path) {
            return false;
        }
        if !self.include.iter().any(|p| p.matches(path)) {
            return false;
        }
        !self.exclude.iter().any(|p| p.matches(path))
    }
}

fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<ShellPattern>> {
    patterns
        .iter()
        .map(|p| ShellPattern::new(p.as_ref()))
        .collect()
}

/// Decides whether a path-filtered file opts in to syncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptInGate {
    /// The named top-level field must be exactly boolean `true`.
    Metadata { field: String },
    /// Everything that passed the path filter is in.
    Convention,
}

impl OptInGate {
    /// Build the gate described by a configuration.
    ///
    /// A metadata strategy without a field name admits nothing. Loaded
    /// configurations never reach that case.
    pub fn from_config(config: &SyncConfig) -> Self {
        match config.sync.strategy {
            Strategy::Metadata => OptInGate::Metadata {
                field: config.metadata_field().unwrap_or_default().to_string(),
            },
            Strategy::Convention => OptInGate::Convention,
        }
    }

    /// Whether `content` (fetched from `path`) opts in.
    ///
    /// Content that fails to parse is treated as not opted in.
    pub fn admits(&self, path: &str, content: &str) -> bool {
        match self {
            OptInGate::Convention => true,
            OptInGate::Metadata { field } => {
                if field.is_empty() {
                    return false;
                }
                match ParsedManifest::parse(content) {
                    Ok(parsed) => parsed.flag(field),
                    Err(e) => {
                        warn!("Error parsing YAML in {}: {}", path, e);
                        false
                    }
                }
            }
        }
    }
}

//! # Configuration Schema and Parsing
//!
//! This module defines the data structures that represent the sync
//! configuration file, as well as the logic for parsing it.
//!
//! ## Key Components
//!
//! - **`SyncConfig`**: The whole configuration file: where manifests come
//!   from (`source`), where they go (`target`), how a file opts in (`sync`),
//!   what makes it valid (`validation`), and which paths are considered at
//!   all (`filePatterns` / `excludePatterns`).
//!
//! - **`RunOptions`**: Values supplied by the environment rather than the
//!   file (token, repository override, dry-run toggle, timeout). They are
//!   applied after parsing so the same file can be reused across
//!   environments.
//!
//! ## Parsing
//!
//! `parse` first reads the document as a raw YAML mapping so that missing
//! sections can be reported by name with a hint, then deserializes it into
//! `SyncConfig` and checks the cross-field rules serde cannot express (a
//! metadata field is required by the `metadata` strategy, every glob must
//! compile). The source repository may be left empty in the file; it is
//! checked once `apply_overrides` has produced the effective configuration.

use crate::error::{Error, Result};
use crate::pattern::ShellPattern;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Sections that must be present in every configuration file.
const REQUIRED_SECTIONS: &[(&str, &str)] = &[
    ("source", "Add a 'source:' block with 'repository' and 'branch'"),
    ("target", "Add a 'target:' block with a 'directory'"),
    ("sync", "Add a 'sync:' block with a 'strategy' (metadata or convention)"),
    ("filePatterns", "Add 'filePatterns:' with the include globs"),
];

/// Where manifests are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Repository identifier, e.g. `owner/name`. May be left empty when the
    /// run supplies an override.
    #[serde(default)]
    pub repository: String,
    /// Branch to read the tree from.
    pub branch: String,
    /// Only paths starting with this prefix are candidates. Stripped from the
    /// target path.
    #[serde(default)]
    pub base_path: String,
}

/// Where manifests are written to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetConfig {
    /// Directory receiving the synced files.
    pub directory: String,
    /// Inserted in front of each synced file name.
    #[serde(default)]
    pub file_prefix: Option<String>,
}

/// How a path-filtered file opts in to syncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// The file must set the configured metadata field to boolean `true`.
    Metadata,
    /// Every path-filtered file is synced.
    Convention,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Metadata => write!(f, "metadata"),
            Strategy::Convention => write!(f, "convention"),
        }
    }
}

/// Opt-in rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSection {
    pub strategy: Strategy,
    /// Name of the top-level boolean flag read by the `metadata` strategy.
    #[serde(default)]
    pub metadata_field: Option<String>,
    /// Remove the metadata field from the document before it is written.
    #[serde(default)]
    pub strip_metadata_field: bool,
}

/// Structural validation rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Top-level fields every manifest must carry.
    #[serde(default)]
    pub required_fields: Vec<String>,
}

/// The complete sync configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncConfig {
    pub source: SourceConfig,
    pub target: TargetConfig,
    pub sync: SyncSection,
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Include globs; a candidate must match at least one. An empty list
    /// matches nothing.
    pub file_patterns: Vec<String>,
    /// Exclude globs; a candidate must match none.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

/// Per-run inputs that come from the environment instead of the config file.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Bearer token for the remote provider.
    pub token: Option<String>,
    /// Takes precedence over `source.repository`.
    pub source_repository: Option<String>,
    /// Compute and report changes without touching the target tree.
    pub dry_run: bool,
    /// Timeout for each remote request. `None` leaves the transport default.
    pub timeout: Option<Duration>,
}

impl SyncConfig {
    /// The metadata field read by the `metadata` strategy, if any.
    pub fn metadata_field(&self) -> Option<&str> {
        self.sync
            .metadata_field
            .as_deref()
            .filter(|field| !field.is_empty())
    }

    /// The configured file prefix, treating an empty string as unset.
    pub fn file_prefix(&self) -> Option<&str> {
        self.target
            .file_prefix
            .as_deref()
            .filter(|prefix| !prefix.is_empty())
    }

    /// Return the effective configuration for a run with `options` applied.
    ///
    /// Fails when neither the file nor the override names a repository.
    pub fn apply_overrides(&self, options: &RunOptions) -> Result<SyncConfig> {
        let mut effective = self.clone();
        if let Some(repository) = options
            .source_repository
            .as_ref()
            .filter(|repo| !repo.trim().is_empty())
        {
            effective.source.repository = repository.clone();
        }

        if effective.source.repository.trim().is_empty() {
            return Err(Error::ConfigParse {
                message: "'source.repository' must not be empty".to_string(),
                hint: Some(
                    "Set it in the file or through SOURCE_REPO / --source-repo, e.g. 'radius-project/resource-types-contrib'"
                        .to_string(),
                ),
            });
        }
        Ok(effective)
    }

    /// Check rules that span fields.
    fn check(&self) -> Result<()> {
        if self.sync.strategy == Strategy::Metadata && self.metadata_field().is_none() {
            return Err(Error::ConfigParse {
                message: "'sync.metadataField' is required when strategy is 'metadata'".to_string(),
                hint: Some("Add 'metadataField: defaultRegistration' to the 'sync:' block".to_string()),
            });
        }

        if self.sync.strip_metadata_field && self.metadata_field().is_none() {
            return Err(Error::ConfigParse {
                message: "'sync.stripMetadataField' needs 'sync.metadataField'".to_string(),
                hint: None,
            });
        }

        for pattern in self.file_patterns.iter().chain(&self.exclude_patterns) {
            ShellPattern::new(pattern).map_err(|e| Error::ConfigParse {
                message: format!("Invalid glob pattern '{}': {}", pattern, e),
                hint: None,
            })?;
        }

        Ok(())
    }
}

/// Parses a YAML string into a `SyncConfig`.
pub fn parse(yaml_content: &str) -> Result<SyncConfig> {
    use serde_yaml::Value;

    let raw: Value = serde_yaml::from_str(yaml_content).map_err(|e| Error::ConfigParse {
        message: format!("Invalid YAML: {}", e),
        hint: None,
    })?;

    let Value::Mapping(map) = &raw else {
        return Err(Error::ConfigParse {
            message: "Expected a YAML mapping at the top level".to_string(),
            hint: Some("The file must define 'source', 'target', 'sync' and 'filePatterns'".to_string()),
        });
    };

    for (section, hint) in REQUIRED_SECTIONS {
        if !map.contains_key(*section) {
            return Err(Error::ConfigParse {
                message: format!("Missing required section '{}'", section),
                hint: Some(hint.to_string()),
            });
        }
    }

    let config: SyncConfig = serde_yaml::from_value(raw).map_err(|e| Error::ConfigParse {
        message: e.to_string(),
        hint: None,
    })?;
    config.check()?;
    Ok(config)
}

/// Parse a `SyncConfig` from a YAML file path.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<SyncConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ConfigNotFound {
            path: path.display().to_string(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

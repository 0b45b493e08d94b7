//! # Sync Pipeline
//!
//! Drives one sync run. The flow is linear and single-pass:
//!
//! 1.  **Fetch tree**: list every entry of the source repository. Failure
//!     aborts the run.
//! 2.  **Path filter**: for each blob, check base path, include and exclude
//!     globs. Nothing is fetched for paths that fail.
//! 3.  **Fetch content**: a failure skips the file.
//! 4.  **Gate**: the opt-in strategy decides whether the file is wanted.
//! 5.  **Validate**: structural checks; a failure skips the file with a
//!     warning.
//! 6.  **Diff and write**: compute the target path, compare against the
//!     local copy, and write only when the content changed (never in dry-run
//!     mode). Local filesystem errors abort the run.
//!
//! Every entry ends with a `Decision`. Entries that were (or in dry-run mode
//! would have been) written are appended to the `ChangeLog` in tree order.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::filesystem::LocalStore;
use crate::filter::{OptInGate, PathFilter};
use crate::manifest::{ManifestCandidate, ParsedManifest};
use crate::path::target_relative_path;
use crate::remote::RemoteProvider;
use crate::validate::{Invalid, Validator};
use log::{debug, info, warn};
use std::fmt;

/// Outcome for a single tree entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Failed the base-path or glob checks.
    OutOfScope,
    /// Content could not be fetched.
    FetchFailed(String),
    /// The opt-in gate rejected the content.
    NotOptedIn,
    /// Validation failed.
    Invalid(Invalid),
    /// The target already holds identical content.
    Unchanged { target: String },
    /// Written, or would be written in dry-run mode.
    Synced { target: String, created: bool },
}

impl Decision {
    pub fn is_synced(&self) -> bool {
        matches!(self, Decision::Synced { .. })
    }
}

/// Ordered record of target paths written during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeLog {
    entries: Vec<String>,
}

impl ChangeLog {
    pub fn push(&mut self, relative_path: &str) {
        self.entries.push(format!("- {}", relative_path));
    }

    /// Entries as list items, e.g. `- cache/redis.yaml`.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for ChangeLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entries.join("\n"))
    }
}

/// Everything a run produced.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Decision per blob entry, in tree order.
    pub decisions: Vec<(String, Decision)>,
    /// Number of blob entries in the tree.
    pub files_checked: usize,
    pub changes: ChangeLog,
    pub dry_run: bool,
}

impl SyncReport {
    pub fn files_synced(&self) -> usize {
        self.decisions.iter().filter(|(_, d)| d.is_synced()).count()
    }

    pub fn added(&self) -> Vec<&str> {
        self.synced_where(true)
    }

    pub fn updated(&self) -> Vec<&str> {
        self.synced_where(false)
    }

    pub fn unchanged(&self) -> Vec<&str> {
        self.decisions
            .iter()
            .filter_map(|(_, d)| match d {
                Decision::Unchanged { target } => Some(target.as_str()),
                _ => None,
            })
            .collect()
    }

    fn synced_where(&self, was_created: bool) -> Vec<&str> {
        self.decisions
            .iter()
            .filter_map(|(_, d)| match d {
                Decision::Synced { target, created } if *created == was_created => {
                    Some(target.as_str())
                }
                _ => None,
            })
            .collect()
    }
}

/// Run the pipeline once.
///
/// `config` is the effective configuration with any environment overrides
/// already applied. In dry-run mode `store` is only read.
pub fn run(
    config: &SyncConfig,
    dry_run: bool,
    remote: &dyn RemoteProvider,
    store: &mut dyn LocalStore,
) -> Result<SyncReport> {
    let filter = PathFilter::from_config(config)?;
    let gate = OptInGate::from_config(config);
    let validator = Validator::from_config(&config.validation);
    let strip_field = config
        .sync
        .strip_metadata_field
        .then(|| config.metadata_field())
        .flatten();

    info!("Fetching repository tree from {}...", config.source.repository);
    let tree = remote.fetch_tree(&config.source)?;

    let mut report = SyncReport {
        dry_run,
        ..Default::default()
    };

    for entry in tree.iter().filter(|e| e.is_blob()) {
        report.files_checked += 1;
        let path = entry.path.as_str();

        if !filter.matches(path) {
            debug!("Out of scope: {}", path);
            report.decisions.push((path.to_string(), Decision::OutOfScope));
            continue;
        }

        info!("Checking file: {}", path);
        let content = match remote.fetch_content(&config.source, path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Error fetching file {}: {}", path, e);
                report
                    .decisions
                    .push((path.to_string(), Decision::FetchFailed(e.to_string())));
                continue;
            }
        };
        let candidate = ManifestCandidate {
            path: path.to_string(),
            content,
        };

        let decision = decide(&candidate, config, &gate, &validator, strip_field, dry_run, store)?;
        if let Decision::Synced { target, .. } = &decision {
            report.changes.push(target);
        }
        report.decisions.push((candidate.path, decision));
    }

    Ok(report)
}

/// Gate, validate, diff, and write a single fetched candidate.
fn decide(
    candidate: &ManifestCandidate,
    config: &SyncConfig,
    gate: &OptInGate,
    validator: &Validator,
    strip_field: Option<&str>,
    dry_run: bool,
    store: &mut dyn LocalStore,
) -> Result<Decision> {
    let path = candidate.path.as_str();

    if !gate.admits(path, &candidate.content) {
        info!("  Skipping (not marked for sync)");
        return Ok(Decision::NotOptedIn);
    }

    if let Err(invalid) = validator.validate(&candidate.content) {
        warn!("  {}", invalid);
        warn!("  Validation failed for {}, skipping", path);
        return Ok(Decision::Invalid(invalid));
    }

    let output = match strip_field {
        Some(field) => match ParsedManifest::parse(&candidate.content)
            .and_then(|parsed| parsed.without_field(field))
        {
            Ok(output) => output,
            Err(e) => {
                warn!("  Could not remove '{}' from {}: {}, skipping", field, path, e);
                return Ok(Decision::Invalid(Invalid::Unparsable(e.to_string())));
            }
        },
        None => candidate.content.clone(),
    };

    let target = target_relative_path(path, &config.source.base_path, config.file_prefix())?;

    let existing = store.read(&target)?;
    if existing.as_deref() == Some(output.as_bytes()) {
        info!("  No changes needed");
        return Ok(Decision::Unchanged { target });
    }

    if dry_run {
        info!("  Would sync to: {}", target);
    } else {
        info!("  Syncing to: {}", target);
        store.write(&target, output.as_bytes())?;
    }

    Ok(Decision::Synced {
        target,
        created: existing.is_none(),
    })
}

//! # Remote Tree Providers
//!
//! The pipeline reads the source repository through the `RemoteProvider`
//! trait: one call lists the whole tree, another fetches the text of a
//! single file. Keeping this behind a trait lets the filter, validator, and
//! writer run against fakes in tests without network access.
//!
//! ## Implementations
//!
//! - **`GitHubProvider`**: The GitHub REST API, using a recursive tree query
//!   and the contents endpoint.
//! - **`LocalDirProvider`**: A directory on disk laid out like the source
//!   repository, for offline runs.
//! - **`MemoryRemote`**: An ordered in-memory tree for tests.

pub mod github;
pub mod local;

pub use github::GitHubProvider;
pub use local::LocalDirProvider;

use crate::config::SourceConfig;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::cell::RefCell;
use std::collections::HashMap;

/// Kind of an entry in a repository tree listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file; the only kind that can be synced.
    Blob,
    /// A directory.
    Tree,
    /// Anything else the provider reports, such as submodule commits.
    #[serde(other)]
    Other,
}

/// One entry of a recursive tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    /// `/`-separated path from the repository root.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn blob<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Blob,
        }
    }

    pub fn tree<S: Into<String>>(path: S) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Tree,
        }
    }

    pub fn is_blob(&self) -> bool {
        self.kind == EntryKind::Blob
    }
}

/// Read access to the source repository.
pub trait RemoteProvider {
    /// List every entry of `source.repository` at `source.branch`, recursively.
    fn fetch_tree(&self, source: &SourceConfig) -> Result<Vec<TreeEntry>>;

    /// Fetch the text of the file at `path`.
    fn fetch_content(&self, source: &SourceConfig, path: &str) -> Result<String>;
}

/// In-memory `RemoteProvider` that keeps entries in insertion order.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    entries: Vec<TreeEntry>,
    contents: HashMap<String, String>,
    fetched: RefCell<Vec<String>>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with content.
    pub fn with_file(mut self, path: &str, content: &str) -> Self {
        self.entries.push(TreeEntry::blob(path));
        self.contents.insert(path.to_string(), content.to_string());
        self
    }

    /// Add a directory entry.
    pub fn with_dir(mut self, path: &str) -> Self {
        self.entries.push(TreeEntry::tree(path));
        self
    }

    /// Add a file whose content cannot be fetched.
    pub fn with_unreadable_file(mut self, path: &str) -> Self {
        self.entries.push(TreeEntry::blob(path));
        self
    }

    /// Paths whose content has been requested, in request order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }
}

impl RemoteProvider for MemoryRemote {
    fn fetch_tree(&self, _source: &SourceConfig) -> Result<Vec<TreeEntry>> {
        Ok(self.entries.clone())
    }

    fn fetch_content(&self, source: &SourceConfig, path: &str) -> Result<String> {
        self.fetched.borrow_mut().push(path.to_string());
        self.contents
            .get(path)
            .cloned()
            .ok_or_else(|| Error::RemoteFetch {
                url: format!("memory://{}/{}", source.repository, path),
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}

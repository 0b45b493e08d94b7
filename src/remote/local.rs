//! Directory-backed provider.
//!
//! Treats a local checkout as the source repository. The repository and
//! branch in the configuration are ignored; whatever is on disk under the
//! root is the tree.

use super::{EntryKind, RemoteProvider, TreeEntry};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// `RemoteProvider` reading from a local directory.
#[derive(Debug, Clone)]
pub struct LocalDirProvider {
    root: PathBuf,
}

impl LocalDirProvider {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// `/`-joined path of `path` relative to `root`.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}

impl RemoteProvider for LocalDirProvider {
    fn fetch_tree(&self, source: &SourceConfig) -> Result<Vec<TreeEntry>> {
        debug!(
            "Reading tree from {} (ignoring {}@{})",
            self.root.display(),
            source.repository,
            source.branch
        );

        if !self.root.is_dir() {
            return Err(Error::RemoteFetch {
                url: self.root.display().to_string(),
                status: 404,
                message: "source directory does not exist".to_string(),
            });
        }

        let mut entries = Vec::new();
        let walker = WalkDir::new(&self.root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.file_name() != ".git");

        for entry in walker {
            let entry = entry.map_err(|e| Error::Filesystem {
                message: format!("Failed to walk '{}': {}", self.root.display(), e),
            })?;
            let Some(path) = relative_key(&self.root, entry.path()) else {
                debug!("Skipping non UTF-8 path {}", entry.path().display());
                continue;
            };
            let kind = if entry.file_type().is_dir() {
                EntryKind::Tree
            } else if entry.file_type().is_file() {
                EntryKind::Blob
            } else {
                EntryKind::Other
            };
            entries.push(TreeEntry { path, kind });
        }

        Ok(entries)
    }

    fn fetch_content(&self, _source: &SourceConfig, path: &str) -> Result<String> {
        let full_path = path
            .split('/')
            .fold(self.root.clone(), |acc, segment| acc.join(segment));
        fs::read_to_string(&full_path).map_err(|e| Error::RemoteFetch {
            url: full_path.display().to_string(),
            status: if e.kind() == std::io::ErrorKind::NotFound {
                404
            } else {
                500
            },
            message: e.to_string(),
        })
    }
}

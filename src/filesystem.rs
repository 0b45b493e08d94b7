//! Local target tree access.
//!
//! The pipeline never touches `std::fs` directly. It goes through
//! `LocalStore`, which has a disk-backed implementation rooted at the target
//! directory and an in-memory one for tests and previews.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Read and write access to the target tree, keyed by `/`-separated paths
/// relative to its root.
pub trait LocalStore {
    /// Current content at `relative_path`, or `None` if there is no file.
    fn read(&self, relative_path: &str) -> Result<Option<Vec<u8>>>;

    /// Create or overwrite `relative_path`, creating parent directories.
    fn write(&mut self, relative_path: &str, content: &[u8]) -> Result<()>;
}

/// `LocalStore` backed by a directory on disk.
#[derive(Debug, Clone)]
pub struct DiskStore {
    root: PathBuf,
}

impl DiskStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a relative target path.
    pub fn full_path(&self, relative_path: &str) -> PathBuf {
        relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(self.root.clone(), |acc, segment| acc.join(segment))
    }
}

impl LocalStore for DiskStore {
    fn read(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.full_path(relative_path);
        match fs::read(&full_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Filesystem {
                message: format!("Failed to read file '{}': {}", full_path.display(), e),
            }),
        }
    }

    fn write(&mut self, relative_path: &str, content: &[u8]) -> Result<()> {
        let full_path = self.full_path(relative_path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::Filesystem {
                message: format!("Failed to create directory '{}': {}", parent.display(), e),
            })?;
        }

        fs::write(&full_path, content).map_err(|e| Error::Filesystem {
            message: format!("Failed to write file '{}': {}", full_path.display(), e),
        })
    }
}

/// In-memory `LocalStore`.
///
/// Counts writes so callers can assert that a dry run left it untouched.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: BTreeMap<String, Vec<u8>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without counting it as a write.
    pub fn with_file(mut self, relative_path: &str, content: &str) -> Self {
        self.files
            .insert(relative_path.to_string(), content.as_bytes().to_vec());
        self
    }

    /// Content of a file as text, if present and valid UTF-8.
    pub fn get_string(&self, relative_path: &str) -> Option<&str> {
        self.files
            .get(relative_path)
            .and_then(|content| std::str::from_utf8(content).ok())
    }

    pub fn exists(&self, relative_path: &str) -> bool {
        self.files.contains_key(relative_path)
    }

    /// Number of `write` calls made so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl LocalStore for MemoryStore {
    fn read(&self, relative_path: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files.get(relative_path).cloned())
    }

    fn write(&mut self, relative_path: &str, content: &[u8]) -> Result<()> {
        self.writes += 1;
        self.files
            .insert(relative_path.to_string(), content.to_vec());
        Ok(())
    }
}

//! Target path computation for synced manifests.

use crate::error::{Error, Result};

/// Strip `base_path` from a source path and drop any leading separators.
///
/// Paths outside `base_path` are returned unchanged; the path filter keeps
/// them out of the pipeline before this is reached.
pub fn strip_base_path<'a>(path: &'a str, base_path: &str) -> &'a str {
    path.strip_prefix(base_path)
        .unwrap_or(path)
        .trim_start_matches('/')
}

/// Insert `prefix` in front of the file name of `relative_path`.
///
/// `"subdir/test.yaml"` with `"synced_"` becomes `"subdir/synced_test.yaml"`;
/// a bare file name simply gets the prefix. An empty prefix is the identity.
pub fn apply_file_prefix(relative_path: &str, prefix: &str) -> String {
    if prefix.is_empty() {
        return relative_path.to_string();
    }
    match relative_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/{}{}", dir, prefix, file),
        None => format!("{}{}", prefix, relative_path),
    }
}

/// Compute the path, relative to the target directory, a source file is
/// written to.
///
/// Fails when the result would escape the target directory or is empty.
pub fn target_relative_path(path: &str, base_path: &str, prefix: Option<&str>) -> Result<String> {
    let relative = strip_base_path(path, base_path);
    let target = apply_file_prefix(relative, prefix.unwrap_or_default());

    if relative.is_empty() || target.split('/').any(|segment| segment == "..") {
        return Err(Error::Path {
            message: format!("Cannot map '{}' into the target directory", path),
        });
    }
    Ok(target)
}

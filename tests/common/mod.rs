//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures and helper functions to reduce
//! duplication across test files.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new()
//!         .with_config(configs::METADATA)
//!         .with_source_file("types/redis.yaml", manifests::OPTED_IN);
//!     fixture.sync_command().assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::Path;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    #[allow(unused_imports)]
    pub use super::manifests;
    pub use super::TestFixture;
}

/// Environment variables the binary reads. Cleared on every command so the
/// host CI environment cannot leak into a test.
pub const ENV_INPUTS: &[&str] = &[
    "CONFIG_FILE",
    "GITHUB_TOKEN",
    "SOURCE_REPO",
    "DRY_RUN",
    "GITHUB_OUTPUT",
    "SYNC_TIMEOUT",
    "GITHUB_API_URL",
    "RUST_LOG",
];

/// Common configuration YAML snippets for testing.
///
/// Targets are relative to the fixture directory, which is the working
/// directory of every fixture command.
#[allow(dead_code)]
pub mod configs {
    /// Metadata strategy with validation, reading from `types/`.
    pub const METADATA: &str = r#"
source:
  repository: radius-project/resource-types-contrib
  branch: main
  basePath: types/
target:
  directory: target
sync:
  strategy: metadata
  metadataField: defaultRegistration
validation:
  enabled: true
  requiredFields: [namespace, types]
filePatterns: ["**/*.yaml"]
excludePatterns: ["**/test/*"]
"#;

    /// Convention strategy with a file prefix and no validation.
    pub const CONVENTION_PREFIXED: &str = r#"
source:
  repository: radius-project/resource-types-contrib
  branch: main
  basePath: types/
target:
  directory: target
  filePrefix: synced_
sync:
  strategy: convention
filePatterns: ["**/*.yaml"]
"#;

    /// Leaves the repository to `SOURCE_REPO` / `--source-repo`.
    pub const BLANK_REPOSITORY: &str = r#"
source:
  repository: ""
  branch: main
  basePath: types/
target:
  directory: target
sync:
  strategy: convention
filePatterns: ["**/*.yaml"]
"#;

    /// Missing the `target` section.
    pub const MISSING_TARGET: &str = r#"
source: { repository: o/r, branch: main }
sync: { strategy: convention }
filePatterns: ["*.yaml"]
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "source: [unclosed";
}

/// Manifest documents used as source files.
#[allow(dead_code)]
pub mod manifests {
    pub const OPTED_IN: &str = r#"defaultRegistration: true
namespace: Test.Resources
types:
  testType:
    apiVersions:
      "2023-10-01-preview":
        schema: {}
"#;

    pub const NOT_OPTED_IN: &str = r#"namespace: Test.Resources
types:
  testType: {}
"#;

    pub const STRING_FLAG: &str = r#"defaultRegistration: "true"
namespace: Test.Resources
types:
  testType: {}
"#;

    pub const TYPES_NOT_MAPPING: &str = r#"defaultRegistration: true
namespace: Test.Resources
types: [1, 2]
"#;
}

/// A test fixture that provides a temporary directory holding a config file
/// (`sync.yaml`), a source tree (`source/`), and the sync target.
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        let temp_dir = assert_fs::TempDir::new().expect("Failed to create temp directory");
        temp_dir
            .child("source")
            .create_dir_all()
            .expect("Failed to create source directory");
        Self { temp_dir }
    }

    /// Write `sync.yaml` with the given content.
    pub fn with_config(self, content: &str) -> Self {
        self.temp_dir
            .child("sync.yaml")
            .write_str(content)
            .expect("Failed to write config file");
        self
    }

    /// Add a file to the source tree.
    pub fn with_source_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("source")
            .child(path)
            .write_str(content)
            .expect("Failed to write source file");
        self
    }

    /// Add a file to the target tree.
    #[allow(dead_code)]
    pub fn with_target_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("target")
            .child(path)
            .write_str(content)
            .expect("Failed to write target file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the config file.
    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("sync.yaml")
    }

    /// Get the path to the source tree.
    pub fn source_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join("source")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A command running in this fixture's directory with a clean environment.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("resource-type-sync");
        cmd.current_dir(self.path());
        for var in ENV_INPUTS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// `sync` against the local source tree with colors disabled.
    pub fn sync_command(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("--color")
            .arg("never")
            .arg("sync")
            .arg("--config")
            .arg(self.config_path())
            .arg("--source-dir")
            .arg(self.source_path());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

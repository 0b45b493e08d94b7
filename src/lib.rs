//! # Resource Type Sync Library
//!
//! This library mirrors a curated subset of YAML manifests from a source
//! repository into a local directory. It is used by the `resource-type-sync`
//! command-line tool, typically from a scheduled CI job, but every stage can
//! be driven directly.
//!
//! ## Quick Example
//!
//! ```
//! use resource_type_sync::config;
//! use resource_type_sync::filesystem::MemoryStore;
//! use resource_type_sync::pipeline;
//! use resource_type_sync::remote::MemoryRemote;
//!
//! let config = config::parse(r#"
//! source: { repository: owner/types, branch: main }
//! target: { directory: deploy/manifests }
//! sync: { strategy: metadata, metadataField: defaultRegistration }
//! filePatterns: ["**/*.yaml"]
//! "#).unwrap();
//!
//! let remote = MemoryRemote::new()
//!     .with_file("cache/redis.yaml", "defaultRegistration: true\nnamespace: Cache\n")
//!     .with_file("cache/draft.yaml", "namespace: Draft\n");
//! let mut store = MemoryStore::new();
//!
//! let report = pipeline::run(&config, false, &remote, &mut store).unwrap();
//! assert_eq!(report.changes.entries(), &["- cache/redis.yaml".to_string()]);
//! assert!(store.exists("cache/redis.yaml"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Configuration (`config`)**: The sync configuration file plus the
//!   environment-supplied `RunOptions`.
//! - **Remote providers (`remote`)**: Where the source tree comes from: the
//!   GitHub API, a local directory, or memory.
//! - **Filter and gate (`filter`)**: Cheap path checks before any fetch, then
//!   the content-based opt-in decision.
//! - **Validation (`validate`)**: Shallow structural checks on manifests.
//! - **Target tree (`filesystem`, `path`)**: Where synced files land and
//!   under which names.
//! - **Pipeline (`pipeline`)**: Ties the stages together and reports a
//!   decision per file plus the change log.

pub mod config;
pub mod defaults;
pub mod error;
pub mod filesystem;
pub mod filter;
pub mod manifest;
pub mod output;
pub mod path;
pub mod pattern;
pub mod pipeline;
pub mod remote;
pub mod validate;

#[cfg(test)]
mod filter_proptest;

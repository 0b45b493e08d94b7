//! # Error Handling
//!
//! This module defines the centralized error type for `resource-type-sync`.
//! It uses the `thiserror` library to create an `Error` enum covering every
//! failure that aborts a run, with descriptive messages for each.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum representing run-level failures. Each variant
//!   carries enough context (URL, status, path) to produce a useful diagnostic.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Per-file problems (a manifest that fails to fetch, parse, or validate) are
//! not errors in this sense. The pipeline turns them into skip decisions and
//! keeps going; only configuration, tree-listing, and local filesystem
//! failures surface here.

use thiserror::Error;

/// Main error type for resource-type-sync operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// The configuration file could not be parsed or is missing a required
    /// section.
    ///
    /// This error includes the specific parsing issue and optionally a hint
    /// about how to fix it.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// The remote provider answered with a non-success status.
    #[error("Remote fetch error for {url}: HTTP {status} - {message}")]
    RemoteFetch {
        url: String,
        status: u16,
        message: String,
    },

    /// The remote provider could not be reached at all.
    #[error("Network operation error: {url} - {message}")]
    Network { url: String, message: String },

    /// Remote content could not be decoded into text.
    #[error("Failed to decode content of {path}: {message}")]
    Decode { path: String, message: String },

    /// An error occurred while reading or writing the target tree.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An error occurred with a path-related operation.
    #[error("Path operation error: {message}")]
    Path { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// Returns true for errors raised while loading the configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::ConfigNotFound { .. } | Error::ConfigParse { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

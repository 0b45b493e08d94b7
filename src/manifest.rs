//! Parsed view of a manifest's YAML content.
//!
//! Raw content is the source of truth; a `ParsedManifest` is built from it
//! whenever the gate or the validator needs to look inside, and dropped
//! afterwards.

use crate::error::{Error, Result};
use serde_yaml::{Mapping, Value};

/// A path from the remote tree together with its fetched text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCandidate {
    pub path: String,
    pub content: String,
}

/// A manifest document parsed as YAML.
#[derive(Debug, Clone)]
pub struct ParsedManifest {
    doc: Value,
}

impl ParsedManifest {
    /// Parse raw manifest text.
    pub fn parse(content: &str) -> Result<Self> {
        let doc = serde_yaml::from_str(content).map_err(Error::Yaml)?;
        Ok(Self { doc })
    }

    /// The top-level mapping, if the document is one.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        self.doc.as_mapping()
    }

    /// Look up a top-level field.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.as_mapping().and_then(|map| map.get(name))
    }

    /// True only when `name` is present and is the boolean `true`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.field(name), Some(Value::Bool(true)))
    }

    /// Render the document without the top-level field `name`.
    pub fn without_field(&self, name: &str) -> Result<String> {
        let doc = match &self.doc {
            // Rebuilt rather than removed in place to keep field order
            Value::Mapping(map) => Value::Mapping(
                map.iter()
                    .filter(|(key, _)| key.as_str() != Some(name))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
            other => other.clone(),
        };
        serde_yaml::to_string(&doc).map_err(Error::Yaml)
    }
}

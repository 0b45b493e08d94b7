//! Structural validation of manifests.
//!
//! The check is deliberately shallow: the document must be a mapping, carry
//! every required top-level field, and if it has a `types` field that field
//! must itself be a mapping. Nested schemas are not inspected.

use crate::config::ValidationConfig;
use crate::manifest::ParsedManifest;
use thiserror::Error;

/// Field whose value must be a mapping when present.
const TYPES_FIELD: &str = "types";

/// Why a manifest failed validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Invalid {
    #[error("YAML validation error: {0}")]
    Unparsable(String),

    #[error("Manifest must be a YAML mapping")]
    NotAMapping,

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Field 'types' must be a dictionary")]
    TypesNotMapping,
}

/// Checks manifests against the configured rules.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    enabled: bool,
    required_fields: Vec<String>,
}

impl Validator {
    pub fn new(enabled: bool, required_fields: Vec<String>) -> Self {
        Self {
            enabled,
            required_fields,
        }
    }

    pub fn from_config(config: &ValidationConfig) -> Self {
        Self::new(config.enabled, config.required_fields.clone())
    }

    /// Validate raw manifest text. Always passes when validation is disabled.
    pub fn validate(&self, content: &str) -> Result<(), Invalid> {
        if !self.enabled {
            return Ok(());
        }

        let parsed =
            ParsedManifest::parse(content).map_err(|e| Invalid::Unparsable(e.to_string()))?;
        let map = parsed.as_mapping().ok_or(Invalid::NotAMapping)?;

        if let Some(missing) = self
            .required_fields
            .iter()
            .find(|field| !map.contains_key(field.as_str()))
        {
            return Err(Invalid::MissingField(missing.clone()));
        }

        match map.get(TYPES_FIELD) {
            Some(types) if !types.is_mapping() => Err(Invalid::TypesNotMapping),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> Validator {
        Validator::new(true, vec!["namespace".to_string(), "types".to_string()])
    }

    #[test]
    fn test_valid_manifest() {
        let content = "namespace: Test.Resources\ntypes:\n  t: {}\n";
        assert_eq!(validator().validate(content), Ok(()));
    }

    #[test]
    fn test_types_must_be_mapping() {
        let content = "namespace: Test.Resources\ntypes: [1, 2]\n";
        assert_eq!(validator().validate(content), Err(Invalid::TypesNotMapping));
    }

    #[test]
    fn test_missing_required_field() {
        let content = "types: {}\n";
        assert_eq!(
            validator().validate(content),
            Err(Invalid::MissingField("namespace".to_string()))
        );
    }

    #[test]
    fn test_types_checked_even_when_not_required() {
        let v = Validator::new(true, vec!["namespace".to_string()]);
        assert_eq!(
            v.validate("namespace: a\ntypes: scalar\n"),
            Err(Invalid::TypesNotMapping)
        );
        assert_eq!(v.validate("namespace: a\n"), Ok(()));
    }

    #[test]
    fn test_non_mapping_is_invalid() {
        assert_eq!(validator().validate("- namespace\n- types\n"), Err(Invalid::NotAMapping));
        assert_eq!(validator().validate(""), Err(Invalid::NotAMapping));
    }

    #[test]
    fn test_unparsable_is_invalid() {
        let result = validator().validate("namespace: [unclosed");
        assert!(matches!(result, Err(Invalid::Unparsable(_))));
    }

    #[test]
    fn test_disabled_passes_everything() {
        let v = Validator::new(false, vec!["namespace".to_string()]);
        assert_eq!(v.validate("not: [valid"), Ok(()));
        assert_eq!(v.validate("types: [1]"), Ok(()));
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Invalid::MissingField("namespace".to_string()).to_string(),
            "Missing required field: namespace"
        );
        assert_eq!(
            Invalid::TypesNotMapping.to_string(),
            "Field 'types' must be a dictionary"
        );
    }
}

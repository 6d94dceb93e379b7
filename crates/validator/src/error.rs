//! Error types for validation failures and misconfiguration
//!
//! Three layers of failure are kept apart:
//!
//! - [`ValidationErrors`]: the input was checked and rejected; maps
//!   `field -> rule -> message`.
//! - [`SchemaError`]: a rule line could not be compiled (unknown rule,
//!   malformed arguments). Raised when a schema is compiled, never while a
//!   field is being evaluated.
//! - [`Error`]: what a validation call returns: one of the above, or an
//!   infrastructure failure of a database-backed rule.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::database::DatabaseError;

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

/// Failure messages grouped by field, then by rule name.
///
/// Serializes to the JSON shape `{"email": {"unique": "email has already been taken"}}`.
///
/// # Examples
///
/// ```
/// use verity_validator::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("email", "unique", "email has already been taken");
///
/// assert_eq!(errors.get("email", "unique"), Some("email has already been taken"));
/// assert_eq!(errors.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    fields: BTreeMap<String, BTreeMap<String, String>>,
}

impl ValidationErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure of `rule` on `field`.
    pub fn add(
        &mut self,
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.fields
            .entry(field.into())
            .or_default()
            .insert(rule.into(), message.into());
    }

    /// Returns true if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if `field` has at least one failure.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Failures recorded for one field.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&BTreeMap<String, String>> {
        self.fields.get(field)
    }

    /// Message recorded for `rule` on `field`.
    #[must_use]
    pub fn get(&self, field: &str, rule: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|rules| rules.get(rule))
            .map(String::as_str)
    }

    /// First message of a field, in rule-name order.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .and_then(|rules| rules.values().next())
            .map(String::as_str)
    }

    /// Iterates `(field, rule -> message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The whole map.
    #[must_use]
    pub fn all(&self) -> &BTreeMap<String, BTreeMap<String, String>> {
        &self.fields
    }

    /// Consumes the collection and returns the map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, BTreeMap<String, String>> {
        self.fields
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validation failed")
    }
}

impl std::error::Error for ValidationErrors {}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// A schema that cannot be compiled against the rule registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A rule line names a rule that is not registered.
    #[error("field '{field}' uses unknown rule '{rule}'")]
    UnknownRule {
        /// Field carrying the rule line.
        field: String,
        /// The unknown rule name.
        rule: String,
    },

    /// A field has an empty rule line, or a `||` gap.
    #[error("field '{field}' has an empty rule")]
    EmptyRule {
        /// Field carrying the rule line.
        field: String,
    },

    /// Rule arguments are missing, surplus or malformed.
    #[error("rule '{rule}' on field '{field}': {reason}")]
    InvalidArguments {
        /// Field carrying the rule line.
        field: String,
        /// The rule whose arguments were rejected.
        rule: String,
        /// What was wrong.
        reason: String,
    },

    /// A table or column name is not a plain SQL identifier.
    #[error("rule '{rule}' on field '{field}': '{identifier}' is not a valid SQL identifier")]
    InvalidIdentifier {
        /// Field carrying the rule line.
        field: String,
        /// The database rule.
        rule: String,
        /// The rejected name.
        identifier: String,
    },

    /// The same field is declared twice.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// A scene lists a field that has no rules.
    #[error("scene '{scene}' references undeclared field '{field}'")]
    UnknownSceneField {
        /// Scene name.
        scene: String,
        /// The field it references.
        field: String,
    },

    /// Validation was requested for a scene the schema does not declare.
    #[error("unknown scene '{0}'")]
    UnknownScene(String),
}

impl SchemaError {
    pub(crate) fn invalid_arguments(
        field: &str,
        rule: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidArguments {
            field: field.to_owned(),
            rule: rule.to_owned(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// CONFIG ERROR
// ============================================================================

/// An environment override with an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("environment variable {var} has invalid value '{value}' (expected {expected})")]
pub struct ConfigError {
    /// Variable name.
    pub var: &'static str,
    /// The rejected value.
    pub value: String,
    /// Human description of the accepted values.
    pub expected: &'static str,
}

// ============================================================================
// TOP-LEVEL ERROR
// ============================================================================

/// Result of a validation call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// One or more fields failed their rules.
    #[error("{0}")]
    Validation(ValidationErrors),

    /// The schema for the validated type is broken.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The value could not be turned into a field map.
    #[error("value could not be serialized for validation: {0}")]
    Serialize(#[from] serde_json::Error),

    /// A database rule ran without an attached database and the
    /// configuration rejects that.
    #[error("rule '{rule}' on field '{field}' needs a database, but none is attached")]
    DatabaseUnavailable {
        /// Field being validated.
        field: String,
        /// The database rule.
        rule: String,
    },

    /// The count query behind a database rule failed.
    #[error("database rule '{rule}' on field '{field}' failed: {source}")]
    Database {
        /// Field being validated.
        field: String,
        /// The database rule.
        rule: String,
        /// Underlying failure.
        #[source]
        source: DatabaseError,
    },
}

impl Error {
    /// The field error map, if this is a validation failure.
    #[must_use]
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// True for failures of the input rather than of configuration or
    /// infrastructure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_groups_by_field() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "required", "email is required");
        errors.add("email", "unique", "email has already been taken");
        errors.add("name", "alpha_space", "name may only contain letters and spaces");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.field("email").map(BTreeMap::len), Some(2));
        assert_eq!(errors.get("name", "alpha_space"), Some("name may only contain letters and spaces"));
        assert_eq!(errors.get("name", "required"), None);
    }

    #[test]
    fn test_display_is_fixed() {
        let mut errors = ValidationErrors::new();
        errors.add("a", "b", "c");
        assert_eq!(errors.to_string(), "Validation failed");
        assert_eq!(Error::Validation(errors).to_string(), "Validation failed");
    }

    #[test]
    fn test_serializes_as_nested_map() {
        let mut errors = ValidationErrors::new();
        errors.add("slug", "slug", "slug must be a valid URL slug");

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"slug": {"slug": "slug must be a valid URL slug"}})
        );
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.add("a", "b", "c");
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_schema_error_display() {
        let err = SchemaError::UnknownRule {
            field: "email".into(),
            rule: "emial".into(),
        };
        assert_eq!(err.to_string(), "field 'email' uses unknown rule 'emial'");
    }
}

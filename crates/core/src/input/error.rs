//! Field-level validation failures.

use std::fmt;

use serde::Serialize;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required field was absent or `null`.
    Missing,
    /// The value's JSON type does not match the declared field type.
    TypeMismatch,
    /// The key is not declared by the schema.
    Unexpected,
    /// The raw arguments were not a JSON object at all.
    NotAnObject,
    /// The value has the right type but breaks a value-level rule
    /// (range, length, format).
    Constraint,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Missing => "missing",
            Self::TypeMismatch => "type mismatch",
            Self::Unexpected => "unexpected",
            Self::NotAnObject => "not an object",
            Self::Constraint => "constraint",
        };
        f.write_str(label)
    }
}

/// A single offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path to the field, with list indices in brackets
    /// (`address.city`, `tags[2]`). Empty for whole-input failures.
    pub field: String,
    pub kind: ViolationKind,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

/// Script input was rejected. Carries every violation found, not just the
/// first one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid script input: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new(violations: Vec<FieldViolation>) -> Self {
        Self { violations }
    }

    /// Shorthand for an error with a single violation.
    pub fn single(field: impl Into<String>, kind: ViolationKind, message: impl Into<String>) -> Self {
        Self::new(vec![FieldViolation::new(field, kind, message)])
    }

    /// Paths of all offending fields, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    /// Whether `field` is among the offending fields.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_lists_every_violation() {
        let err = ValidationError::new(vec![
            FieldViolation::new("user_id", ViolationKind::Missing, "required field is missing"),
            FieldViolation::new("emial", ViolationKind::Unexpected, "unknown field"),
        ]);
        assert_eq!(
            err.to_string(),
            "Invalid script input: user_id: required field is missing; emial: unknown field"
        );
    }

    #[test]
    fn display_omits_empty_field_path() {
        let err = ValidationError::single("", ViolationKind::NotAnObject, "arguments must be a JSON object");
        assert_eq!(err.to_string(), "Invalid script input: arguments must be a JSON object");
    }

    #[test]
    fn fields_preserve_discovery_order() {
        let err = ValidationError::new(vec![
            FieldViolation::new("b", ViolationKind::Missing, "m"),
            FieldViolation::new("a", ViolationKind::TypeMismatch, "t"),
        ]);
        assert_eq!(err.fields(), vec!["b", "a"]);
        assert!(err.has_field("a"));
        assert!(!err.has_field("c"));
    }
}

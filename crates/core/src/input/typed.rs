//! Validated, immutable script input.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use super::error::{FieldViolation, ValidationError, ViolationKind};

/// Arguments that passed schema validation.
///
/// Only [`build`](super::build) constructs one, so holding a `TypedInput`
/// means every declared type and presence rule already holds.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedInput {
    values: Map<String, Value>,
}

impl TypedInput {
    pub(crate) fn from_checked(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(Value::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.values.get(name).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.values.get(name).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.values.get(name).and_then(Value::as_bool)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Deserialize into a script's own input struct and run its
    /// value-level rules (`#[derive(Validate)]`).
    ///
    /// Rule violations come back as [`ViolationKind::Constraint`], sorted by
    /// field name.
    pub fn parse<T>(&self) -> Result<T, ValidationError>
    where
        T: DeserializeOwned + Validate,
    {
        let parsed: T = serde_json::from_value(Value::Object(self.values.clone())).map_err(|e| {
            ValidationError::single("", ViolationKind::TypeMismatch, e.to_string())
        })?;

        if let Err(errors) = parsed.validate() {
            let mut violations: Vec<FieldViolation> = errors
                .field_errors()
                .into_iter()
                .flat_map(|(field, errs)| {
                    let field = field.to_string();
                    errs.iter().map(move |err| {
                        let message = err
                            .message
                            .as_ref()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| format!("failed '{}' rule", err.code));
                        FieldViolation::new(field.clone(), ViolationKind::Constraint, message)
                    })
                })
                .collect();
            violations.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(ValidationError::new(violations));
        }

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde_json::json;

    use super::*;
    use crate::input::{build, FieldType, InputSchema};

    #[derive(Debug, Deserialize, Validate)]
    struct Retention {
        #[validate(range(min = 1, max = 365, message = "must be between 1 and 365"))]
        days: i64,
        #[validate(length(min = 1))]
        table: String,
    }

    fn schema() -> InputSchema {
        InputSchema::new()
            .required("days", FieldType::Integer)
            .required("table", FieldType::String)
    }

    fn input(value: Value) -> TypedInput {
        match value {
            Value::Object(map) => build(&schema(), &map).unwrap(),
            other => panic!("test input must be an object, got {other}"),
        }
    }

    #[test]
    fn typed_accessors_read_checked_values() {
        let input = input(json!({"days": 30, "table": "audit_log"}));
        assert_eq!(input.get_i64("days"), Some(30));
        assert_eq!(input.get_str("table"), Some("audit_log"));
        assert_eq!(input.get_f64("days"), Some(30.0));
        assert_eq!(input.get_bool("days"), None);
    }

    #[test]
    fn parse_produces_the_script_struct() {
        let parsed: Retention = input(json!({"days": 30, "table": "audit_log"})).parse().unwrap();
        assert_eq!(parsed.days, 30);
        assert_eq!(parsed.table, "audit_log");
    }

    #[test]
    fn parse_reports_rule_violations_per_field() {
        let err = input(json!({"days": 0, "table": ""}))
            .parse::<Retention>()
            .unwrap_err();

        assert_eq!(err.fields(), vec!["days", "table"]);
        assert!(err.violations.iter().all(|v| v.kind == ViolationKind::Constraint));
        assert_eq!(err.violations[0].message, "must be between 1 and 365");
        assert_eq!(err.violations[1].message, "failed 'length' rule");
    }
}

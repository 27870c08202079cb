//! Schema checker: untyped JSON map in, [`TypedInput`] out.

use serde_json::{Map, Value};

use super::error::{FieldViolation, ValidationError, ViolationKind};
use super::schema::{FieldType, InputSchema};
use super::typed::TypedInput;

/// Check `raw` against `schema`.
///
/// Succeeds iff every required field is present with a value of the declared
/// type and no key outside the schema is present. Absent optional fields take
/// their declared default. On failure every offending field is reported.
pub fn build(schema: &InputSchema, raw: &Map<String, Value>) -> Result<TypedInput, ValidationError> {
    let mut violations = Vec::new();
    let values = check_object(schema, raw, "", &mut violations);

    if violations.is_empty() {
        Ok(TypedInput::from_checked(values))
    } else {
        Err(ValidationError::new(violations))
    }
}

/// Like [`build`] but accepts any JSON value, rejecting non-objects.
pub fn build_from_value(schema: &InputSchema, raw: &Value) -> Result<TypedInput, ValidationError> {
    match raw {
        Value::Object(map) => build(schema, map),
        other => Err(ValidationError::single(
            "",
            ViolationKind::NotAnObject,
            format!("arguments must be a JSON object, got {}", json_kind(other)),
        )),
    }
}

fn check_object(
    schema: &InputSchema,
    raw: &Map<String, Value>,
    prefix: &str,
    violations: &mut Vec<FieldViolation>,
) -> Map<String, Value> {
    for key in raw.keys() {
        if schema.field(key).is_none() {
            violations.push(FieldViolation::new(
                join_path(prefix, key),
                ViolationKind::Unexpected,
                "unknown field",
            ));
        }
    }

    let mut checked = Map::new();
    for spec in schema.fields() {
        let path = join_path(prefix, spec.name);
        match raw.get(spec.name) {
            None | Some(Value::Null) => {
                if let Some(default) = &spec.default {
                    checked.insert(spec.name.to_string(), default.clone());
                } else if spec.required {
                    violations.push(FieldViolation::new(
                        path,
                        ViolationKind::Missing,
                        "required field is missing",
                    ));
                }
            }
            Some(value) => {
                if let Some(value) = check_value(&spec.field_type, value, &path, violations) {
                    checked.insert(spec.name.to_string(), value);
                }
            }
        }
    }
    checked
}

/// Returns the checked value, or `None` after recording violations.
fn check_value(
    field_type: &FieldType,
    value: &Value,
    path: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Value> {
    match (field_type, value) {
        (FieldType::String, Value::String(_))
        | (FieldType::Float, Value::Number(_))
        | (FieldType::Boolean, Value::Bool(_)) => Some(value.clone()),
        (FieldType::Integer, Value::Number(n)) if n.is_i64() => Some(value.clone()),
        (FieldType::List(item_type), Value::Array(items)) => {
            let before = violations.len();
            let checked: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    check_value(item_type, item, &format!("{path}[{i}]"), violations)
                })
                .collect();
            (violations.len() == before).then_some(Value::Array(checked))
        }
        (FieldType::Object(nested), Value::Object(map)) => {
            let before = violations.len();
            let checked = check_object(nested, map, path, violations);
            (violations.len() == before).then_some(Value::Object(checked))
        }
        _ => {
            violations.push(FieldViolation::new(
                path,
                ViolationKind::TypeMismatch,
                format!("expected {}, got {}", field_type.name(), json_kind(value)),
            ));
            None
        }
    }
}

fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(n) if n.is_u64() && !n.is_i64() => "integer out of 64-bit signed range",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

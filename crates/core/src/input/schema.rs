//! Declarative input contracts for scripts.

use serde_json::Value;

/// The JSON shape a field must have.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    /// A JSON number without a fractional part that fits in `i64`.
    Integer,
    /// Any JSON number.
    Float,
    Boolean,
    /// A JSON array whose every element has the inner type.
    List(Box<FieldType>),
    /// A nested JSON object checked against its own schema.
    Object(InputSchema),
}

impl FieldType {
    pub fn list_of(item: FieldType) -> Self {
        Self::List(Box::new(item))
    }

    /// Human-readable type name used in violation messages.
    pub fn name(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer => "integer".to_string(),
            Self::Float => "float".to_string(),
            Self::Boolean => "boolean".to_string(),
            Self::List(item) => format!("list of {}", item.name()),
            Self::Object(_) => "object".to_string(),
        }
    }
}

/// One declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    /// Value used when the field is absent or `null`.
    pub default: Option<Value>,
}

/// Ordered set of fields a script accepts.
///
/// Built with the chained constructors:
///
/// ```
/// use adminrun_core::input::{FieldType, InputSchema};
/// use serde_json::json;
///
/// let schema = InputSchema::new()
///     .required("user_id", FieldType::Integer)
///     .optional("email", FieldType::String)
///     .with_default("dry_run", FieldType::Boolean, json!(false));
/// assert_eq!(schema.fields().len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSchema {
    fields: Vec<FieldSpec>,
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field that must be present and non-null.
    pub fn required(self, name: &'static str, field_type: FieldType) -> Self {
        self.push(FieldSpec {
            name,
            field_type,
            required: true,
            default: None,
        })
    }

    /// Declare a field that may be omitted.
    pub fn optional(self, name: &'static str, field_type: FieldType) -> Self {
        self.push(FieldSpec {
            name,
            field_type,
            required: false,
            default: None,
        })
    }

    /// Declare an optional field that takes `default` when omitted.
    pub fn with_default(self, name: &'static str, field_type: FieldType, default: Value) -> Self {
        self.push(FieldSpec {
            name,
            field_type,
            required: false,
            default: Some(default),
        })
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Later declarations of the same name replace earlier ones.
    fn push(mut self, spec: FieldSpec) -> Self {
        self.fields.retain(|f| f.name != spec.name);
        self.fields.push(spec);
        self
    }
}

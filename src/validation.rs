//! Schema validation helpers.
//!
//! Validates a `serde_json::Value` configuration against a [`Schema`] before
//! any API call is made.
//!
//! # Example
//!
//! ```
//! use edgedelta_provider::schema::{Attribute, Schema, ValueValidator};
//! use edgedelta_provider::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("name", Attribute::required_string())
//!     .with_attribute(
//!         "type",
//!         Attribute::required_string()
//!             .with_validator(ValueValidator::one_of(&["pattern-check", "metric-alert"])),
//!     );
//!
//! let diagnostics = validate(&schema, &json!({"name": "errors", "type": "metric-alert"}));
//! assert!(diagnostics.is_empty());
//!
//! let diagnostics = validate(&schema, &json!({"name": "errors", "type": "threshold"}));
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("type".to_string()));
//! ```

use crate::client::is_valid_uuid;
use crate::schema::{Attribute, AttributeType, Diagnostic, Schema, ValueValidator};
use serde_json::Value;

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present and non-null
/// - Optional attributes may be absent or null
/// - Computed-only attributes are skipped (provider sets these)
/// - Attribute types must match the schema
/// - Value validators run on present values of the right type
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return diagnostics,
        _ => {
            diagnostics.push(
                Diagnostic::error("Expected object")
                    .with_detail(format!("Got {}", value_type_name(value))),
            );
            return diagnostics;
        },
    };

    for (name, attr) in &schema.block.attributes {
        validate_attribute(attr, obj.get(name), name, &mut diagnostics);
    }
    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.flags.is_computed_only() {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            if diagnostics.len() == before {
                if let Some(s) = v.as_str() {
                    for validator in &attr.validators {
                        if let Some(diag) = check_value(validator, s, path) {
                            diagnostics.push(diag);
                        }
                    }
                }
            }
        },
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "list", value));
            }
        },
    }
}

/// Run one value validator against a string value.
///
/// Empty strings are treated as unset and always pass.
pub fn check_value(validator: &ValueValidator, value: &str, path: &str) -> Option<Diagnostic> {
    if value.is_empty() {
        return None;
    }
    match validator {
        ValueValidator::OneOf { values } => {
            if values.iter().any(|allowed| allowed == value) {
                None
            } else {
                Some(
                    Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                        .with_detail(format!(
                            "{:?} must be one of the values from [{}], got: {}",
                            path,
                            values.join(", "),
                            value
                        ))
                        .with_attribute(path),
                )
            }
        },
        ValueValidator::Uuid => {
            if is_valid_uuid(value) {
                None
            } else {
                Some(
                    Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                        .with_detail(format!("{:?} must be a valid UUID, got: {}", path, value))
                        .with_attribute(path),
                )
            }
        },
        ValueValidator::JsonText => match serde_json::from_str::<Value>(value) {
            Ok(_) => None,
            Err(err) => Some(
                Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                    .with_detail(format!(
                        "{:?} must be valid JSON, got: {}, error: {}",
                        path, value, err
                    ))
                    .with_attribute(path),
            ),
        },
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!(
            "Expected {}, got {}",
            expected,
            value_type_name(got)
        ))
        .with_attribute(path)
}

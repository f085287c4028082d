//! Structural validation of schema documents.
//!
//! Works on untyped [`serde_json::Value`] documents so that malformed
//! schemas (missing fields, wrong field types, unknown type names) can be
//! reported precisely instead of failing deserialization.
//!
//! # Examples
//!
//! ```
//! use envspec_core::{SchemaError, validate_document};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "$schemaVersion": 1,
//!     "vars": {
//!         "PORT": {"type": "number", "description": "listen port", "example": 3000}
//!     }
//! });
//! assert!(validate_document(&doc).is_empty());
//!
//! let bad = json!({"$schemaVersion": 1, "vars": {"PORT": {"type": "int", "description": ""}}});
//! let errors = validate_document(&bad);
//! assert!(matches!(errors[0], SchemaError::InvalidType { .. }));
//! ```

use serde_json::Value;
use thiserror::Error;

use crate::types::TypeTag;
use crate::validate::example_matches_type;

const GENERAL_FIELDS: [&str; 2] = ["description", "type"];
const ARRAY_FIELDS: [&str; 2] = ["delimiter", "itemType"];

/// Structural problems in a schema document.
///
/// The `Display` impl gives the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// `$schemaVersion` is absent or not a number.
    #[error("$schemaVersion must be a number")]
    SchemaVersionNotNumber,
    /// `vars` is absent or not an object.
    #[error("vars must be an object")]
    VarsNotObject,
    /// A variable definition is not an object.
    #[error("{key}: definition must be an object")]
    NotAnObject { key: String },
    /// General fields are missing.
    #[error("{key}: missing required fields: {}", .fields.join(", "))]
    MissingFields { key: String, fields: Vec<String> },
    /// `type` is not one of the supported names.
    #[error("{key}: invalid type \"{found}\" (allowed: {})", TypeTag::allowed_list())]
    InvalidType { key: String, found: String },
    /// `required` is present but not a boolean.
    #[error("{key}: required must be boolean")]
    RequiredNotBoolean { key: String },
    /// `enum` is present but not an array.
    #[error("{key}: enum must be an array")]
    EnumNotArray { key: String },
    /// `enum` is used on a non-string type.
    #[error("{key}: enum is only allowed for type \"string\"")]
    EnumNotAllowed { key: String },
    /// `example` does not have the declared type's shape.
    #[error("{key}: example does not match type \"{expected}\"")]
    ExampleMismatch { key: String, expected: TypeTag },
    /// Array-specific fields are missing.
    #[error("{key}: missing required array fields: {}", .fields.join(", "))]
    MissingArrayFields { key: String, fields: Vec<String> },
    /// `itemType` is not one of the supported names.
    #[error("{key}: invalid itemType \"{found}\"")]
    InvalidItemType { key: String, found: String },
    /// `delimiter` is present but not a string.
    #[error("{key}: delimiter must be a string")]
    DelimiterNotString { key: String },
    /// An element of an array example does not match `itemType`.
    #[error("{key}: example array contains invalid {item_type} value")]
    ExampleItemMismatch { key: String, item_type: TypeTag },
}

/// Validates a whole schema document.
///
/// Per-variable checks only run when the top-level shape is sound.
pub fn validate_document(doc: &Value) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    if !doc.get("$schemaVersion").is_some_and(Value::is_number) {
        errors.push(SchemaError::SchemaVersionNotNumber);
    }

    let vars = doc.get("vars").and_then(Value::as_object);
    if vars.is_none() {
        errors.push(SchemaError::VarsNotObject);
    }

    if !errors.is_empty() {
        return errors;
    }

    for (key, spec) in vars.into_iter().flatten() {
        errors.extend(validate_entry(key, spec));
    }

    errors
}

/// Validates one variable definition.
///
/// Stops early when a problem makes the remaining checks meaningless: a
/// non-object definition, missing general fields, an unknown type, or an
/// array definition lacking `delimiter`/`itemType` (in which case the
/// example is not inspected at all).
///
/// # Examples
///
/// ```
/// use envspec_core::{SchemaError, validate_entry};
/// use serde_json::json;
///
/// let spec = json!({"type": "array", "description": "hosts", "itemType": "string", "example": 5});
/// assert_eq!(
///     validate_entry("HOSTS", &spec),
///     vec![SchemaError::MissingArrayFields {
///         key: "HOSTS".into(),
///         fields: vec!["delimiter".into()],
///     }]
/// );
/// ```
pub fn validate_entry(key: &str, spec: &Value) -> Vec<SchemaError> {
    let mut errors = Vec::new();
    let key = key.to_string();

    let Some(fields) = spec.as_object() else {
        errors.push(SchemaError::NotAnObject { key });
        return errors;
    };

    let has = |name: &str| {
        fields.contains_key(name) || (name == "description" && fields.contains_key("desc"))
    };
    // null counts as absent for the optional fields
    let present = |name: &str| fields.get(name).filter(|v| !v.is_null());

    let missing: Vec<String> = GENERAL_FIELDS
        .iter()
        .filter(|name| !has(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        errors.push(SchemaError::MissingFields {
            key,
            fields: missing,
        });
        return errors;
    }

    let Some(var_type) = parse_tag(&fields["type"]) else {
        errors.push(SchemaError::InvalidType {
            key,
            found: display_raw(&fields["type"]),
        });
        return errors;
    };

    if present("required").is_some_and(|v| !v.is_boolean()) {
        errors.push(SchemaError::RequiredNotBoolean { key: key.clone() });
    }

    if let Some(enum_values) = present("enum") {
        if !enum_values.is_array() {
            errors.push(SchemaError::EnumNotArray { key: key.clone() });
        } else if var_type != TypeTag::String {
            errors.push(SchemaError::EnumNotAllowed { key: key.clone() });
        }
    }

    if var_type == TypeTag::Array {
        let missing: Vec<String> = ARRAY_FIELDS
            .iter()
            .filter(|name| !fields.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            errors.push(SchemaError::MissingArrayFields {
                key,
                fields: missing,
            });
            return errors;
        }
    }

    if let Some(example) = present("example") {
        if !example_matches_type(example, var_type) {
            errors.push(SchemaError::ExampleMismatch {
                key: key.clone(),
                expected: var_type,
            });
        }
    }

    if var_type == TypeTag::Array {
        errors.extend(validate_array_fields(&key, fields));
    }

    errors
}

fn validate_array_fields(key: &str, fields: &serde_json::Map<String, Value>) -> Vec<SchemaError> {
    let mut errors = Vec::new();

    let item_type = match fields.get("itemType").filter(|v| !v.is_null()) {
        Some(raw) => match parse_tag(raw) {
            Some(tag) => Some(tag),
            None => {
                errors.push(SchemaError::InvalidItemType {
                    key: key.to_string(),
                    found: display_raw(raw),
                });
                None
            }
        },
        None => None,
    };

    if fields
        .get("delimiter")
        .is_some_and(|v| !v.is_null() && !v.is_string())
    {
        errors.push(SchemaError::DelimiterNotString {
            key: key.to_string(),
        });
    }

    if let (Some(items), Some(item_type)) = (
        fields.get("example").and_then(Value::as_array),
        item_type,
    ) {
        // first bad element is enough
        if items.iter().any(|item| !example_matches_type(item, item_type)) {
            errors.push(SchemaError::ExampleItemMismatch {
                key: key.to_string(),
                item_type,
            });
        }
    }

    errors
}

fn parse_tag(raw: &Value) -> Option<TypeTag> {
    raw.as_str().and_then(|s| s.parse().ok())
}

fn display_raw(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

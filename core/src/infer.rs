//! Schema inference from existing `.env` values.
//!
//! [`infer_var_spec`] turns one raw key/value pair into a [`VarSpec`] using
//! the classifier; [`infer_document`] does the same for a whole parsed file
//! and enforces that no value is empty.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::classify::{
    classify, decode_json_array, decode_json_object, infer_item_type, parse_boolean_like,
    parse_number, split_list,
};
use crate::types::{DEFAULT_DELIMITER, EnvMapping, SchemaDocument, TypeTag, VarSpec};

/// Number of elements kept when an array value becomes an example.
pub const EXAMPLE_ITEM_LIMIT: usize = 3;

/// Errors raised while inferring a schema from a whole file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferError {
    /// A variable has no value to infer a type from.
    #[error("invalid value found in .env: {0}")]
    EmptyValue(String),
}

/// Placeholder text for a variable, derived from its key.
///
/// # Examples
///
/// ```
/// use envspec_core::{TypeTag, placeholder};
///
/// assert_eq!(placeholder("API_KEY", None), "your_api_key");
/// assert_eq!(placeholder("PORT", Some(TypeTag::Number)), "your_port of type 'number'");
/// ```
pub fn placeholder(key: &str, var_type: Option<TypeTag>) -> String {
    match var_type {
        Some(tag) => format!("your_{} of type '{tag}'", key.to_lowercase()),
        None => format!("your_{}", key.to_lowercase()),
    }
}

/// Infers a variable contract from a single raw value.
///
/// `required` is taken as given; nothing about the value decides it. The
/// `description` is left empty for the user to fill in, and `enum` is never
/// populated.
///
/// # Examples
///
/// ```
/// use envspec_core::{TypeTag, infer_var_spec};
/// use serde_json::json;
///
/// let spec = infer_var_spec("DEBUG", "true", true);
/// assert_eq!(spec.var_type, TypeTag::Boolean);
/// assert_eq!(spec.example, Some(json!(true)));
/// assert!(spec.required);
///
/// let spec = infer_var_spec("HOSTS", "1,2,3", false);
/// assert_eq!(spec.var_type, TypeTag::Array);
/// assert_eq!(spec.item_type, Some(TypeTag::String));
/// assert_eq!(spec.example, Some(json!(["1", "2", "3"])));
/// ```
pub fn infer_var_spec(key: &str, raw: &str, required: bool) -> VarSpec {
    let tag = classify(raw);
    let mut spec = VarSpec::new(tag);
    spec.required = required;
    spec.description = Some(String::new());

    match tag {
        TypeTag::Boolean => {
            spec.example = parse_boolean_like(raw).map(Value::Bool);
        }
        TypeTag::Number => {
            spec.example = parse_number(raw).map(number_example);
        }
        TypeTag::Array => {
            let (item_type, items) = match decode_json_array(raw) {
                Some(items) => (infer_item_type(&items), items),
                None => {
                    let parts = split_list(raw, DEFAULT_DELIMITER)
                        .into_iter()
                        .map(Value::String)
                        .collect();
                    (TypeTag::String, parts)
                }
            };
            spec.item_type = Some(item_type);
            spec.delimiter = Some(DEFAULT_DELIMITER.to_string());
            spec.example = Some(Value::Array(
                items.into_iter().take(EXAMPLE_ITEM_LIMIT).collect(),
            ));
        }
        TypeTag::Object => {
            spec.example = decode_json_object(raw).map(Value::Object);
        }
        TypeTag::String => {
            spec.example = Some(Value::String(placeholder(key, None)));
        }
    }

    debug!(key, %tag, "inferred variable type");
    spec
}

/// Infers a whole schema document from a parsed `.env` file.
///
/// Variables keep their file order. The first empty (or whitespace-only)
/// value aborts inference.
///
/// # Errors
///
/// Returns [`InferError::EmptyValue`] naming the offending key.
///
/// # Examples
///
/// ```
/// use envspec_core::{EnvMapping, InferError, TypeTag, infer_document};
///
/// let mut env = EnvMapping::new();
/// env.insert("PORT".into(), "3000".into());
/// env.insert("NAME".into(), "api".into());
///
/// let doc = infer_document(&env, false).unwrap();
/// assert_eq!(doc.vars["PORT"].var_type, TypeTag::Number);
/// assert_eq!(doc.vars["NAME"].var_type, TypeTag::String);
///
/// env.insert("EMPTY".into(), "".into());
/// assert_eq!(
///     infer_document(&env, false),
///     Err(InferError::EmptyValue("EMPTY".into()))
/// );
/// ```
pub fn infer_document(env: &EnvMapping, required: bool) -> Result<SchemaDocument, InferError> {
    let mut doc = SchemaDocument::new();
    for (key, raw) in env {
        if raw.trim().is_empty() {
            return Err(InferError::EmptyValue(key.clone()));
        }
        doc.vars
            .insert(key.clone(), infer_var_spec(key, raw, required));
    }
    Ok(doc)
}

/// Integral values become JSON integers so `3000` does not turn into `3000.0`.
fn number_example(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::reconcile::example_text;
    use crate::validate::{example_matches_type, is_valid_type};

    #[test]
    fn test_boolean_example_is_parsed() {
        let spec = infer_var_spec("FLAG", "FALSE", false);
        assert_eq!(spec.var_type, TypeTag::Boolean);
        assert_eq!(spec.example, Some(json!(false)));
        assert!(!spec.required);
    }

    #[test]
    fn test_number_example_keeps_integers_integral() {
        let spec = infer_var_spec("PORT", "3000", true);
        assert_eq!(spec.example, Some(json!(3000)));

        let spec = infer_var_spec("RATIO", "0.25", true);
        assert_eq!(spec.example, Some(json!(0.25)));
    }

    #[test]
    fn test_json_array_example_is_truncated() {
        let spec = infer_var_spec("PORTS", "[1, 2, 3, 4, 5]", false);
        assert_eq!(spec.var_type, TypeTag::Array);
        assert_eq!(spec.item_type, Some(TypeTag::Number));
        assert_eq!(spec.delimiter.as_deref(), Some(","));
        assert_eq!(spec.example, Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_csv_array_items_stay_strings() {
        let spec = infer_var_spec("IDS", "1,2,3", false);
        assert_eq!(spec.item_type, Some(TypeTag::String));
        assert_eq!(spec.example, Some(json!(["1", "2", "3"])));
    }

    #[test]
    fn test_object_example_is_verbatim() {
        let spec = infer_var_spec("DB", r#"{"host":"localhost","port":5432}"#, false);
        assert_eq!(spec.var_type, TypeTag::Object);
        assert_eq!(spec.example, Some(json!({"host": "localhost", "port": 5432})));
    }

    #[test]
    fn test_string_example_is_placeholder() {
        let spec = infer_var_spec("API_KEY", "sk-live-abc", false);
        assert_eq!(spec.var_type, TypeTag::String);
        assert_eq!(spec.example, Some(json!("your_api_key")));
        assert_eq!(spec.enum_values, None);
    }

    #[test]
    fn test_inferred_value_validates_against_inferred_type() {
        for raw in ["true", "42", "[1,2]", r#"{"a":1}"#, "a,b", "plain text", "0123"] {
            let spec = infer_var_spec("KEY", raw, false);
            assert!(is_valid_type(raw, spec.var_type), "raw value {raw:?}");
            let example = spec.example.as_ref().unwrap();
            assert!(example_matches_type(example, spec.var_type), "raw value {raw:?}");
        }
    }

    #[test]
    fn test_uppercase_boolean_infers_boolean_but_validates_strictly() {
        let spec = infer_var_spec("FLAG", "TRUE", false);
        assert_eq!(spec.var_type, TypeTag::Boolean);
        assert_eq!(spec.example, Some(json!(true)));

        // the schema example is canonical even though the source value is not
        assert!(!is_valid_type("TRUE", TypeTag::Boolean));
        assert!(is_valid_type(&example_text(&spec), TypeTag::Boolean));
    }

    #[test]
    fn test_infer_document_rejects_whitespace_value() {
        let mut env = EnvMapping::new();
        env.insert("OK".into(), "1".into());
        env.insert("BLANK".into(), "   ".into());
        assert_eq!(
            infer_document(&env, false),
            Err(InferError::EmptyValue("BLANK".into()))
        );
    }
}

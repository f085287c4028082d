//! Validation of raw `.env` values against declared types.
//!
//! These checks are deliberately stricter than classification: booleans
//! must be lowercase `true`/`false`, and numbers only need to be finite
//! (identifier-looking values such as `0123` are still valid numbers when a
//! schema says so).
//!
//! # Examples
//!
//! ```
//! use envspec_core::{TypeTag, is_enum_valid, is_valid_type};
//!
//! assert!(is_valid_type("0123", TypeTag::Number));
//! assert!(!is_valid_type("TRUE", TypeTag::Boolean));
//! assert!(is_valid_type("a,b", TypeTag::Array));
//! assert!(!is_valid_type("[1,", TypeTag::Array));
//!
//! let allowed = vec!["debug".to_string(), "info".to_string()];
//! assert!(is_enum_valid("info", Some(&allowed[..])));
//! assert!(!is_enum_valid("trace", Some(&allowed[..])));
//! assert!(is_enum_valid("trace", None));
//! ```

use serde_json::Value;

use crate::classify::{
    decode_json_array, decode_json_object, is_delimited_list, looks_like_json_array,
    parse_number, split_list,
};
use crate::types::{DEFAULT_DELIMITER, TypeTag, VarSpec};

/// Whether a raw value conforms to a type, using the default `,` delimiter.
pub fn is_valid_type(raw: &str, tag: TypeTag) -> bool {
    is_valid_with_delimiter(raw, tag, DEFAULT_DELIMITER)
}

/// Whether a raw value conforms to a variable contract's declared type.
///
/// Arrays in joined form are split on the contract's own delimiter.
pub fn is_valid_for_spec(raw: &str, spec: &VarSpec) -> bool {
    is_valid_with_delimiter(raw, spec.var_type, spec.delimiter_or_default())
}

fn is_valid_with_delimiter(raw: &str, tag: TypeTag, delimiter: &str) -> bool {
    let trimmed = raw.trim();
    match tag {
        TypeTag::Number => parse_number(trimmed).is_some(),
        TypeTag::Boolean => trimmed == "true" || trimmed == "false",
        TypeTag::Array => {
            if looks_like_json_array(trimmed) {
                decode_json_array(trimmed).is_some()
            } else {
                is_delimited_list(trimmed, delimiter)
            }
        }
        TypeTag::Object => decode_json_object(trimmed).is_some(),
        TypeTag::String => true,
    }
}

/// Whether a single decoded array element conforms to an item type.
pub fn is_valid_item_type(item: &str, item_type: TypeTag) -> bool {
    is_valid_type(item, item_type)
}

/// Decodes the elements of an array value as text.
///
/// JSON arrays yield each element's text (strings unquoted, everything
/// else as compact JSON), with `null` elements as `None` since they carry
/// no value of any type. Joined values are split on `delimiter`. Returns
/// `None` when a bracket-shaped value is not a valid JSON array.
///
/// # Examples
///
/// ```
/// use envspec_core::array_items;
///
/// assert_eq!(
///     array_items(r#"["a", 1, true, null]"#, ","),
///     Some(vec![Some("a".into()), Some("1".into()), Some("true".into()), None])
/// );
/// assert_eq!(array_items("x|y", "|"), Some(vec![Some("x".into()), Some("y".into())]));
/// assert_eq!(array_items("[oops", ","), None);
/// ```
pub fn array_items(raw: &str, delimiter: &str) -> Option<Vec<Option<String>>> {
    if looks_like_json_array(raw) {
        let items = decode_json_array(raw)?;
        Some(items.iter().map(element_text).collect())
    } else {
        Some(split_list(raw, delimiter).into_iter().map(Some).collect())
    }
}

fn element_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Whether a value is one of the allowed enum members.
///
/// With no enum declared every value is allowed.
pub fn is_enum_valid(raw: &str, enum_values: Option<&[String]>) -> bool {
    match enum_values {
        Some(allowed) => allowed.iter().any(|member| member == raw),
        None => true,
    }
}

/// Whether a typed JSON value has the runtime shape a type requires.
///
/// Used for schema examples and for elements of array examples.
///
/// # Examples
///
/// ```
/// use envspec_core::{TypeTag, example_matches_type};
/// use serde_json::json;
///
/// assert!(example_matches_type(&json!(3000), TypeTag::Number));
/// assert!(!example_matches_type(&json!("3000"), TypeTag::Number));
/// assert!(example_matches_type(&json!({"a": 1}), TypeTag::Object));
/// assert!(!example_matches_type(&json!([1]), TypeTag::Object));
/// ```
pub fn example_matches_type(example: &Value, tag: TypeTag) -> bool {
    match tag {
        TypeTag::String => example.is_string(),
        TypeTag::Number => example.as_f64().is_some_and(f64::is_finite),
        TypeTag::Boolean => example.is_boolean(),
        TypeTag::Array => example.is_array(),
        TypeTag::Object => example.is_object(),
    }
}

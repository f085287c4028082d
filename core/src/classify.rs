//! Shape-based type classification of raw `.env` values.
//!
//! Raw values routinely satisfy several shapes at once (`"1"` is a number
//! and a one-element list candidate, `"[1,2]"` is JSON and comma-joined),
//! so classification is an ordered chain of predicates where the first
//! match wins:
//!
//! 1. boolean (`true`/`false`, any case)
//! 2. safe number
//! 3. JSON array, then JSON object
//! 4. comma-joined list
//! 5. string
//!
//! # Examples
//!
//! ```
//! use envspec_core::{TypeTag, classify};
//!
//! assert_eq!(classify("TRUE"), TypeTag::Boolean);
//! assert_eq!(classify("8080"), TypeTag::Number);
//! assert_eq!(classify("00123"), TypeTag::String);
//! assert_eq!(classify("[1, 2]"), TypeTag::Array);
//! assert_eq!(classify(r#"{"a":1}"#), TypeTag::Object);
//! assert_eq!(classify("a,b,c"), TypeTag::Array);
//! assert_eq!(classify("Hello, world"), TypeTag::String);
//! ```

use serde_json::{Map, Value};

use crate::types::{DEFAULT_DELIMITER, TypeTag};

/// Numeric strings longer than this are treated as identifiers.
pub const MAX_NUMBER_LEN: usize = 9;

type Rule = (TypeTag, fn(&str) -> bool);

const RULES: [Rule; 5] = [
    (TypeTag::Boolean, is_boolean_like),
    (TypeTag::Number, is_safe_number),
    (TypeTag::Array, is_json_array),
    (TypeTag::Object, is_json_object),
    (TypeTag::Array, is_csv_list),
];

/// Decides the most specific type for a raw value.
///
/// Total: anything that matches no rule is a [`TypeTag::String`].
pub fn classify(raw: &str) -> TypeTag {
    RULES
        .iter()
        .find(|(_, matches)| matches(raw))
        .map(|(tag, _)| *tag)
        .unwrap_or(TypeTag::String)
}

/// Case-insensitive `true`/`false`, ignoring surrounding whitespace.
pub fn is_boolean_like(raw: &str) -> bool {
    parse_boolean_like(raw).is_some()
}

/// Parses a case-insensitive boolean.
pub fn parse_boolean_like(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Some(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parses a finite number, ignoring surrounding whitespace.
///
/// Empty input and non-finite spellings (`inf`, `NaN`) yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whether a value should be read as a number rather than an identifier.
///
/// Rejects a leading zero followed by another digit (`0123`) and anything
/// longer than [`MAX_NUMBER_LEN`] characters, then requires a finite parse.
///
/// # Examples
///
/// ```
/// use envspec_core::is_safe_number;
///
/// assert!(is_safe_number("0"));
/// assert!(is_safe_number("3.14"));
/// assert!(!is_safe_number("0123"));
/// assert!(!is_safe_number("1234567890"));
/// ```
pub fn is_safe_number(raw: &str) -> bool {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    if chars.next() == Some('0') && chars.next().is_some_and(|c| c.is_ascii_digit()) {
        return false;
    }
    if trimmed.chars().count() > MAX_NUMBER_LEN {
        return false;
    }
    parse_number(trimmed).is_some()
}

fn bracketed(raw: &str, open: char, close: char) -> Option<&str> {
    let trimmed = raw.trim();
    (trimmed.starts_with(open) && trimmed.ends_with(close)).then_some(trimmed)
}

/// Decodes a bracket-shaped value as a JSON array.
///
/// Returns `None` for values that are not bracket-shaped or not valid JSON.
pub fn decode_json_array(raw: &str) -> Option<Vec<Value>> {
    let trimmed = bracketed(raw, '[', ']')?;
    match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Array(items) => Some(items),
        _ => None,
    }
}

/// Decodes a brace-shaped value as a JSON object.
pub fn decode_json_object(raw: &str) -> Option<Map<String, Value>> {
    let trimmed = bracketed(raw, '{', '}')?;
    match serde_json::from_str::<Value>(trimmed).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Whether the value is bracket-shaped, regardless of JSON validity.
pub fn looks_like_json_array(raw: &str) -> bool {
    bracketed(raw, '[', ']').is_some()
}

fn is_json_array(raw: &str) -> bool {
    decode_json_array(raw).is_some()
}

fn is_json_object(raw: &str) -> bool {
    decode_json_object(raw).is_some()
}

fn is_csv_list(raw: &str) -> bool {
    // bracket-shaped values are JSON or nothing
    !looks_like_json_array(raw) && is_delimited_list(raw, DEFAULT_DELIMITER)
}

/// Whether a value is a delimiter-joined list.
///
/// The value must contain the delimiter, must not contain whitespace
/// outside the delimiter itself, and must split into more than one
/// non-empty part.
///
/// # Examples
///
/// ```
/// use envspec_core::is_delimited_list;
///
/// assert!(is_delimited_list("a,b", ","));
/// assert!(is_delimited_list("a; b", "; "));
/// assert!(!is_delimited_list("a, b", ","));
/// assert!(!is_delimited_list("a,", ","));
/// ```
pub fn is_delimited_list(raw: &str, delimiter: &str) -> bool {
    let trimmed = raw.trim();
    if delimiter.is_empty() || !trimmed.contains(delimiter) {
        return false;
    }
    if trimmed
        .split(delimiter)
        .any(|part| part.chars().any(char::is_whitespace))
    {
        return false;
    }
    split_list(trimmed, delimiter).len() > 1
}

/// Splits a joined list into its trimmed, non-empty parts.
pub fn split_list(raw: &str, delimiter: &str) -> Vec<String> {
    raw.trim()
        .split(delimiter)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Infers the element type of a decoded JSON array.
///
/// All booleans gives [`TypeTag::Boolean`], all numbers gives
/// [`TypeTag::Number`], anything else (mixed content, strings, nested
/// values, or no elements) gives [`TypeTag::String`].
pub fn infer_item_type(items: &[Value]) -> TypeTag {
    if items.is_empty() {
        TypeTag::String
    } else if items.iter().all(Value::is_boolean) {
        TypeTag::Boolean
    } else if items.iter().all(Value::is_number) {
        TypeTag::Number
    } else {
        TypeTag::String
    }
}

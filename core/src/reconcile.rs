//! Reconciliation of a schema with an existing `.env` file.
//!
//! [`reconcile`] walks the schema in declaration order. Values already in
//! the environment are copied through untouched; missing ones are filled
//! with either a placeholder or the schema's example. Nothing is written
//! anywhere: the caller decides what to do with the result.
//!
//! # Example
//!
//! ```
//! use envspec_core::*;
//!
//! let mut vars = IndexMap::new();
//! vars.insert("PORT".to_string(), VarSpec::new(TypeTag::Number).required().with_example(3000));
//!
//! let run = reconcile(&vars, None, false);
//! assert_eq!(run.result["PORT"], "<your_port of type 'number'>");
//! assert_eq!(run.changes.added, vec!["PORT"]);
//!
//! let run = reconcile(&vars, None, true);
//! assert_eq!(run.result["PORT"], "3000");
//! ```

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::infer::placeholder;
use crate::types::{EnvMapping, TypeTag, VarSpec};
use crate::validate::is_valid_for_spec;

/// What a reconciliation run did, key by key.
///
/// `invalid` is a subset of `preserved`: it names preserved values that do
/// not validate against their declared type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    /// Keys whose existing value was kept.
    pub preserved: Vec<String>,
    /// Keys that received a synthesized value.
    pub added: Vec<String>,
    /// Preserved keys whose value fails type validation.
    pub invalid: Vec<String>,
}

impl ChangeReport {
    /// Whether the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.added.is_empty()
    }
}

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// One entry per schema variable, in schema order.
    pub result: EnvMapping,
    /// Per-key account of the run.
    pub changes: ChangeReport,
}

/// Merges a schema with an optional existing environment.
///
/// Every schema key appears exactly once in the result and no other key is
/// introduced. Existing values are preserved byte for byte even when they
/// fail validation; such keys are additionally listed as invalid.
pub fn reconcile(
    vars: &IndexMap<String, VarSpec>,
    existing: Option<&EnvMapping>,
    use_example: bool,
) -> Reconciliation {
    let mut result = EnvMapping::with_capacity(vars.len());
    let mut changes = ChangeReport::default();

    for (key, spec) in vars {
        match existing.and_then(|env| env.get(key)) {
            Some(value) => {
                result.insert(key.clone(), value.clone());
                changes.preserved.push(key.clone());
                if !is_valid_for_spec(value, spec) {
                    debug!(key = %key, expected = %spec.var_type, "preserved value has wrong type");
                    changes.invalid.push(key.clone());
                }
            }
            None => {
                let value = if use_example {
                    example_text(spec)
                } else {
                    format!("<{}>", placeholder(key, Some(spec.var_type)))
                };
                result.insert(key.clone(), value);
                changes.added.push(key.clone());
            }
        }
    }

    Reconciliation { result, changes }
}

/// Renders a spec's example as `.env` text.
///
/// Objects become compact JSON, arrays a JSON array (`[]` when the example
/// is missing or not an array), and everything else its plain text (empty
/// when there is no example).
///
/// # Examples
///
/// ```
/// use envspec_core::{TypeTag, VarSpec, example_text};
/// use serde_json::json;
///
/// let spec = VarSpec::new(TypeTag::Array).with_example(json!(["a", "b"]));
/// assert_eq!(example_text(&spec), r#"["a","b"]"#);
///
/// let spec = VarSpec::new(TypeTag::String).with_example("hello");
/// assert_eq!(example_text(&spec), "hello");
///
/// assert_eq!(example_text(&VarSpec::new(TypeTag::Boolean)), "");
/// ```
pub fn example_text(spec: &VarSpec) -> String {
    match (spec.var_type, spec.example.as_ref()) {
        (TypeTag::Array, Some(items @ Value::Array(_))) => items.to_string(),
        (TypeTag::Array, _) => "[]".to_string(),
        (_, None | Some(Value::Null)) => String::new(),
        (_, Some(Value::String(text))) => text.clone(),
        (_, Some(other)) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn schema() -> IndexMap<String, VarSpec> {
        let mut vars = IndexMap::new();
        vars.insert(
            "PORT".to_string(),
            VarSpec::new(TypeTag::Number).required().with_example(3000),
        );
        vars.insert(
            "DEBUG".to_string(),
            VarSpec::new(TypeTag::Boolean).with_example(false),
        );
        vars.insert(
            "HOSTS".to_string(),
            VarSpec::new(TypeTag::Array)
                .with_items(TypeTag::String, ",")
                .with_example(json!(["a", "b"])),
        );
        vars.insert(
            "DB".to_string(),
            VarSpec::new(TypeTag::Object).with_example(json!({"host": "localhost"})),
        );
        vars
    }

    fn env(pairs: &[(&str, &str)]) -> EnvMapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_reconcile_without_env_adds_placeholders() {
        let mut vars = IndexMap::new();
        vars.insert(
            "PORT".to_string(),
            VarSpec::new(TypeTag::Number).required().with_example(3000),
        );

        let run = reconcile(&vars, None, false);
        assert_eq!(run.result, env(&[("PORT", "<your_port of type 'number'>")]));
        assert_eq!(
            run.changes,
            ChangeReport {
                preserved: vec![],
                added: vec!["PORT".into()],
                invalid: vec![],
            }
        );
    }

    #[test]
    fn test_reconcile_preserves_invalid_values() {
        let existing = env(&[("PORT", "abc")]);
        let run = reconcile(&schema(), Some(&existing), false);

        assert_eq!(run.result["PORT"], "abc");
        assert_eq!(run.changes.preserved, vec!["PORT"]);
        assert_eq!(run.changes.invalid, vec!["PORT"]);
        assert_eq!(run.changes.added, vec!["DEBUG", "HOSTS", "DB"]);
    }

    #[test]
    fn test_reconcile_uses_typed_examples() {
        let run = reconcile(&schema(), None, true);
        assert_eq!(
            run.result,
            env(&[
                ("PORT", "3000"),
                ("DEBUG", "false"),
                ("HOSTS", r#"["a","b"]"#),
                ("DB", r#"{"host":"localhost"}"#),
            ])
        );
    }

    #[test]
    fn test_reconcile_drops_unknown_keys_and_keeps_schema_order() {
        let existing = env(&[("EXTRA", "1"), ("DB", r#"{"x": 1}"#), ("PORT", " 80 ")]);
        let run = reconcile(&schema(), Some(&existing), false);

        let keys: Vec<_> = run.result.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["PORT", "DEBUG", "HOSTS", "DB"]);
        assert_eq!(run.result["PORT"], " 80 ");
        assert_eq!(run.result["DB"], r#"{"x": 1}"#);
        assert!(run.changes.invalid.is_empty());
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        for use_example in [false, true] {
            let first = reconcile(&schema(), None, use_example);
            let second = reconcile(&schema(), Some(&first.result), use_example);
            assert!(second.changes.added.is_empty());
            assert!(second.changes.is_noop());
            assert_eq!(second.result, first.result);
        }
    }

    #[test]
    fn test_example_text_for_malformed_array_example() {
        let spec = VarSpec::new(TypeTag::Array).with_example("a,b");
        assert_eq!(example_text(&spec), "[]");
    }
}

//! Checking a parsed `.env` file against a schema.
//!
//! Produces an [`EnvReport`] of errors and warnings rather than failing on
//! the first problem. Whether errors are fatal is up to the caller.
//!
//! # Example
//!
//! ```
//! use envspec_core::*;
//!
//! let mut vars = IndexMap::new();
//! vars.insert("PORT".to_string(), VarSpec::new(TypeTag::Number).required());
//! vars.insert("LOG".to_string(), VarSpec::new(TypeTag::String).with_enum(["info", "debug"]));
//!
//! let mut env = EnvMapping::new();
//! env.insert("PORT".into(), "http".into());
//! env.insert("STRAY".into(), "1".into());
//!
//! let report = check_env(&vars, &env);
//! assert_eq!(
//!     report.errors,
//!     vec![EnvIssue::TypeMismatch {
//!         key: "PORT".into(),
//!         expected: TypeTag::Number,
//!         actual: TypeTag::String,
//!     }]
//! );
//! assert_eq!(report.warnings.len(), 2);
//! assert!(report.has_errors());
//! ```

use indexmap::IndexMap;
use thiserror::Error;

use crate::classify::classify;
use crate::types::{EnvMapping, TypeTag, VarSpec};
use crate::validate::{array_items, is_enum_valid, is_valid_for_spec, is_valid_item_type};

/// One finding from [`check_env`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvIssue {
    /// A required variable is absent or empty.
    #[error("Missing required variable: {key}")]
    MissingRequired { key: String },
    /// An optional variable is absent or empty.
    #[error("Missing optional variable: {key}")]
    MissingOptional { key: String },
    /// The value does not validate against the declared type.
    #[error("Invalid type for key: {key} (expected \"{expected}\", got \"{actual}\")")]
    TypeMismatch {
        key: String,
        expected: TypeTag,
        actual: TypeTag,
    },
    /// A bracket-shaped array value is not valid JSON.
    #[error("Invalid JSON array format for {key}")]
    InvalidArrayFormat { key: String },
    /// An array element does not validate against `itemType`.
    #[error("Invalid item type in {key}[{index}] (expected \"{expected}\", got \"{actual}\")")]
    InvalidItem {
        key: String,
        index: usize,
        expected: TypeTag,
        actual: TypeTag,
    },
    /// A JSON array element is `null`, which fits no item type.
    #[error("Invalid item type in {key}[{index}] (expected \"{expected}\", got \"null\")")]
    NullItem {
        key: String,
        index: usize,
        expected: TypeTag,
    },
    /// The value is not one of the enum members.
    #[error("Invalid value for {key} (must be one of: {})", .allowed.join(", "))]
    NotInEnum { key: String, allowed: Vec<String> },
    /// The file has a variable the schema does not declare.
    #[error("Unknown variable in .env: {key} of type \"{actual}\"")]
    UnknownKey { key: String, actual: TypeTag },
}

/// Result of [`check_env`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvReport {
    /// Problems that make the file non-conforming.
    pub errors: Vec<EnvIssue>,
    /// Advisory findings.
    pub warnings: Vec<EnvIssue>,
}

impl EnvReport {
    /// Whether any error was found.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether the file is clean (no errors and no warnings).
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Checks every schema variable against the environment, then flags
/// environment variables the schema does not know about.
pub fn check_env(vars: &IndexMap<String, VarSpec>, env: &EnvMapping) -> EnvReport {
    let mut report = EnvReport::default();

    for (key, spec) in vars {
        let value = env.get(key).map(String::as_str).unwrap_or_default();
        if value.is_empty() {
            let key = key.clone();
            if spec.required {
                report.errors.push(EnvIssue::MissingRequired { key });
            } else {
                report.warnings.push(EnvIssue::MissingOptional { key });
            }
            continue;
        }

        let errors = check_value(key, value, spec);
        report.errors.extend(errors);
    }

    for (key, value) in env {
        if !vars.contains_key(key) {
            report.warnings.push(EnvIssue::UnknownKey {
                key: key.clone(),
                actual: classify(value),
            });
        }
    }

    report
}

fn check_value(key: &str, value: &str, spec: &VarSpec) -> Vec<EnvIssue> {
    if !is_valid_for_spec(value, spec) {
        return vec![EnvIssue::TypeMismatch {
            key: key.to_string(),
            expected: spec.var_type,
            actual: classify(value),
        }];
    }

    if spec.var_type == TypeTag::Array {
        if let Some(item_type) = spec.item_type {
            let item_errors = check_items(key, value, item_type, spec.delimiter_or_default());
            if !item_errors.is_empty() {
                return item_errors;
            }
        }
    }

    if !is_enum_valid(value, spec.enum_values.as_deref()) {
        return vec![EnvIssue::NotInEnum {
            key: key.to_string(),
            allowed: spec.enum_values.clone().unwrap_or_default(),
        }];
    }

    Vec::new()
}

fn check_items(key: &str, value: &str, item_type: TypeTag, delimiter: &str) -> Vec<EnvIssue> {
    let Some(items) = array_items(value, delimiter) else {
        return vec![EnvIssue::InvalidArrayFormat {
            key: key.to_string(),
        }];
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match item {
            None => Some(EnvIssue::NullItem {
                key: key.to_string(),
                index,
                expected: item_type,
            }),
            Some(text) if !is_valid_item_type(text, item_type) => Some(EnvIssue::InvalidItem {
                key: key.to_string(),
                index,
                expected: item_type,
                actual: classify(text),
            }),
            Some(_) => None,
        })
        .collect()
}

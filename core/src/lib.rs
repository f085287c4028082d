//! Core engine for schema-driven `.env` files.
//!
//! This crate holds every decision `envspec` makes about environment
//! variables, with no file-system access:
//!
//! - [`classify`] — decides the most specific [`TypeTag`] for a raw value.
//! - [`infer_var_spec`] / [`infer_document`] — build a [`SchemaDocument`]
//!   from an existing `.env` file.
//! - [`is_valid_type`], [`is_enum_valid`] — check a raw value against a
//!   declared type or enum.
//! - [`validate_document`] / [`validate_entry`] — catch structural
//!   problems in a schema file before it is used.
//! - [`reconcile`] — merge a schema with an existing `.env`, preserving
//!   what exists and filling in what is missing.
//! - [`check_env`] — report every way a `.env` file disagrees with a schema.
//!
//! Values in a `.env` file are always text ([`EnvMapping`]); they only
//! acquire a type when something validates them.
//!
//! # Example
//!
//! ```
//! use envspec_core::*;
//!
//! let mut env = EnvMapping::new();
//! env.insert("PORT".into(), "8080".into());
//! env.insert("FEATURES".into(), "search,billing".into());
//!
//! let schema = infer_document(&env, true).unwrap();
//! assert_eq!(schema.vars["PORT"].var_type, TypeTag::Number);
//! assert_eq!(schema.vars["FEATURES"].var_type, TypeTag::Array);
//!
//! let json = serde_json::to_value(&schema).unwrap();
//! assert!(validate_document(&json).is_empty());
//!
//! let run = reconcile(&schema.vars, Some(&env), false);
//! assert_eq!(run.result, env);
//! assert!(run.changes.added.is_empty());
//! ```

mod check;
mod classify;
mod infer;
mod reconcile;
mod structure;
mod types;
mod validate;

pub use check::{EnvIssue, EnvReport, check_env};
pub use classify::{
    MAX_NUMBER_LEN, classify, decode_json_array, decode_json_object, infer_item_type,
    is_boolean_like, is_delimited_list, is_safe_number, parse_number, split_list,
};
pub use indexmap::IndexMap;
pub use infer::{EXAMPLE_ITEM_LIMIT, InferError, infer_document, infer_var_spec, placeholder};
pub use reconcile::{ChangeReport, Reconciliation, example_text, reconcile};
pub use structure::{SchemaError, validate_document, validate_entry};
pub use types::*;
pub use validate::{
    array_items, example_matches_type, is_enum_valid, is_valid_for_spec, is_valid_item_type,
    is_valid_type,
};

//! Loading and saving `envspec.json`.
//!
//! Two read paths exist on purpose: [`load_schema_value`] returns the raw
//! JSON for structural validation, while [`load_schema`] returns a typed
//! [`SchemaDocument`] once the top-level shape is known to be sound.

use std::path::Path;

use envspec_core::SchemaDocument;
use serde_json::Value;
use tracing::debug;

use crate::error::{FilesError, Result};

/// Default schema file name, relative to the project directory.
pub const SCHEMA_FILE: &str = "envspec.json";

/// Reads the schema file as untyped JSON.
///
/// # Errors
///
/// Returns [`FilesError::NotFound`] if the file is missing,
/// [`FilesError::IoError`] if it cannot be read, or
/// [`FilesError::JsonError`] if it is not valid JSON.
pub fn load_schema_value(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FilesError::NotFound(path.to_path_buf()));
    }
    let raw = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), "loaded schema file");
    Ok(value)
}

/// Reads the schema file as a typed document.
///
/// Only the top-level shape is checked here (`vars` must be an object);
/// run [`envspec_core::validate_document`] on [`load_schema_value`] output
/// for a full structural report.
///
/// # Errors
///
/// Everything [`load_schema_value`] returns, plus
/// [`FilesError::InvalidSchema`] when `vars` is missing or not an object
/// and [`FilesError::JsonError`] when an entry does not fit the typed model.
pub fn load_schema(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    let value = load_schema_value(path)?;
    if !value.get("vars").is_some_and(Value::is_object) {
        return Err(FilesError::InvalidSchema(
            "vars must be an object".to_string(),
        ));
    }
    Ok(serde_json::from_value(value)?)
}

/// Writes a schema document as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`FilesError::IoError`] if the file cannot be written.
pub fn save_schema(path: impl AsRef<Path>, doc: &SchemaDocument) -> Result<()> {
    let mut raw = serde_json::to_string_pretty(doc)?;
    raw.push('\n');
    std::fs::write(path.as_ref(), raw)?;
    Ok(())
}

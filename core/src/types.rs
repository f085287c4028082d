//! Schema type definitions for environment variable contracts.
//!
//! This module defines the data model shared by every other part of the
//! crate. The types serialize with [`serde`] using the field names of the
//! `envspec.json` file, so a [`SchemaDocument`] round-trips through disk
//! without a separate wire model.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version stamp written into new schema documents.
pub const SCHEMA_VERSION: u32 = 1;

/// Delimiter used for comma-joined arrays when a spec does not name one.
pub const DEFAULT_DELIMITER: &str = ",";

/// Parsed contents of a `.env` file, in file order.
///
/// Every value is text exactly as stored on disk. Numbers, booleans,
/// arrays and objects stay strings until something validates them.
pub type EnvMapping = IndexMap<String, String>;

/// Semantic type of an environment variable.
///
/// A closed set: arrays may name one of these as their item type, but
/// there is no deeper nesting.
///
/// # Examples
///
/// ```
/// use envspec_core::TypeTag;
///
/// let tag: TypeTag = "number".parse().unwrap();
/// assert_eq!(tag, TypeTag::Number);
/// assert_eq!(tag.to_string(), "number");
/// assert!("float".parse::<TypeTag>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    /// Free-form text (the fallback type).
    #[default]
    String,
    /// Finite numeric value.
    Number,
    /// `true` or `false`.
    Boolean,
    /// JSON array or delimiter-joined list.
    Array,
    /// JSON object.
    Object,
}

impl TypeTag {
    /// All tags, in the order they are listed in messages.
    pub const ALL: [TypeTag; 5] = [
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Boolean,
        TypeTag::Array,
        TypeTag::Object,
    ];

    /// Returns the lowercase name used in schema files.
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Boolean => "boolean",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
        }
    }

    /// Comma-separated list of every tag name.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown type name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown type \"{0}\"")]
pub struct UnknownTypeTag(pub String);

impl FromStr for TypeTag {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TypeTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTypeTag(s.to_string()))
    }
}

/// Contract for a single environment variable.
///
/// `enum_values` is only meaningful for [`TypeTag::String`], and
/// `item_type`/`delimiter` only for [`TypeTag::Array`]. The structural
/// validator reports them on any other type.
///
/// # Examples
///
/// ```
/// use envspec_core::{TypeTag, VarSpec};
///
/// let spec = VarSpec::new(TypeTag::Number)
///     .required()
///     .with_example(3000)
///     .with_description("HTTP listen port");
/// assert!(spec.required);
/// assert_eq!(spec.example, Some(serde_json::json!(3000)));
///
/// let json = serde_json::to_value(&spec).unwrap();
/// assert_eq!(json["type"], "number");
/// assert!(json.get("itemType").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarSpec {
    /// Declared semantic type.
    #[serde(rename = "type")]
    pub var_type: TypeTag,
    /// Whether the variable must be present and non-empty.
    #[serde(default)]
    pub required: bool,
    /// Typed example value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    /// Human description.
    #[serde(default, alias = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Allowed values (string variables only).
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Type of each element (array variables only).
    #[serde(rename = "itemType", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<TypeTag>,
    /// Separator for the comma-joined array form (array variables only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
}

impl VarSpec {
    /// Creates an optional variable of the given type with no example.
    pub fn new(var_type: TypeTag) -> Self {
        Self {
            var_type,
            required: false,
            example: None,
            description: None,
            enum_values: None,
            item_type: None,
            delimiter: None,
        }
    }

    /// Marks the variable as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the typed example.
    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Restricts a string variable to a fixed set of values.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets array item type and delimiter.
    pub fn with_items(mut self, item_type: TypeTag, delimiter: &str) -> Self {
        self.item_type = Some(item_type);
        self.delimiter = Some(delimiter.to_string());
        self
    }

    /// Delimiter for the joined array form, falling back to `,`.
    pub fn delimiter_or_default(&self) -> &str {
        self.delimiter
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DELIMITER)
    }
}

/// A whole `envspec.json` document.
///
/// `vars` keeps insertion order; reconciliation and `.env` generation
/// follow it.
///
/// # Examples
///
/// ```
/// use envspec_core::{SchemaDocument, TypeTag, VarSpec};
///
/// let mut doc = SchemaDocument::new();
/// doc.vars.insert("PORT".into(), VarSpec::new(TypeTag::Number));
///
/// let json = serde_json::to_value(&doc).unwrap();
/// assert_eq!(json["$schemaVersion"], 1);
/// assert_eq!(json["vars"]["PORT"]["type"], "number");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Format version stamp.
    #[serde(rename = "$schemaVersion", default = "default_schema_version")]
    pub schema_version: u32,
    /// Variable contracts keyed by variable name.
    #[serde(default)]
    pub vars: IndexMap<String, VarSpec>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl SchemaDocument {
    /// Creates an empty document stamped with [`SCHEMA_VERSION`].
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            vars: IndexMap::new(),
        }
    }
}

impl Default for SchemaDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_type_tag_round_trips_through_serde() {
        for tag in TypeTag::ALL {
            let value = serde_json::to_value(tag).unwrap();
            assert_eq!(value, json!(tag.as_str()));
            let back: TypeTag = serde_json::from_value(value).unwrap();
            assert_eq!(back, tag);
        }
    }

    #[test]
    fn test_var_spec_reads_on_disk_field_names() {
        let spec: VarSpec = serde_json::from_value(json!({
            "type": "array",
            "required": true,
            "example": ["a", "b"],
            "description": "hosts",
            "itemType": "string",
            "delimiter": ";"
        }))
        .unwrap();

        assert_eq!(spec.var_type, TypeTag::Array);
        assert!(spec.required);
        assert_eq!(spec.item_type, Some(TypeTag::String));
        assert_eq!(spec.delimiter_or_default(), ";");
    }

    #[test]
    fn test_var_spec_accepts_desc_alias() {
        let spec: VarSpec =
            serde_json::from_value(json!({"type": "string", "desc": "legacy"})).unwrap();
        assert_eq!(spec.description.as_deref(), Some("legacy"));
        assert!(!spec.required);
    }

    #[test]
    fn test_schema_document_preserves_var_order() {
        let doc: SchemaDocument = serde_json::from_str(
            r#"{"$schemaVersion": 1, "vars": {
                "ZED": {"type": "string"},
                "ALPHA": {"type": "number"},
                "MID": {"type": "boolean"}
            }}"#,
        )
        .unwrap();

        let keys: Vec<_> = doc.vars.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["ZED", "ALPHA", "MID"]);
    }

    #[test]
    fn test_empty_delimiter_falls_back_to_comma() {
        let spec = VarSpec::new(TypeTag::Array).with_items(TypeTag::String, "");
        assert_eq!(spec.delimiter_or_default(), ",");
    }
}

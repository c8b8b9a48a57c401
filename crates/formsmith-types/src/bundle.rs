//! The form bundle: a JSON-Schema-shaped document plus UI presentation hints.
//!
//! A [`FormBundle`] is the atomic unit of generation. It is always a complete
//! value -- absent content is represented by empty maps and lists, never by
//! `Option`. The wire shape (`schema` / `uiSchema` / `required` / `followups`)
//! is the contract shared with the LLM and with API callers.
//!
//! Property insertion order is preserved via [`IndexMap`] because it drives
//! field ordering in rendered forms and response tables downstream.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// JSON Schema primitive type of a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Integer => write!(f, "integer"),
            FieldType::Boolean => write!(f, "boolean"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "integer" => Ok(FieldType::Integer),
            "boolean" => Ok(FieldType::Boolean),
            other => Err(format!("invalid field type: '{other}'")),
        }
    }
}

/// Definition of a single form field within `schema.properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub title: String,
    /// JSON Schema format hint (e.g., "email", "textarea").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    /// Enumerated options for choice fields.
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldSchema {
    /// A plain string field with just a title.
    pub fn string(title: impl Into<String>) -> Self {
        Self {
            field_type: FieldType::String,
            title: title.into(),
            format: None,
            minimum: None,
            maximum: None,
            options: None,
        }
    }

    /// A string field with a format hint.
    pub fn string_with_format(title: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::string(title)
        }
    }

    /// A number field with an inclusive range.
    pub fn number_in_range(title: impl Into<String>, minimum: f64, maximum: f64) -> Self {
        Self {
            field_type: FieldType::Number,
            title: title.into(),
            format: None,
            minimum: Some(minimum),
            maximum: Some(maximum),
            options: None,
        }
    }
}

/// The JSON-Schema object of a bundle: always `type = "object"` with a
/// mapping from field name to field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Always "object". Kept as data so the serialized form matches the
    /// JSON Schema wire contract exactly.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: IndexMap<String, FieldSchema>,
    /// Conventional mirror of the bundle-level `required` list. Optional on
    /// input; generators populate it.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl FormSchema {
    /// An empty object schema.
    pub fn empty() -> Self {
        Self {
            kind: "object".to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }
}

impl Default for FormSchema {
    fn default() -> Self {
        Self::empty()
    }
}

/// Presentation directives for one field (react-jsonschema-form conventions).
///
/// Unknown `ui:*` keys in model output are tolerated and dropped on parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiHints {
    #[serde(rename = "ui:placeholder", skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "ui:widget", skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
}

impl UiHints {
    /// Hints with only a placeholder.
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self {
            placeholder: Some(text.into()),
            widget: None,
        }
    }
}

/// The combined schema + UI-hints + required-list + follow-ups artifact
/// representing one version of a generated form.
///
/// Invariant: a bundle is always independently valid. The `uiSchema` keys
/// SHOULD be a subset of `schema.properties` keys and `required` a subset of
/// the property names, but violations are tolerated rather than rejected --
/// both lists are conventions upheld by the generators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormBundle {
    pub schema: FormSchema,
    #[serde(rename = "uiSchema", default)]
    pub ui_schema: IndexMap<String, UiHints>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub followups: Vec<String>,
}

impl FormBundle {
    /// A bundle with an empty object schema and no hints or follow-ups.
    pub fn empty() -> Self {
        Self {
            schema: FormSchema::empty(),
            ui_schema: IndexMap::new(),
            required: Vec::new(),
            followups: Vec::new(),
        }
    }

    /// Field names in schema property order.
    pub fn field_names(&self) -> Vec<&str> {
        self.schema.properties.keys().map(String::as_str).collect()
    }
}

impl Default for FormBundle {
    fn default() -> Self {
        Self::empty()
    }
}

//! FieldDefinition: declarative description of one configurable value.

use crate::models::{FieldValue, TournamentFormat};
use crate::wizard::registry::{EditorOutput, RawInput};
use crate::wizard::validation::Validation;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Field-type tag. Closed set; each tag has one editor in the registry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    DateTime,
    Select,
    Boolean,
    Image,
    List,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Date,
        FieldType::DateTime,
        FieldType::Select,
        FieldType::Boolean,
        FieldType::Image,
        FieldType::List,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Select => "select",
            FieldType::Boolean => "boolean",
            FieldType::Image => "image",
            FieldType::List => "list",
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One choice of a select field.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub value: String,
    pub label_key: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label_key: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label_key: label_key.into(),
        }
    }
}

/// Constraint checked after the type-level checks pass.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Rule {
    /// Number must have no fractional part.
    Integer,
    Min(f64),
    Max(f64),
    /// Trimmed text length, in chars.
    MinLength(usize),
    MaxLength(usize),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub rule: Rule,
    pub message_key: String,
}

/// Caller-supplied editor for fields the registry cannot handle alone (list fields).
pub trait CustomEditor: Send + Sync {
    /// Turn raw editor input into a value.
    fn decode(&self, input: &RawInput) -> EditorOutput;

    /// Validate the current value of `field`.
    fn validate(&self, field: &FieldDefinition, value: Option<&FieldValue>) -> Validation;
}

/// Immutable description of a wizard field. Built with the consuming setters below.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    key: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    validation: Vec<ValidationRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<FieldValue>,
    /// None means visible for every format.
    #[serde(skip_serializing_if = "Option::is_none")]
    visible_for: Option<Vec<TournamentFormat>>,
    #[serde(skip)]
    custom: Option<Arc<dyn CustomEditor>>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            field_type,
            required: false,
            placeholder: None,
            options: Vec::new(),
            validation: Vec::new(),
            default: None,
            visible_for: None,
            custom: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn option(mut self, value: impl Into<String>, label_key: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, label_key));
        self
    }

    pub fn rule(mut self, rule: Rule, message_key: impl Into<String>) -> Self {
        self.validation.push(ValidationRule {
            rule,
            message_key: message_key.into(),
        });
        self
    }

    pub fn default_value(mut self, value: FieldValue) -> Self {
        self.default = Some(value);
        self
    }

    pub fn visible_for(mut self, formats: &[TournamentFormat]) -> Self {
        self.visible_for = Some(formats.to_vec());
        self
    }

    pub fn custom_editor(mut self, editor: Arc<dyn CustomEditor>) -> Self {
        self.custom = Some(editor);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn rules(&self) -> &[ValidationRule] {
        &self.validation
    }

    pub fn default(&self) -> Option<&FieldValue> {
        self.default.as_ref()
    }

    pub fn custom(&self) -> Option<&Arc<dyn CustomEditor>> {
        self.custom.as_ref()
    }

    /// Always-visible fields keep a category non-empty whatever the format.
    pub fn is_always_visible(&self) -> bool {
        self.visible_for.is_none()
    }

    /// Format-restricted fields stay hidden until a matching format is chosen.
    pub fn is_visible(&self, format: Option<TournamentFormat>) -> bool {
        match (&self.visible_for, format) {
            (None, _) => true,
            (Some(formats), Some(format)) => formats.contains(&format),
            (Some(_), None) => false,
        }
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("key", &self.key)
            .field("field_type", &self.field_type)
            .field("required", &self.required)
            .field("options", &self.options)
            .field("validation", &self.validation)
            .field("default", &self.default)
            .field("visible_for", &self.visible_for)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

//! Validation engine: pure, synchronous per-field checks.

use crate::models::FieldValue;
use crate::wizard::error::ConfigurationError;
use crate::wizard::field::{FieldDefinition, FieldType, Rule};
use serde::{Deserialize, Serialize};

pub const REQUIRED: &str = "validation.required";
pub const EXPECTED_TEXT: &str = "validation.text";
pub const EXPECTED_NUMBER: &str = "validation.number";
pub const EXPECTED_DATE: &str = "validation.date";
pub const EXPECTED_BOOLEAN: &str = "validation.boolean";
pub const EXPECTED_IMAGE: &str = "validation.image";
pub const EXPECTED_LIST: &str = "validation.list";
pub const UNKNOWN_OPTION: &str = "validation.option";

/// Outcome of validating one field. `message_key` is a localization key.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_key: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message_key: None,
        }
    }

    pub fn invalid(message_key: impl Into<String>) -> Self {
        Self {
            valid: false,
            message_key: Some(message_key.into()),
        }
    }
}

/// Validate `value` (None = no value yet) against `field`.
pub fn validate(field: &FieldDefinition, value: Option<&FieldValue>) -> Validation {
    let value = match value {
        Some(FieldValue::Text(s)) if s.trim().is_empty() => None,
        other => other,
    };

    if field.field_type() == FieldType::List {
        return match field.custom() {
            Some(custom) => custom.validate(field, value),
            None => {
                log::warn!(
                    "{}",
                    ConfigurationError::MissingCustomEditor(field.key().to_string())
                );
                Validation::ok()
            }
        };
    }

    let Some(value) = value else {
        return if field.is_required() {
            Validation::invalid(REQUIRED)
        } else {
            Validation::ok()
        };
    };

    if let Err(message_key) = check_type(field, value) {
        return Validation::invalid(message_key);
    }

    for rule in field.rules() {
        if !rule_holds(rule.rule, value) {
            return Validation::invalid(rule.message_key.clone());
        }
    }
    Validation::ok()
}

fn check_type(field: &FieldDefinition, value: &FieldValue) -> Result<(), &'static str> {
    match (field.field_type(), value) {
        (FieldType::Text, FieldValue::Text(_)) => Ok(()),
        (FieldType::Text, _) => Err(EXPECTED_TEXT),
        (FieldType::Select, FieldValue::Text(s)) => {
            if field.options().is_empty() || field.options().iter().any(|o| o.value == *s) {
                Ok(())
            } else {
                Err(UNKNOWN_OPTION)
            }
        }
        (FieldType::Select, _) => Err(UNKNOWN_OPTION),
        (FieldType::Number, FieldValue::Number(n)) if n.is_finite() => Ok(()),
        (FieldType::Number, _) => Err(EXPECTED_NUMBER),
        (FieldType::Date | FieldType::DateTime, FieldValue::Instant(_)) => Ok(()),
        (FieldType::Date | FieldType::DateTime, _) => Err(EXPECTED_DATE),
        (FieldType::Boolean, FieldValue::Bool(_)) => Ok(()),
        (FieldType::Boolean, _) => Err(EXPECTED_BOOLEAN),
        (FieldType::Image, FieldValue::ImageData(_)) => Ok(()),
        (FieldType::Image, _) => Err(EXPECTED_IMAGE),
        (FieldType::List, FieldValue::List(_)) => Ok(()),
        (FieldType::List, _) => Err(EXPECTED_LIST),
    }
}

/// Rules that do not apply to a value's kind pass.
fn rule_holds(rule: Rule, value: &FieldValue) -> bool {
    match (rule, value) {
        (Rule::Integer, FieldValue::Number(n)) => n.fract() == 0.0,
        (Rule::Min(min), FieldValue::Number(n)) => *n >= min,
        (Rule::Max(max), FieldValue::Number(n)) => *n <= max,
        (Rule::MinLength(len), FieldValue::Text(s)) => s.trim().chars().count() >= len,
        (Rule::MaxLength(len), FieldValue::Text(s)) => s.trim().chars().count() <= len,
        (Rule::MinLength(len), FieldValue::List(items)) => items.len() >= len,
        (Rule::MaxLength(len), FieldValue::List(items)) => items.len() <= len,
        _ => true,
    }
}

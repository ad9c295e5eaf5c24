//! Field type registry: a flat table from field-type tag to the editor that decodes its input.
//!
//! Editors turn raw presentation input (strings, checkbox states, item lists) into a
//! [`FieldValue`]. Decoding never fails: input that cannot be understood is kept as text so
//! the validation engine can report it next to the field.

use crate::models::{FieldValue, ImageData};
use crate::wizard::error::ConfigurationError;
use crate::wizard::field::{FieldDefinition, FieldType};
use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Raw input reported by a value editor.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum RawInput {
    Text(String),
    /// Separate date and time-of-day inputs, both local wall clock.
    DateTime { date: String, time: String },
    Checked(bool),
    Items(Vec<String>),
    Cleared,
}

/// Result of decoding raw input.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorOutput {
    Value(FieldValue),
    /// The user emptied the field.
    Cleared,
    /// The editor produced nothing; the draft is left untouched.
    Nothing,
}

/// Value-editor capability for one field type.
pub trait Editor: Send + Sync {
    fn field_type(&self) -> FieldType;

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput;
}

/// Flat table of editors keyed by field type.
#[derive(Clone, Default)]
pub struct FieldTypeRegistry {
    editors: HashMap<FieldType, Arc<dyn Editor>>,
}

impl FieldTypeRegistry {
    /// Registry with no editors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// All eight standard editors; datetime inputs are read in the machine's local time zone.
    pub fn standard() -> Self {
        Self::with_wall_clock(WallClock::Local)
    }

    pub fn with_wall_clock(clock: WallClock) -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(TextEditor));
        registry.register(Arc::new(NumberEditor));
        registry.register(Arc::new(DateEditor));
        registry.register(Arc::new(DateTimeEditor { clock }));
        registry.register(Arc::new(SelectEditor));
        registry.register(Arc::new(BooleanEditor));
        registry.register(Arc::new(ImageEditor));
        registry.register(Arc::new(ListEditor));
        registry
    }

    /// Register (or replace) the editor for its field type.
    pub fn register(&mut self, editor: Arc<dyn Editor>) {
        self.editors.insert(editor.field_type(), editor);
    }

    pub fn resolve(&self, field_type: FieldType) -> Result<Arc<dyn Editor>, ConfigurationError> {
        self.editors
            .get(&field_type)
            .cloned()
            .ok_or_else(|| ConfigurationError::UnknownFieldType(field_type.as_str().to_string()))
    }

    /// Resolve by textual tag, e.g. `"datetime"`.
    pub fn resolve_tag(&self, tag: &str) -> Result<Arc<dyn Editor>, ConfigurationError> {
        let field_type = tag
            .parse::<FieldType>()
            .map_err(ConfigurationError::UnknownFieldType)?;
        self.resolve(field_type)
    }
}

/// Time zone used to read wall-clock datetime inputs.
#[derive(Clone, Copy, Debug)]
pub enum WallClock {
    Local,
    Fixed(FixedOffset),
}

impl WallClock {
    fn to_utc(&self, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
        match self {
            WallClock::Local => local_to_utc(&Local, naive),
            WallClock::Fixed(offset) => local_to_utc(offset, naive),
        }
    }
}

fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    // Ambiguous times (DST fold) take the earlier instant; skipped times have none.
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|t| t.with_timezone(&Utc))
}

/// `YYYY-MM-DD` (or a full RFC 3339 instant) to midnight UTC of that calendar date.
pub fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|t| t.with_timezone(&Utc).date_naive())
        })?;
    date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive))
}

fn parse_time(input: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(input, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M"))
        .ok()
}

/// Combine a date and a time-of-day read on `clock` into a UTC instant. Empty time means midnight.
pub fn combine_date_time(date: &str, time: &str, clock: WallClock) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = match time.trim() {
        "" => NaiveTime::from_hms_opt(0, 0, 0)?,
        t => parse_time(t)?,
    };
    clock.to_utc(NaiveDateTime::new(date, time))
}

fn text_or_cleared(s: String) -> EditorOutput {
    if s.trim().is_empty() {
        EditorOutput::Cleared
    } else {
        EditorOutput::Value(FieldValue::Text(s))
    }
}

fn mismatched(field: &FieldDefinition, input: &RawInput) -> EditorOutput {
    log::debug!(
        "Ignoring {:?} input for {} field {}",
        input,
        field.field_type().as_str(),
        field.key()
    );
    EditorOutput::Nothing
}

struct TextEditor;

impl Editor for TextEditor {
    fn field_type(&self) -> FieldType {
        FieldType::Text
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match input {
            // Text keeps surrounding whitespace; only a blank field counts as cleared.
            RawInput::Text(s) => text_or_cleared(s),
            RawInput::Cleared => EditorOutput::Cleared,
            other => mismatched(field, &other),
        }
    }
}

struct NumberEditor;

impl Editor for NumberEditor {
    fn field_type(&self) -> FieldType {
        FieldType::Number
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match input {
            RawInput::Text(s) if s.trim().is_empty() => EditorOutput::Cleared,
            RawInput::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => EditorOutput::Value(FieldValue::Number(n)),
                Err(_) => EditorOutput::Value(FieldValue::Text(s)),
            },
            RawInput::Cleared => EditorOutput::Cleared,
            other => mismatched(field, &other),
        }
    }
}

struct DateEditor;

impl Editor for DateEditor {
    fn field_type(&self) -> FieldType {
        FieldType::Date
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match input {
            RawInput::Text(s) if s.trim().is_empty() => EditorOutput::Cleared,
            RawInput::Text(s) => match parse_date(&s) {
                Some(t) => EditorOutput::Value(FieldValue::Instant(t)),
                None => EditorOutput::Value(FieldValue::Text(s)),
            },
            RawInput::Cleared => EditorOutput::Cleared,
            other => mismatched(field, &other),
        }
    }
}

struct DateTimeEditor {
    clock: WallClock,
}

impl Editor for DateTimeEditor {
    fn field_type(&self) -> FieldType {
        FieldType::DateTime
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match input {
            RawInput::DateTime { date, time } => {
                if date.trim().is_empty() && time.trim().is_empty() {
                    return EditorOutput::Cleared;
                }
                match combine_date_time(&date, &time, self.clock) {
                    Some(t) => EditorOutput::Value(FieldValue::Instant(t)),
                    None => EditorOutput::Value(FieldValue::Text(format!("{date} {time}"))),
                }
            }
            RawInput::Text(s) if s.trim().is_empty() => EditorOutput::Cleared,
            RawInput::Text(s) => match DateTime::parse_from_rfc3339(s.trim()) {
                Ok(t) => EditorOutput::Value(FieldValue::Instant(t.with_timezone(&Utc))),
                Err(_) => EditorOutput::Value(FieldValue::Text(s)),
            },
            RawInput::Cleared => EditorOutput::Cleared,
            other => mismatched(field, &other),
        }
    }
}

struct SelectEditor;

impl Editor for SelectEditor {
    fn field_type(&self) -> FieldType {
        FieldType::Select
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match input {
            RawInput::Text(s) => text_or_cleared(s),
            RawInput::Cleared => EditorOutput::Cleared,
            other => mismatched(field, &other),
        }
    }
}

struct BooleanEditor;

impl Editor for BooleanEditor {
    fn field_type(&self) -> FieldType {
        FieldType::Boolean
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match input {
            RawInput::Checked(b) => EditorOutput::Value(FieldValue::Bool(b)),
            RawInput::Text(s) => match s.trim() {
                "true" => EditorOutput::Value(FieldValue::Bool(true)),
                "false" => EditorOutput::Value(FieldValue::Bool(false)),
                _ => mismatched(field, &RawInput::Text(s)),
            },
            RawInput::Cleared => EditorOutput::Cleared,
            other => mismatched(field, &other),
        }
    }
}

/// Accepts data URIs. Reading a file into one happens outside, see [`crate::wizard::image`].
struct ImageEditor;

impl Editor for ImageEditor {
    fn field_type(&self) -> FieldType {
        FieldType::Image
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match input {
            RawInput::Text(s) if s.trim().is_empty() => EditorOutput::Cleared,
            RawInput::Text(s) => match ImageData::from_data_uri(&s) {
                Some(image) => EditorOutput::Value(FieldValue::ImageData(image)),
                None => EditorOutput::Value(FieldValue::Text(s)),
            },
            RawInput::Cleared => EditorOutput::Cleared,
            other => mismatched(field, &other),
        }
    }
}

/// Delegates to the field's custom editor; without one the field produces nothing.
struct ListEditor;

impl Editor for ListEditor {
    fn field_type(&self) -> FieldType {
        FieldType::List
    }

    fn decode(&self, field: &FieldDefinition, input: RawInput) -> EditorOutput {
        match field.custom() {
            Some(custom) => custom.decode(&input),
            None => {
                log::warn!(
                    "{}",
                    ConfigurationError::MissingCustomEditor(field.key().to_string())
                );
                EditorOutput::Nothing
            }
        }
    }
}

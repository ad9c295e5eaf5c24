//! WizardDraft: in-progress field values of one wizard session.

use crate::logic::keys;
use crate::models::{FieldValue, FormData, TournamentFormat};
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WizardDraft {
    values: FormData,
}

impl WizardDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draft pre-filled from a flat record (edit mode).
    pub fn from_form_data(values: FormData) -> Self {
        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.values.get(key)
    }

    pub(crate) fn set(&mut self, key: &str, value: Option<FieldValue>) {
        match value {
            Some(value) => {
                self.values.insert(key.to_string(), value);
            }
            None => {
                self.values.remove(key);
            }
        }
    }

    /// Format currently selected, if any and recognized.
    pub fn format(&self) -> Option<TournamentFormat> {
        self.get(keys::FORMAT)?.as_text()?.parse().ok()
    }

    pub fn values(&self) -> &FormData {
        &self.values
    }
}

//! Wizard state machine: moves through categories, collects values, gates progression.

use crate::logic::from_form_data;
use crate::models::{FieldValue, FormData, ImageData, TournamentConfig};
use crate::wizard::category::{Category, CategoryProgress, Sequencer};
use crate::wizard::draft::WizardDraft;
use crate::wizard::error::{ConfigurationError, SubmissionError, WizardError};
use crate::wizard::field::FieldType;
use crate::wizard::image::{ImageReads, ImageTicket};
use crate::wizard::registry::{EditorOutput, FieldTypeRegistry, RawInput};
use crate::wizard::validation::{validate, Validation};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Where the wizard is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "state", content = "category", rename_all = "camelCase")]
pub enum WizardState {
    AtCategory(Category),
    /// Terminal. The draft is frozen into the submission.
    Submitted,
}

/// Outcome of [`WizardSession::advance`].
#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Moved(WizardState),
    /// Current category incomplete; state unchanged.
    Blocked {
        state: WizardState,
        failures: Vec<(String, Validation)>,
    },
}

impl Advance {
    pub fn state(&self) -> WizardState {
        match self {
            Advance::Moved(state) | Advance::Blocked { state, .. } => *state,
        }
    }
}

/// One wizard run. Owns its draft exclusively; never touches storage.
#[derive(Clone)]
pub struct WizardSession {
    sequencer: Arc<Sequencer>,
    registry: Arc<FieldTypeRegistry>,
    draft: WizardDraft,
    state: WizardState,
    results: BTreeMap<String, Validation>,
    images: ImageReads,
    submission: Option<FormData>,
}

impl WizardSession {
    /// Fresh session at the first category, draft seeded with field defaults.
    pub fn new(
        sequencer: Arc<Sequencer>,
        registry: Arc<FieldTypeRegistry>,
    ) -> Result<Self, ConfigurationError> {
        Self::edit(sequencer, registry, FormData::new())
    }

    /// Session pre-filled from a flat record, e.g. `to_form_data` of a saved config.
    pub fn edit(
        sequencer: Arc<Sequencer>,
        registry: Arc<FieldTypeRegistry>,
        values: FormData,
    ) -> Result<Self, ConfigurationError> {
        let first = sequencer.first().ok_or(ConfigurationError::NoCategories)?;
        let mut draft = WizardDraft::from_form_data(values);
        for category in sequencer.categories() {
            for field in sequencer.fields(category) {
                if draft.get(field.key()).is_some() {
                    continue;
                }
                if let Some(default) = field.default() {
                    draft.set(field.key(), Some(default.clone()));
                }
            }
        }
        Ok(Self {
            sequencer,
            registry,
            draft,
            state: WizardState::AtCategory(first),
            results: BTreeMap::new(),
            images: ImageReads::default(),
            submission: None,
        })
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Last validation result per field, as recorded by edits and blocked advances.
    pub fn results(&self) -> &BTreeMap<String, Validation> {
        &self.results
    }

    fn current(&self) -> Result<Category, WizardError> {
        match self.state {
            WizardState::AtCategory(category) => Ok(category),
            WizardState::Submitted => Err(WizardError::AlreadySubmitted),
        }
    }

    /// Set a field's value (None clears it) and re-validate that field only.
    pub fn set_field_value(
        &mut self,
        key: &str,
        value: Option<FieldValue>,
    ) -> Result<Validation, WizardError> {
        self.current()?;
        if self.sequencer.field(key).is_none() {
            return Err(WizardError::UnknownField(key.to_string()));
        }
        self.images.bump(key);
        self.apply(key, value)
    }

    fn apply(&mut self, key: &str, value: Option<FieldValue>) -> Result<Validation, WizardError> {
        let sequencer = Arc::clone(&self.sequencer);
        let (_, field) = sequencer
            .field(key)
            .ok_or_else(|| WizardError::UnknownField(key.to_string()))?;
        self.draft.set(key, value);
        let result = validate(field, self.draft.get(key));
        log::debug!("Field {} set (valid: {})", key, result.valid);
        self.results.insert(key.to_string(), result.clone());
        Ok(result)
    }

    /// Decode raw editor input through the registry, then set it.
    /// Returns None when the editor produced nothing (the draft is untouched).
    pub fn set_field_input(
        &mut self,
        key: &str,
        input: RawInput,
    ) -> Result<Option<Validation>, WizardError> {
        self.current()?;
        let sequencer = Arc::clone(&self.sequencer);
        let (_, field) = sequencer
            .field(key)
            .ok_or_else(|| WizardError::UnknownField(key.to_string()))?;
        let editor = match self.registry.resolve(field.field_type()) {
            Ok(editor) => editor,
            Err(e) => {
                log::warn!("{} (field {})", e, key);
                return Ok(None);
            }
        };
        match editor.decode(field, input) {
            EditorOutput::Value(value) => self.set_field_value(key, Some(value)).map(Some),
            EditorOutput::Cleared => self.set_field_value(key, None).map(Some),
            EditorOutput::Nothing => Ok(None),
        }
    }

    /// Start an image read for `key`; earlier reads of the same field go stale.
    pub fn begin_image_read(&mut self, key: &str) -> Result<ImageTicket, WizardError> {
        self.current()?;
        match self.sequencer.field(key) {
            Some((_, field)) if field.field_type() == FieldType::Image => Ok(self.images.begin(key)),
            Some(_) => Err(WizardError::NotAnImageField(key.to_string())),
            None => Err(WizardError::UnknownField(key.to_string())),
        }
    }

    /// Apply a finished read. Stale tickets are discarded and yield None.
    pub fn complete_image_read(
        &mut self,
        ticket: ImageTicket,
        image: ImageData,
    ) -> Result<Option<Validation>, WizardError> {
        self.current()?;
        if !self.images.is_current(&ticket) {
            log::debug!(
                "Discarding stale image read for {} (token {})",
                ticket.key(),
                ticket.token()
            );
            return Ok(None);
        }
        self.apply(ticket.key(), Some(FieldValue::ImageData(image)))
            .map(Some)
    }

    /// Move to the next category, or submit from the last one. Blocked while the current
    /// category is incomplete.
    pub fn advance(&mut self) -> Result<Advance, WizardError> {
        let current = self.current()?;
        let failures = self.sequencer.failures(current, &self.draft);
        if !failures.is_empty() {
            for (key, result) in &failures {
                self.results.insert(key.clone(), result.clone());
            }
            log::debug!("Advance from {} blocked by {} field(s)", current, failures.len());
            return Ok(Advance::Blocked {
                state: self.state,
                failures,
            });
        }
        self.state = match self.sequencer.next(current) {
            Some(next) => WizardState::AtCategory(next),
            None => {
                self.submission = Some(self.freeze());
                log::debug!("Wizard submitted");
                WizardState::Submitted
            }
        };
        Ok(Advance::Moved(self.state))
    }

    /// Back to the previous category, keeping every collected value.
    pub fn retreat(&mut self) -> Result<WizardState, WizardError> {
        let current = self.current()?;
        let previous = self
            .sequencer
            .previous(current)
            .ok_or(WizardError::AtFirstCategory)?;
        self.state = WizardState::AtCategory(previous);
        Ok(self.state)
    }

    /// Jump to the current category or to a completed one with only completed categories before it.
    pub fn jump_to(&mut self, target: Category) -> Result<WizardState, WizardError> {
        let current = self.current()?;
        if target != current {
            let idx = self
                .sequencer
                .position(target)
                .ok_or(WizardError::CannotJump(target))?;
            let reachable = self.sequencer.categories()[..=idx]
                .iter()
                .all(|c| self.sequencer.is_completed(*c, &self.draft));
            if !reachable {
                return Err(WizardError::CannotJump(target));
            }
        }
        self.state = WizardState::AtCategory(target);
        Ok(self.state)
    }

    pub fn is_completed(&self, category: Category) -> bool {
        self.sequencer.is_completed(category, &self.draft)
    }

    pub fn completed_categories(&self) -> Vec<Category> {
        self.sequencer
            .categories()
            .into_iter()
            .filter(|c| self.is_completed(*c))
            .collect()
    }

    pub fn progress(&self, category: Category) -> CategoryProgress {
        self.sequencer.progress_for(category, &self.draft)
    }

    /// Visible values only: fields hidden by the chosen format are left out.
    fn freeze(&self) -> FormData {
        self.sequencer
            .categories()
            .into_iter()
            .flat_map(|c| self.sequencer.visible_fields(c, &self.draft))
            .filter_map(|field| {
                self.draft
                    .get(field.key())
                    .map(|value| (field.key().to_string(), value.clone()))
            })
            .collect()
    }

    /// The frozen flat record, once submitted.
    pub fn submission(&self) -> Result<&FormData, WizardError> {
        self.submission.as_ref().ok_or(WizardError::NotSubmitted)
    }

    /// Hand the frozen record to the config factory.
    pub fn config(&self) -> Result<TournamentConfig, SubmissionError> {
        Ok(from_form_data(self.submission()?)?)
    }

    pub fn snapshot(&self) -> WizardSnapshot {
        let categories = self
            .sequencer
            .categories()
            .into_iter()
            .map(|category| CategorySnapshot {
                category,
                completed: self.is_completed(category),
                progress: self.progress(category),
                fields: self
                    .sequencer
                    .visible_fields(category, &self.draft)
                    .map(|f| f.key().to_string())
                    .collect(),
            })
            .collect();
        WizardSnapshot {
            state: self.state,
            categories,
            draft: self.draft.values().clone(),
            results: self.results.clone(),
        }
    }
}

/// Serializable view of a session.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub state: WizardState,
    pub categories: Vec<CategorySnapshot>,
    pub draft: FormData,
    pub results: BTreeMap<String, Validation>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySnapshot {
    pub category: Category,
    pub completed: bool,
    pub progress: CategoryProgress,
    /// Visible field keys, in order.
    pub fields: Vec<String>,
}

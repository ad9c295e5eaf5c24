//! Categories (wizard steps), the standard tournament field catalogue, and the sequencer.

use crate::logic::{keys, MAX_COUNT};
use crate::models::{FieldValue, Legs, TieBreaker, TournamentFormat};
use crate::wizard::draft::WizardDraft;
use crate::wizard::error::ConfigurationError;
use crate::wizard::field::{CustomEditor, FieldDefinition, FieldType, Rule};
use crate::wizard::registry::{EditorOutput, RawInput};
use crate::wizard::validation::{self, validate, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

/// Wizard step. Declared order is the wizard order.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    BasicInformation,
    TournamentDates,
    Teams,
    Mode,
    Rules,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::BasicInformation,
        Category::TournamentDates,
        Category::Teams,
        Category::Mode,
        Category::Rules,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Category::BasicInformation => "basicInformation",
            Category::TournamentDates => "tournamentDates",
            Category::Teams => "teams",
            Category::Mode => "mode",
            Category::Rules => "rules",
        };
        f.write_str(s)
    }
}

/// Progress through one category: `current` valid fields out of `total` visible.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct CategoryProgress {
    pub current: usize,
    pub total: usize,
}

/// Ordered categories, each owning its ordered field definitions.
#[derive(Clone, Debug)]
pub struct Sequencer {
    steps: Vec<(Category, Vec<FieldDefinition>)>,
}

impl Sequencer {
    /// Check the catalogue: every category non-empty, with an always-visible field, keys unique.
    pub fn new(steps: Vec<(Category, Vec<FieldDefinition>)>) -> Result<Self, ConfigurationError> {
        if steps.is_empty() {
            return Err(ConfigurationError::NoCategories);
        }
        for (category, fields) in &steps {
            if fields.is_empty() {
                return Err(ConfigurationError::EmptyCategory(*category));
            }
            if !fields.iter().any(FieldDefinition::is_always_visible) {
                return Err(ConfigurationError::NoAlwaysVisibleField(*category));
            }
            let mut seen = HashSet::new();
            for field in fields {
                if !seen.insert(field.key()) {
                    return Err(ConfigurationError::DuplicateKey {
                        category: *category,
                        key: field.key().to_string(),
                    });
                }
            }
        }
        Ok(Self { steps })
    }

    /// The standard tournament wizard.
    pub fn tournament() -> Self {
        Self {
            steps: tournament_catalogue(),
        }
    }

    pub fn categories(&self) -> Vec<Category> {
        self.steps.iter().map(|(c, _)| *c).collect()
    }

    pub fn first(&self) -> Option<Category> {
        self.steps.first().map(|(c, _)| *c)
    }

    pub fn next(&self, category: Category) -> Option<Category> {
        let idx = self.position(category)?;
        self.steps.get(idx + 1).map(|(c, _)| *c)
    }

    pub fn previous(&self, category: Category) -> Option<Category> {
        let idx = self.position(category)?;
        idx.checked_sub(1).map(|i| self.steps[i].0)
    }

    pub fn position(&self, category: Category) -> Option<usize> {
        self.steps.iter().position(|(c, _)| *c == category)
    }

    /// Declared fields of a category, visible or not.
    pub fn fields(&self, category: Category) -> &[FieldDefinition] {
        self.steps
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, fields)| fields.as_slice())
            .unwrap_or(&[])
    }

    /// Fields shown for the draft's current format, in declared order.
    pub fn visible_fields<'a>(
        &'a self,
        category: Category,
        draft: &WizardDraft,
    ) -> impl Iterator<Item = &'a FieldDefinition> {
        let format = draft.format();
        self.fields(category)
            .iter()
            .filter(move |f| f.is_visible(format))
    }

    /// Look a field up by key, with its owning category.
    pub fn field(&self, key: &str) -> Option<(Category, &FieldDefinition)> {
        self.steps.iter().find_map(|(category, fields)| {
            fields
                .iter()
                .find(|f| f.key() == key)
                .map(|f| (*category, f))
        })
    }

    /// Visible fields of a category that currently fail validation.
    pub fn failures(&self, category: Category, draft: &WizardDraft) -> Vec<(String, Validation)> {
        self.visible_fields(category, draft)
            .filter_map(|field| {
                let result = validate(field, draft.get(field.key()));
                (!result.valid).then(|| (field.key().to_string(), result))
            })
            .collect()
    }

    /// True iff every visible field of the category validates. Recomputed on every call.
    pub fn is_completed(&self, category: Category, draft: &WizardDraft) -> bool {
        self.visible_fields(category, draft)
            .all(|field| validate(field, draft.get(field.key())).valid)
    }

    /// `current` counts valid fields in declared order, stopping at the first invalid one.
    pub fn progress_for(&self, category: Category, draft: &WizardDraft) -> CategoryProgress {
        let visible: Vec<_> = self.visible_fields(category, draft).collect();
        let current = visible
            .iter()
            .take_while(|field| validate(field, draft.get(field.key())).valid)
            .count();
        CategoryProgress {
            current,
            total: visible.len(),
        }
    }
}

fn legs_select(key: &str) -> FieldDefinition {
    Legs::ALL
        .iter()
        .fold(FieldDefinition::new(key, FieldType::Select), |field, legs| {
            field.option(legs.as_str(), format!("legs.{}", legs.as_str().to_lowercase()))
        })
}

fn count(key: &str, min: f64) -> FieldDefinition {
    FieldDefinition::new(key, FieldType::Number)
        .rule(Rule::Integer, "validation.integer")
        .rule(Rule::Min(min), "validation.min")
        .rule(Rule::Max(f64::from(MAX_COUNT)), "validation.max")
}

/// Field declarations of the standard tournament wizard.
pub fn tournament_catalogue() -> Vec<(Category, Vec<FieldDefinition>)> {
    use TournamentFormat::{GroupKnockout, Knockout, League};

    let format = TournamentFormat::ALL.iter().fold(
        FieldDefinition::new(keys::FORMAT, FieldType::Select).required(),
        |field, f| field.option(f.as_str(), format!("format.{}", f.as_str().to_lowercase())),
    );

    vec![
        (
            Category::BasicInformation,
            vec![
                FieldDefinition::new(keys::NAME, FieldType::Text)
                    .required()
                    .placeholder("basicInformation.name.placeholder")
                    .rule(Rule::MinLength(1), "validation.required"),
                FieldDefinition::new(keys::LOGO_URL, FieldType::Image),
            ],
        ),
        (
            Category::TournamentDates,
            vec![
                FieldDefinition::new(keys::START_DATE, FieldType::DateTime).required(),
                FieldDefinition::new(keys::END_DATE, FieldType::Date),
            ],
        ),
        (
            Category::Teams,
            vec![
                count(keys::NUMBER_OF_PARTICIPANTS, 2.0).required(),
                count(keys::FIELDS, 1.0).required(),
            ],
        ),
        (Category::Mode, vec![format]),
        (
            Category::Rules,
            vec![
                legs_select(keys::LEGS)
                    .required()
                    .default_value(FieldValue::text(Legs::SingleMatch.as_str())),
                count(keys::POINTS_FOR_WIN, 0.0)
                    .visible_for(&[League, GroupKnockout])
                    .default_value(FieldValue::Number(3.0)),
                count(keys::POINTS_FOR_DRAW, 0.0)
                    .visible_for(&[League, GroupKnockout])
                    .default_value(FieldValue::Number(1.0)),
                count(keys::POINTS_FOR_LOSS, 0.0)
                    .visible_for(&[League, GroupKnockout])
                    .default_value(FieldValue::Number(0.0)),
                FieldDefinition::new(keys::TIE_BREAKERS, FieldType::List)
                    .visible_for(&[League, GroupKnockout])
                    .custom_editor(Arc::new(TieBreakerList)),
                count(keys::NUMBER_OF_GROUPS, 1.0)
                    .required()
                    .visible_for(&[GroupKnockout]),
                count(keys::QUALIFIERS_PER_GROUP, 1.0)
                    .required()
                    .visible_for(&[GroupKnockout]),
                legs_select(keys::KNOCKOUT_LEGS)
                    .visible_for(&[GroupKnockout])
                    .default_value(FieldValue::text(Legs::SingleMatch.as_str())),
                FieldDefinition::new(keys::HAS_THIRD_PLACE, FieldType::Boolean)
                    .visible_for(&[GroupKnockout, Knockout])
                    .default_value(FieldValue::Bool(false)),
            ],
        ),
    ]
}

/// Ordered, duplicate-free list of tie-breaker names.
pub struct TieBreakerList;

impl CustomEditor for TieBreakerList {
    fn decode(&self, input: &RawInput) -> EditorOutput {
        match input {
            RawInput::Items(items) => EditorOutput::Value(FieldValue::List(
                items.iter().map(|item| FieldValue::text(item.trim())).collect(),
            )),
            RawInput::Cleared => EditorOutput::Cleared,
            _ => EditorOutput::Nothing,
        }
    }

    fn validate(&self, field: &FieldDefinition, value: Option<&FieldValue>) -> Validation {
        let items = match value {
            None => &[][..],
            Some(FieldValue::List(items)) => items.as_slice(),
            Some(_) => return Validation::invalid(validation::EXPECTED_LIST),
        };
        if items.is_empty() && field.is_required() {
            return Validation::invalid(validation::REQUIRED);
        }
        let mut seen = HashSet::new();
        for item in items {
            let known = item
                .as_text()
                .and_then(|s| s.parse::<TieBreaker>().ok());
            match known {
                Some(tb) if seen.insert(tb) => {}
                Some(_) => return Validation::invalid("validation.duplicate"),
                None => return Validation::invalid(validation::UNKNOWN_OPTION),
            }
        }
        Validation::ok()
    }
}

//! Wizard error kinds: engineering mistakes and illegal transitions.

use crate::logic::ConfigError;
use crate::wizard::category::Category;
use thiserror::Error;

/// Mistakes in how fields are declared or registered. Logged; the session degrades instead of failing.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("Wizard declares no categories")]
    NoCategories,
    #[error("Unknown field type: {0}")]
    UnknownFieldType(String),
    #[error("Category {0} declares no fields")]
    EmptyCategory(Category),
    #[error("Category {0} has no field visible for every format")]
    NoAlwaysVisibleField(Category),
    #[error("Field key {key} declared twice in category {category}")]
    DuplicateKey { category: Category, key: String },
    #[error("List field {0} has no custom editor")]
    MissingCustomEditor(String),
}

/// Transitions the wizard refuses. A blocked `advance` is not one of these.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum WizardError {
    #[error("Wizard already submitted")]
    AlreadySubmitted,
    #[error("Wizard not submitted yet")]
    NotSubmitted,
    #[error("Already at the first step")]
    AtFirstCategory,
    #[error("Cannot jump to {0}: step not completed yet")]
    CannotJump(Category),
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field {0} is not an image field")]
    NotAnImageField(String),
}

/// Why a submitted wizard could not produce a configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

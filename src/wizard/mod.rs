//! Wizard engine: field definitions, editor registry, validation, step sequencing, state machine.

mod category;
mod draft;
mod error;
mod field;
mod image;
mod machine;
mod registry;
mod validation;

pub use category::{tournament_catalogue, Category, CategoryProgress, Sequencer, TieBreakerList};
pub use draft::WizardDraft;
pub use error::{ConfigurationError, SubmissionError, WizardError};
pub use field::{CustomEditor, FieldDefinition, FieldType, Rule, SelectOption, ValidationRule};
pub use image::{read_image_file, ImageTicket};
pub use machine::{Advance, CategorySnapshot, WizardSession, WizardSnapshot, WizardState};
pub use registry::{
    combine_date_time, parse_date, Editor, EditorOutput, FieldTypeRegistry, RawInput, WallClock,
};
pub use validation::{validate, Validation};

/// Message keys reported by [`validate`].
pub mod messages {
    pub use super::validation::{
        EXPECTED_BOOLEAN, EXPECTED_DATE, EXPECTED_IMAGE, EXPECTED_LIST, EXPECTED_NUMBER,
        EXPECTED_TEXT, REQUIRED, UNKNOWN_OPTION,
    };
}

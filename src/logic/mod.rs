//! Business logic: config factory, lifecycle transitions, participant import.

mod factory;
mod import;
mod lifecycle;

pub use factory::{from_form_data, keys, to_form_data, ConfigError, MAX_COUNT};
pub use import::{import_participants, read_participant_names, ImportError};
pub use lifecycle::{complete_tournament, start_tournament, MIN_PARTICIPANTS_TO_START};

//! Tournament organizer: guided configuration wizard, tournament config model, and storage port.

pub mod logic;
pub mod models;
pub mod storage;
pub mod wizard;

pub use logic::{
    complete_tournament, from_form_data, import_participants, keys, start_tournament,
    to_form_data, ConfigError, ImportError,
};
pub use models::{
    FieldValue, FormData, FormatRules, GroupConfig, ImageData, KnockoutConfig, LeagueConfig, Legs,
    Participant, ParticipantId, Phase, PointsTable, StageRules, TieBreaker, Tournament,
    TournamentConfig, TournamentError, TournamentFormat, TournamentId, TournamentRecord,
    TournamentStatus, TournamentType,
};
pub use storage::{
    persist, JsonFileStore, MemoryStore, SharedStore, StorageError, TournamentStore, UpdateError,
};
pub use wizard::{
    Advance, Category, CategoryProgress, FieldDefinition, FieldType, FieldTypeRegistry, RawInput,
    Sequencer, Validation, WizardError, WizardSession, WizardState,
};

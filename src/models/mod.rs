//! Data structures: field values, tournament config, participants, tournament aggregate.

mod config;
mod participant;
mod tournament;
mod value;

pub use config::{
    FormatRules, GroupConfig, KnockoutConfig, LeagueConfig, Legs, Phase, PointsTable, StageRules,
    TieBreaker, TournamentConfig, TournamentFormat, TournamentType,
};
pub use participant::{Participant, ParticipantId};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentRecord, TournamentStatus};
pub use value::{FieldValue, FormData, ImageData};

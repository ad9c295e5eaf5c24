//! Tournament aggregate, TournamentStatus, and the persisted TournamentRecord.

use crate::models::config::TournamentConfig;
use crate::models::participant::{Participant, ParticipantId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Domain invariant violations. Always fatal to the attempted operation; nothing is partially applied.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    /// Tournament is not in a status that allows this action.
    #[error("Invalid status for this action: tournament is {0}")]
    InvalidStatus(TournamentStatus),
    /// Not enough participants to start.
    #[error("Need at least {required} participants to start (have {actual})")]
    NotEnoughParticipants { required: usize, actual: usize },
    /// Participant names must be non-empty after trimming.
    #[error("Participant name must not be empty")]
    EmptyName,
    /// A participant with this name already exists (case-insensitive).
    #[error("A participant with this name already exists")]
    DuplicateParticipantName,
    /// All configured participant slots are taken.
    #[error("Tournament is full ({capacity} participants)")]
    TournamentFull { capacity: usize },
    #[error("Participant not found")]
    ParticipantNotFound(ParticipantId),
}

/// Unique identifier for a tournament, assigned by the store on first save.
pub type TournamentId = Uuid;

/// Lifecycle status.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    /// Registering participants; config still editable.
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl std::fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TournamentStatus::NotStarted => "not started",
            TournamentStatus::InProgress => "in progress",
            TournamentStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// A configured tournament and its participants.
#[derive(Clone, Debug, PartialEq)]
pub struct Tournament {
    /// None until the first save.
    pub id: Option<TournamentId>,
    pub config: TournamentConfig,
    pub participants: Vec<Participant>,
    pub status: TournamentStatus,
}

impl Tournament {
    /// Create an unsaved tournament with no participants.
    pub fn new(config: TournamentConfig) -> Self {
        Self {
            id: None,
            config,
            participants: Vec::new(),
            status: TournamentStatus::NotStarted,
        }
    }

    /// Replace the configuration (only while NotStarted, e.g. after an edit-mode wizard run).
    pub fn reconfigure(&mut self, config: TournamentConfig) -> Result<(), TournamentError> {
        self.ensure_not_started()?;
        self.config = config;
        Ok(())
    }

    /// Add a participant. Names are trimmed and must be unique (case-insensitive).
    /// A non-zero `number_of_participants` caps the list.
    pub fn add_participant(&mut self, name: impl Into<String>) -> Result<ParticipantId, TournamentError> {
        self.ensure_not_started()?;
        let name = name.into();
        let name_trimmed = name.trim();
        if name_trimmed.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        let is_duplicate = self
            .participants
            .iter()
            .any(|p| p.name.eq_ignore_ascii_case(name_trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicateParticipantName);
        }
        let capacity = self.config.number_of_participants as usize;
        if capacity > 0 && self.participants.len() >= capacity {
            return Err(TournamentError::TournamentFull { capacity });
        }
        let participant = Participant::new(name_trimmed);
        let id = participant.id;
        self.participants.push(participant);
        Ok(id)
    }

    /// Add several participants at once. Either all are added or none.
    pub fn add_participants<I, S>(&mut self, names: I) -> Result<Vec<ParticipantId>, TournamentError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut staged = self.clone();
        let ids = names
            .into_iter()
            .map(|name| staged.add_participant(name))
            .collect::<Result<Vec<_>, _>>()?;
        self.participants = staged.participants;
        Ok(ids)
    }

    /// Remove a participant by id (only while NotStarted).
    pub fn remove_participant(&mut self, participant_id: ParticipantId) -> Result<(), TournamentError> {
        self.ensure_not_started()?;
        let idx = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or(TournamentError::ParticipantNotFound(participant_id))?;
        self.participants.remove(idx);
        Ok(())
    }

    fn ensure_not_started(&self) -> Result<(), TournamentError> {
        if self.status != TournamentStatus::NotStarted {
            return Err(TournamentError::InvalidStatus(self.status));
        }
        Ok(())
    }

    /// Persistable record, once an id has been assigned.
    pub fn to_record(&self) -> Option<TournamentRecord> {
        Some(TournamentRecord {
            id: self.id?,
            config: self.config.clone(),
            participants: self.participants.clone(),
            status: self.status,
        })
    }
}

/// What the store keeps: the serialized config plus id, status and participants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentRecord {
    pub id: TournamentId,
    #[serde(flatten)]
    pub config: TournamentConfig,
    pub participants: Vec<Participant>,
    pub status: TournamentStatus,
}

impl From<TournamentRecord> for Tournament {
    fn from(record: TournamentRecord) -> Self {
        Self {
            id: Some(record.id),
            config: record.config,
            participants: record.participants,
            status: record.status,
        }
    }
}

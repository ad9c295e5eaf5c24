//! Storage port for tournament records, and two adapters.
//!
//! The wizard and factory never call the store; callers persist a finished config themselves
//! and handle [`StorageError`] (no retries happen here).

mod json_file;
mod memory;
mod shared;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use shared::{SharedStore, UpdateError};

use crate::models::{Tournament, TournamentId, TournamentRecord};
use thiserror::Error;
use uuid::Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage write failed: {0}")]
    WriteFailed(String),
}

/// Key-value store of tournament records.
pub trait TournamentStore: Send + Sync {
    fn get_tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError>;

    fn get_tournament(&self, id: TournamentId) -> Result<Option<TournamentRecord>, StorageError>;

    /// Insert or replace the record with the same id.
    fn save_tournament(&self, record: TournamentRecord) -> Result<(), StorageError>;

    /// Deleting an unknown id is not an error.
    fn delete_tournament(&self, id: TournamentId) -> Result<(), StorageError>;

    /// Id for a tournament saved for the first time.
    fn next_id(&self) -> TournamentId {
        Uuid::new_v4()
    }
}

/// Save `tournament`, assigning an id on first save. On failure the tournament is unchanged.
pub fn persist(
    store: &dyn TournamentStore,
    tournament: &mut Tournament,
) -> Result<TournamentId, StorageError> {
    let id = tournament.id.unwrap_or_else(|| store.next_id());
    let record = TournamentRecord {
        id,
        config: tournament.config.clone(),
        participants: tournament.participants.clone(),
        status: tournament.status,
    };
    store.save_tournament(record)?;
    tournament.id = Some(id);
    log::info!("Saved tournament {}", id);
    Ok(id)
}

/// Load a tournament by id.
pub fn load(store: &dyn TournamentStore, id: TournamentId) -> Result<Option<Tournament>, StorageError> {
    Ok(store.get_tournament(id)?.map(Tournament::from))
}

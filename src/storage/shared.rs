//! Store shared between request handlers. Read-modify-write cycles run one at a time.

use crate::models::{Tournament, TournamentId};
use crate::storage::{load, persist, StorageError, TournamentStore};
use std::sync::{Mutex, MutexGuard};
use thiserror::Error;

/// Why [`SharedStore::update`] did not save.
#[derive(Debug, Error)]
pub enum UpdateError<E> {
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// The change itself was refused; nothing was written.
    #[error("{0}")]
    Rejected(E),
}

pub struct SharedStore {
    store: Box<dyn TournamentStore>,
    writes: Mutex<()>,
}

impl SharedStore {
    pub fn new(store: Box<dyn TournamentStore>) -> Self {
        Self {
            store,
            writes: Mutex::new(()),
        }
    }

    /// The underlying store, for reads.
    pub fn store(&self) -> &dyn TournamentStore {
        self.store.as_ref()
    }

    fn lock(&self) -> Result<MutexGuard<'_, ()>, StorageError> {
        self.writes
            .lock()
            .map_err(|_| StorageError::WriteFailed("lock error".into()))
    }

    /// Save a tournament; the first save assigns its id.
    pub fn save(&self, tournament: &mut Tournament) -> Result<TournamentId, StorageError> {
        let _guard = self.lock()?;
        persist(self.store.as_ref(), tournament)
    }

    /// Load, apply `f` and save back with no other write in between.
    /// Ok(None) when the id is unknown.
    pub fn update<F, E>(&self, id: TournamentId, f: F) -> Result<Option<Tournament>, UpdateError<E>>
    where
        F: FnOnce(&mut Tournament) -> Result<(), E>,
    {
        let _guard = self.lock()?;
        let Some(mut tournament) = load(self.store.as_ref(), id)? else {
            return Ok(None);
        };
        f(&mut tournament).map_err(UpdateError::Rejected)?;
        persist(self.store.as_ref(), &mut tournament)?;
        Ok(Some(tournament))
    }

    pub fn delete(&self, id: TournamentId) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.store.delete_tournament(id)
    }
}

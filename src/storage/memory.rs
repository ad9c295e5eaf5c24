//! In-memory store, kept in insertion order.

use crate::models::{TournamentId, TournamentRecord};
use crate::storage::{StorageError, TournamentStore};
use std::sync::RwLock;

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<TournamentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryStore {
    fn get_tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError> {
        let g = self
            .records
            .read()
            .map_err(|_| StorageError::Unavailable("lock error".into()))?;
        Ok(g.clone())
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Option<TournamentRecord>, StorageError> {
        let g = self
            .records
            .read()
            .map_err(|_| StorageError::Unavailable("lock error".into()))?;
        Ok(g.iter().find(|r| r.id == id).cloned())
    }

    fn save_tournament(&self, record: TournamentRecord) -> Result<(), StorageError> {
        let mut g = self
            .records
            .write()
            .map_err(|_| StorageError::WriteFailed("lock error".into()))?;
        match g.iter().position(|r| r.id == record.id) {
            Some(idx) => g[idx] = record,
            None => g.push(record),
        }
        Ok(())
    }

    fn delete_tournament(&self, id: TournamentId) -> Result<(), StorageError> {
        let mut g = self
            .records
            .write()
            .map_err(|_| StorageError::WriteFailed("lock error".into()))?;
        g.retain(|r| r.id != id);
        Ok(())
    }
}

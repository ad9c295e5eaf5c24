//! Store backed by one JSON file holding an array of records.

use crate::models::{TournamentId, TournamentRecord};
use crate::storage::{StorageError, TournamentStore};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    fn load(&self) -> Result<Vec<TournamentRecord>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::Unavailable(e.to_string())),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| StorageError::Unavailable(e.to_string()))
    }

    fn write(&self, records: &[TournamentRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(records)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        // Write beside the target, then rename, so a failed write leaves the old file intact.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| StorageError::WriteFailed(e.to_string()))
    }

    fn modify(
        &self,
        f: impl FnOnce(&mut Vec<TournamentRecord>),
    ) -> Result<(), StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::WriteFailed("lock error".into()))?;
        let mut records = self.load().map_err(|e| match e {
            StorageError::Unavailable(msg) => StorageError::WriteFailed(msg),
            other => other,
        })?;
        f(&mut records);
        self.write(&records)
    }
}

impl TournamentStore for JsonFileStore {
    fn get_tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StorageError::Unavailable("lock error".into()))?;
        self.load()
    }

    fn get_tournament(&self, id: TournamentId) -> Result<Option<TournamentRecord>, StorageError> {
        Ok(self.get_tournaments()?.into_iter().find(|r| r.id == id))
    }

    fn save_tournament(&self, record: TournamentRecord) -> Result<(), StorageError> {
        self.modify(|records| match records.iter().position(|r| r.id == record.id) {
            Some(idx) => records[idx] = record,
            None => records.push(record),
        })
    }

    fn delete_tournament(&self, id: TournamentId) -> Result<(), StorageError> {
        self.modify(|records| records.retain(|r| r.id != id))
    }
}

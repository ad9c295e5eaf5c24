//! Participant import from CSV (one participant per row, `name` column).

use crate::models::{ParticipantId, Tournament, TournamentError};
use std::io::Read;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV has no name column")]
    MissingNameColumn,
    #[error(transparent)]
    Tournament(#[from] TournamentError),
}

/// Names from the `name` column (case-insensitive header). Blank cells are skipped.
pub fn read_participant_names<R: Read>(reader: R) -> Result<Vec<String>, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let column = rdr
        .headers()?
        .iter()
        .position(|h| h.eq_ignore_ascii_case("name"))
        .ok_or(ImportError::MissingNameColumn)?;

    let mut names = Vec::new();
    for record in rdr.records() {
        let record = record?;
        if let Some(name) = record.get(column).filter(|n| !n.is_empty()) {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

/// Add every participant from the CSV, or none if any row is rejected.
pub fn import_participants<R: Read>(
    tournament: &mut Tournament,
    reader: R,
) -> Result<Vec<ParticipantId>, ImportError> {
    let names = read_participant_names(reader)?;
    let ids = tournament.add_participants(names)?;
    log::info!("Imported {} participant(s)", ids.len());
    Ok(ids)
}

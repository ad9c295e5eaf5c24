//! Lifecycle transitions: NotStarted -> InProgress -> Completed.

use crate::models::{Tournament, TournamentError, TournamentStatus};

/// Participants needed before a tournament can start.
pub const MIN_PARTICIPANTS_TO_START: usize = 2;

/// Start the tournament: requires NotStarted and at least two participants.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::NotStarted {
        return Err(TournamentError::InvalidStatus(tournament.status));
    }
    let actual = tournament.participants.len();
    if actual < MIN_PARTICIPANTS_TO_START {
        return Err(TournamentError::NotEnoughParticipants {
            required: MIN_PARTICIPANTS_TO_START,
            actual,
        });
    }
    tournament.status = TournamentStatus::InProgress;
    Ok(())
}

/// Complete a running tournament.
pub fn complete_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.status != TournamentStatus::InProgress {
        return Err(TournamentError::InvalidStatus(tournament.status));
    }
    tournament.status = TournamentStatus::Completed;
    Ok(())
}

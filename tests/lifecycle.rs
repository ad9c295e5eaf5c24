//! Tournament lifecycle, participant management and CSV import.

mod common;

use tournament_wizard::logic::read_participant_names;
use tournament_wizard::{
    complete_tournament, from_form_data, import_participants, keys, start_tournament,
    FieldValue, ImportError, Tournament, TournamentError, TournamentStatus,
};

fn tournament(capacity: u32) -> Tournament {
    let mut form = common::spring_cup();
    form.insert(
        keys::NUMBER_OF_PARTICIPANTS.into(),
        FieldValue::Number(f64::from(capacity)),
    );
    Tournament::new(from_form_data(&form).unwrap())
}

#[test]
fn start_needs_two_participants() {
    let mut t = tournament(8);
    t.add_participant("Alpha").unwrap();
    assert_eq!(
        start_tournament(&mut t),
        Err(TournamentError::NotEnoughParticipants {
            required: 2,
            actual: 1
        })
    );
    assert_eq!(t.status, TournamentStatus::NotStarted);

    t.add_participant("Bravo").unwrap();
    start_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::InProgress);
    assert_eq!(
        start_tournament(&mut t),
        Err(TournamentError::InvalidStatus(TournamentStatus::InProgress))
    );
}

#[test]
fn started_tournament_is_locked() {
    let mut t = tournament(8);
    let alpha = t.add_participant("Alpha").unwrap();
    t.add_participant("Bravo").unwrap();
    start_tournament(&mut t).unwrap();

    let locked = Err(TournamentError::InvalidStatus(TournamentStatus::InProgress));
    assert_eq!(t.add_participant("Charlie").map(|_| ()), locked);
    assert_eq!(t.remove_participant(alpha), locked);
    assert_eq!(t.reconfigure(t.config.clone()), locked);
    assert_eq!(t.participants.len(), 2);
}

#[test]
fn complete_only_from_in_progress() {
    let mut t = tournament(8);
    assert_eq!(
        complete_tournament(&mut t),
        Err(TournamentError::InvalidStatus(TournamentStatus::NotStarted))
    );
    t.add_participants(["Alpha", "Bravo"]).unwrap();
    start_tournament(&mut t).unwrap();
    complete_tournament(&mut t).unwrap();
    assert_eq!(t.status, TournamentStatus::Completed);
    assert_eq!(
        complete_tournament(&mut t),
        Err(TournamentError::InvalidStatus(TournamentStatus::Completed))
    );
}

#[test]
fn participant_names_are_trimmed_and_unique() {
    let mut t = tournament(8);
    t.add_participant("  Alpha ").unwrap();
    assert_eq!(t.participants[0].name, "Alpha");
    assert_eq!(
        t.add_participant("ALPHA"),
        Err(TournamentError::DuplicateParticipantName)
    );
    assert_eq!(t.add_participant("   "), Err(TournamentError::EmptyName));
}

#[test]
fn capacity_comes_from_the_config() {
    let mut t = tournament(2);
    t.add_participants(["Alpha", "Bravo"]).unwrap();
    assert_eq!(
        t.add_participant("Charlie"),
        Err(TournamentError::TournamentFull { capacity: 2 })
    );

    let mut open = tournament(0);
    open.add_participants((0..20).map(|i| format!("Team {i}"))).unwrap();
    assert_eq!(open.participants.len(), 20);
}

#[test]
fn batch_add_is_all_or_nothing() {
    let mut t = tournament(8);
    t.add_participant("Alpha").unwrap();
    assert_eq!(
        t.add_participants(["Bravo", "Charlie", "alpha"]),
        Err(TournamentError::DuplicateParticipantName)
    );
    assert_eq!(t.participants.len(), 1);
}

#[test]
fn remove_participant_by_id() {
    let mut t = tournament(8);
    let ids = t.add_participants(["Alpha", "Bravo"]).unwrap();
    t.remove_participant(ids[0]).unwrap();
    assert_eq!(t.participants.len(), 1);
    assert_eq!(t.participants[0].name, "Bravo");
    assert_eq!(
        t.remove_participant(ids[0]),
        Err(TournamentError::ParticipantNotFound(ids[0]))
    );
}

#[test]
fn csv_import_reads_the_name_column() {
    let csv = "Seed,Name,City\n1, Alpha ,Oslo\n2,,Bergen\n3,Bravo,Trondheim\n";
    assert_eq!(
        read_participant_names(csv.as_bytes()).unwrap(),
        vec!["Alpha", "Bravo"]
    );

    let mut t = tournament(8);
    let ids = import_participants(&mut t, csv.as_bytes()).unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(t.participants[1].name, "Bravo");
}

#[test]
fn csv_import_without_name_column_fails() {
    let mut t = tournament(8);
    let result = import_participants(&mut t, "team\nAlpha\n".as_bytes());
    assert!(matches!(result, Err(ImportError::MissingNameColumn)));
    assert!(t.participants.is_empty());
}

#[test]
fn csv_import_rejects_the_whole_file_on_a_bad_row() {
    let mut t = tournament(2);
    let result = import_participants(&mut t, "name\nAlpha\nBravo\nCharlie\n".as_bytes());
    assert!(matches!(
        result,
        Err(ImportError::Tournament(TournamentError::TournamentFull { capacity: 2 }))
    ));
    assert!(t.participants.is_empty());
}

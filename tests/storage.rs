//! Storage port: id assignment on first save, upserts, and both adapters.

mod common;

use std::fs;
use std::path::PathBuf;
use tournament_wizard::storage::load;
use tournament_wizard::{
    from_form_data, persist, start_tournament, JsonFileStore, MemoryStore, SharedStore,
    StorageError, Tournament, TournamentError, TournamentId, TournamentRecord, TournamentStatus,
    TournamentStore, UpdateError,
};
use uuid::Uuid;

fn spring_cup() -> Tournament {
    Tournament::new(from_form_data(&common::spring_cup()).unwrap())
}

fn temp_file() -> PathBuf {
    std::env::temp_dir().join(format!("tournament-wizard-{}.json", Uuid::new_v4()))
}

/// Store that is never reachable.
struct OfflineStore;

impl TournamentStore for OfflineStore {
    fn get_tournaments(&self) -> Result<Vec<TournamentRecord>, StorageError> {
        Err(StorageError::Unavailable("offline".into()))
    }

    fn get_tournament(&self, _id: TournamentId) -> Result<Option<TournamentRecord>, StorageError> {
        Err(StorageError::Unavailable("offline".into()))
    }

    fn save_tournament(&self, _record: TournamentRecord) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed("offline".into()))
    }

    fn delete_tournament(&self, _id: TournamentId) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed("offline".into()))
    }
}

#[test]
fn first_save_assigns_an_id_and_later_saves_keep_it() {
    let store = MemoryStore::new();
    let mut t = spring_cup();
    assert!(t.id.is_none());

    let id = persist(&store, &mut t).unwrap();
    assert_eq!(t.id, Some(id));

    t.add_participants(["Alpha", "Bravo"]).unwrap();
    start_tournament(&mut t).unwrap();
    assert_eq!(persist(&store, &mut t).unwrap(), id);

    let records = store.get_tournaments().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, TournamentStatus::InProgress);
    assert_eq!(load(&store, id).unwrap(), Some(t));
}

#[test]
fn memory_store_keeps_insertion_order_and_deletes() {
    let store = MemoryStore::new();
    let mut first = spring_cup();
    let mut second = spring_cup();
    second.config.name = "Autumn Cup".into();
    let first_id = persist(&store, &mut first).unwrap();
    let second_id = persist(&store, &mut second).unwrap();
    persist(&store, &mut first).unwrap();

    let names: Vec<_> = store
        .get_tournaments()
        .unwrap()
        .into_iter()
        .map(|r| r.config.name)
        .collect();
    assert_eq!(names, vec!["Spring Cup", "Autumn Cup"]);

    store.delete_tournament(first_id).unwrap();
    store.delete_tournament(first_id).unwrap();
    assert!(store.get_tournament(first_id).unwrap().is_none());
    assert!(store.get_tournament(second_id).unwrap().is_some());
}

#[test]
fn failed_save_leaves_the_tournament_unsaved() {
    let mut t = spring_cup();
    assert_eq!(
        persist(&OfflineStore, &mut t),
        Err(StorageError::WriteFailed("offline".into()))
    );
    assert!(t.id.is_none());
    assert!(matches!(
        load(&OfflineStore, Uuid::new_v4()),
        Err(StorageError::Unavailable(_))
    ));
}

#[test]
fn json_file_store_survives_a_reopen() {
    let path = temp_file();
    let store = JsonFileStore::new(&path);
    assert!(store.get_tournaments().unwrap().is_empty());

    let mut t = spring_cup();
    t.add_participant("Alpha").unwrap();
    let id = persist(&store, &mut t).unwrap();

    let reopened = JsonFileStore::new(&path);
    assert_eq!(load(&reopened, id).unwrap(), Some(t));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json[0]["id"], serde_json::json!(id.to_string()));
    assert_eq!(json[0]["name"], serde_json::json!("Spring Cup"));
    assert_eq!(json[0]["status"], serde_json::json!("NOT_STARTED"));
    assert!(json[0]["knockoutConfig"].is_object());

    reopened.delete_tournament(id).unwrap();
    assert!(store.get_tournaments().unwrap().is_empty());
    fs::remove_file(&path).unwrap();
}

#[test]
fn corrupt_json_file_is_reported_not_overwritten() {
    let path = temp_file();
    fs::write(&path, "{ not json").unwrap();
    let store = JsonFileStore::new(&path);

    assert!(matches!(store.get_tournaments(), Err(StorageError::Unavailable(_))));
    let mut t = spring_cup();
    assert!(matches!(
        persist(&store, &mut t),
        Err(StorageError::WriteFailed(_))
    ));
    assert!(t.id.is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    fs::remove_file(&path).unwrap();
}

#[test]
fn concurrent_updates_keep_every_participant() {
    let shared = SharedStore::new(Box::new(MemoryStore::new()));
    let mut t = spring_cup();
    t.config.number_of_participants = 0;
    let id = shared.save(&mut t).unwrap();

    std::thread::scope(|scope| {
        for i in 0..16 {
            let shared = &shared;
            scope.spawn(move || {
                shared
                    .update(id, |t| t.add_participant(format!("Team {i}")).map(|_| ()))
                    .unwrap()
                    .unwrap();
            });
        }
    });

    let stored = load(shared.store(), id).unwrap().unwrap();
    assert_eq!(stored.participants.len(), 16);
}

#[test]
fn concurrent_updates_respect_capacity() {
    let shared = SharedStore::new(Box::new(MemoryStore::new()));
    let mut t = spring_cup();
    t.config.number_of_participants = 4;
    let id = shared.save(&mut t).unwrap();

    let rejected = std::sync::atomic::AtomicUsize::new(0);
    std::thread::scope(|scope| {
        for i in 0..10 {
            let (shared, rejected) = (&shared, &rejected);
            scope.spawn(move || {
                match shared.update(id, |t| t.add_participant(format!("Team {i}")).map(|_| ())) {
                    Ok(Some(_)) => {}
                    Err(UpdateError::Rejected(TournamentError::TournamentFull { capacity: 4 })) => {
                        rejected.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                    }
                    other => panic!("unexpected update result: {other:?}"),
                }
            });
        }
    });

    assert_eq!(rejected.into_inner(), 6);
    assert_eq!(load(shared.store(), id).unwrap().unwrap().participants.len(), 4);
}

#[test]
fn rejected_or_unknown_updates_write_nothing() {
    let shared = SharedStore::new(Box::new(MemoryStore::new()));
    let mut t = spring_cup();
    t.add_participant("Alpha").unwrap();
    let id = shared.save(&mut t).unwrap();

    let result = shared.update(id, |t| t.add_participant("alpha").map(|_| ()));
    assert!(matches!(
        result,
        Err(UpdateError::Rejected(TournamentError::DuplicateParticipantName))
    ));
    assert_eq!(load(shared.store(), id).unwrap(), Some(t));

    let missing = shared.update(Uuid::new_v4(), |_| Ok::<(), TournamentError>(()));
    assert!(matches!(missing, Ok(None)));

    shared.delete(id).unwrap();
    assert!(shared.store().get_tournaments().unwrap().is_empty());
}

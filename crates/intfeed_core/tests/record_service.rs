use intfeed_core::db::{open_db, open_db_in_memory};
use intfeed_core::{
    RecordService, RecordServiceError, RecordValidationError, SqliteRecordRepository,
};
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn create_duplicate_and_distinct_key_scenario() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let ann_30 = service.create(Some("Ann"), Some("30")).unwrap();
    assert_eq!(ann_30.name, "Ann");
    assert_eq!(ann_30.age, 30);

    let duplicate = service.create(Some("Ann"), Some("30")).unwrap_err();
    assert!(matches!(duplicate, RecordServiceError::Duplicate));
    assert_eq!(service.count().unwrap(), 1);

    let ann_31 = service.create(Some("Ann"), Some("31")).unwrap();

    let listed = service.list().unwrap();
    assert_eq!(listed, vec![ann_30, ann_31]);
}

#[test]
fn create_then_list_contains_exactly_one_match() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    for (name, age) in [("Ann", "30"), ("Bob", "41"), ("Cleo", "7")] {
        service.create(Some(name), Some(age)).unwrap();
    }

    let listed = service.list().unwrap();
    let matches = listed
        .iter()
        .filter(|record| record.name == "Bob" && record.age == 41)
        .count();
    assert_eq!(matches, 1);
}

#[test]
fn create_with_missing_age_is_rejected_without_persisting() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let err = service.create(Some("Ann"), None).unwrap_err();
    assert!(matches!(
        err,
        RecordServiceError::Validation(RecordValidationError::MissingAge)
    ));

    let err = service.create(Some(""), Some("30")).unwrap_err();
    assert!(matches!(
        err,
        RecordServiceError::Validation(RecordValidationError::BlankName)
    ));

    assert!(service.list().unwrap().is_empty());
}

#[test]
fn create_with_nul_in_name_is_a_validation_error() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    let err = service.create(Some("\0Ann"), Some("30")).unwrap_err();
    assert!(matches!(
        err,
        RecordServiceError::Validation(RecordValidationError::NulInName)
    ));
    assert_eq!(service.count().unwrap(), 0);
}

#[test]
fn list_on_empty_store_is_empty_not_error() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());

    assert!(service.list().unwrap().is_empty());
}

#[test]
fn store_failure_maps_to_store_unavailable() {
    let conn = open_db_in_memory().unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    conn.execute_batch("DROP TABLE records;").unwrap();

    assert!(matches!(
        service.list().unwrap_err(),
        RecordServiceError::StoreUnavailable(_)
    ));
    assert!(matches!(
        service.create(Some("Ann"), Some("30")).unwrap_err(),
        RecordServiceError::StoreUnavailable(_)
    ));
}

#[test]
fn concurrent_creates_with_same_key_yield_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db");
    // Bootstrap once so both racers start from a migrated file.
    drop(open_db(&path).unwrap());

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            thread::spawn(move || create_after_barrier(&path, &barrier))
        })
        .collect();

    let outcomes: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().expect("racer thread panicked"))
        .collect();

    let successes = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(RecordServiceError::Duplicate)))
        .count();
    assert_eq!(successes, 1);
    assert_eq!(duplicates, 1);

    let conn = open_db(&path).unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    assert_eq!(service.count().unwrap(), 1);
}

fn create_after_barrier(
    path: &Path,
    barrier: &Barrier,
) -> Result<intfeed_core::Record, RecordServiceError> {
    let conn = open_db(path).unwrap();
    let service = RecordService::new(SqliteRecordRepository::try_new(&conn).unwrap());
    barrier.wait();
    service.create(Some("Ann"), Some("30"))
}

use std::time::{SystemTime, UNIX_EPOCH};

use wayfarer_core::models::CoreErrorKind;
use wayfarer_core::persistence::{DocumentKey, DocumentStore, MigrationStore};
use wayfarer_core::sqlite::{SqliteStore, current_schema_version};

fn test_db_path(test_name: &str) -> std::path::PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("wayfarer-{test_name}-{nanos}.sqlite3"))
}

#[test]
fn planned_migrations_include_versions_after_requested_version() {
    let store = SqliteStore::new(test_db_path("planned"));
    let planned = store.planned_migrations(0);

    assert!(!planned.is_empty());
    assert_eq!(planned[0].version, 1);
    assert!(store.planned_migrations(current_schema_version()).is_empty());
}

#[test]
fn fresh_database_reports_version_zero() {
    let store = SqliteStore::new(test_db_path("fresh-version"));
    assert_eq!(store.current_version().unwrap(), 0);
}

#[test]
fn migrate_to_latest_reaches_current_schema_version() {
    let store = SqliteStore::new(test_db_path("migrate-latest"));
    store.migrate_to_latest().unwrap();
    assert_eq!(store.current_version().unwrap(), current_schema_version());
}

#[test]
fn reapplying_the_current_version_is_idempotent() {
    let store = SqliteStore::new(test_db_path("idempotent"));
    store.migrate_to_latest().unwrap();
    store.migrate_to_latest().unwrap();
    assert_eq!(store.current_version().unwrap(), current_schema_version());
}

#[test]
fn undefined_migration_target_fails_with_storage_error() {
    let store = SqliteStore::new(test_db_path("undefined-target"));
    let error = store
        .apply_migration(current_schema_version() + 1)
        .unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::StorageFailure);
}

#[test]
fn migrating_down_to_zero_drops_the_documents_table() {
    let store = SqliteStore::new(test_db_path("down"));
    store.migrate_to_latest().unwrap();
    store
        .write_document(DocumentKey::Favorites, "[]")
        .unwrap();

    store.apply_migration(0).unwrap();
    assert_eq!(store.current_version().unwrap(), 0);

    // Document operations refuse to run against an uninitialized schema.
    let error = store.read_document(DocumentKey::Favorites).unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::StorageFailure);
}

#[test]
fn document_operations_require_migrations_first() {
    let store = SqliteStore::new(test_db_path("no-schema"));
    let error = store.write_document(DocumentKey::Favorites, "[]").unwrap_err();
    assert_eq!(error.kind, CoreErrorKind::StorageFailure);
    assert!(error.message.contains("not initialized"));
}

#[test]
fn write_read_round_trip() {
    let store = SqliteStore::new(test_db_path("round-trip"));
    store.migrate_to_latest().unwrap();

    assert_eq!(store.read_document(DocumentKey::Preferences).unwrap(), None);
    store
        .write_document(DocumentKey::Preferences, r#"{"theme":"dark"}"#)
        .unwrap();
    assert_eq!(
        store.read_document(DocumentKey::Preferences).unwrap(),
        Some(r#"{"theme":"dark"}"#.to_owned())
    );
}

#[test]
fn writes_to_the_same_key_overwrite() {
    let store = SqliteStore::new(test_db_path("overwrite"));
    store.migrate_to_latest().unwrap();

    store.write_document(DocumentKey::Favorites, "[1]").unwrap();
    store.write_document(DocumentKey::Favorites, "[1,2]").unwrap();
    assert_eq!(
        store.read_document(DocumentKey::Favorites).unwrap(),
        Some("[1,2]".to_owned())
    );
}

#[test]
fn keys_are_independent() {
    let store = SqliteStore::new(test_db_path("independent"));
    store.migrate_to_latest().unwrap();

    store.write_document(DocumentKey::Favorites, "[]").unwrap();
    assert_eq!(
        store.read_document(DocumentKey::SearchHistory).unwrap(),
        None
    );
}

#[test]
fn remove_reports_whether_a_document_existed() {
    let store = SqliteStore::new(test_db_path("remove"));
    store.migrate_to_latest().unwrap();

    assert!(!store.remove_document(DocumentKey::Favorites).unwrap());
    store.write_document(DocumentKey::Favorites, "[]").unwrap();
    assert!(store.remove_document(DocumentKey::Favorites).unwrap());
    assert_eq!(store.read_document(DocumentKey::Favorites).unwrap(), None);
}

#[test]
fn document_len_matches_stored_body() {
    let store = SqliteStore::new(test_db_path("len"));
    store.migrate_to_latest().unwrap();

    assert_eq!(store.document_len(DocumentKey::Itineraries).unwrap(), 0);
    store
        .write_document(DocumentKey::Itineraries, "[{}]")
        .unwrap();
    assert_eq!(store.document_len(DocumentKey::Itineraries).unwrap(), 4);
}

#[test]
fn store_survives_reopening_the_same_file() {
    let path = test_db_path("reopen");
    {
        let store = SqliteStore::new(&path);
        store.migrate_to_latest().unwrap();
        store.write_document(DocumentKey::Favorites, "[7]").unwrap();
    }

    let reopened = SqliteStore::new(&path);
    assert_eq!(reopened.current_version().unwrap(), current_schema_version());
    assert_eq!(
        reopened.read_document(DocumentKey::Favorites).unwrap(),
        Some("[7]".to_owned())
    );
}

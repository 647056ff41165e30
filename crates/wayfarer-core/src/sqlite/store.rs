use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OptionalExtension, params};

use crate::models::CoreError;
use crate::persistence::{DocumentKey, DocumentStore, MigrationStore, PersistenceResult};
use crate::sqlite::migrations::{SqliteMigration, current_schema_version, migration, migrations};

const MIGRATIONS_TABLE: &str = "wayfarer_schema_migrations";

/// Durable document store over a single SQLite file. Connections are opened
/// per operation; the browser-profile-sized workload here does not justify
/// pooling.
pub struct SqliteStore {
    database_path: PathBuf,
}

impl SqliteStore {
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
        }
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    pub fn planned_migrations(&self, from_version: i64) -> Vec<&'static SqliteMigration> {
        migrations()
            .iter()
            .filter(|entry| entry.version > from_version)
            .collect()
    }

    pub fn migrate_to_latest(&self) -> PersistenceResult<()> {
        self.apply_migration(current_schema_version())
    }

    fn with_connection<T>(
        &self,
        operation_name: &str,
        operation: impl FnOnce(&mut Connection) -> rusqlite::Result<T>,
    ) -> PersistenceResult<T> {
        let mut connection = open_connection(&self.database_path)
            .map_err(|error| storage_error(operation_name, error))?;
        operation(&mut connection).map_err(|error| storage_error(operation_name, error))
    }
}

impl MigrationStore for SqliteStore {
    fn current_version(&self) -> PersistenceResult<i64> {
        self.with_connection("current_version", |connection| {
            ensure_migrations_table(connection)?;
            read_current_version(connection)
        })
    }

    fn apply_migration(&self, target_version: i64) -> PersistenceResult<()> {
        if target_version < 0 || target_version > current_schema_version() {
            return Err(storage_error_text(
                "apply_migration",
                format!("invalid migration target version '{target_version}'"),
            ));
        }

        if target_version > 0 && migration(target_version).is_none() {
            return Err(storage_error_text(
                "apply_migration",
                format!("migration version '{target_version}' is not defined"),
            ));
        }

        self.with_connection("apply_migration", |connection| {
            ensure_migrations_table(connection)?;
            let current_version = read_current_version(connection)?;

            if target_version == current_version {
                // Re-apply all DDL so a recorded version with missing tables
                // (interrupted write, restored backup) heals itself. The DDL
                // is CREATE ... IF NOT EXISTS, so this is idempotent.
                for version in 1..=target_version {
                    if let Some(entry) = migration(version) {
                        connection.execute_batch(entry.up_sql)?;
                    }
                }
                return Ok(());
            }

            if target_version > current_version {
                for version in (current_version + 1)..=target_version {
                    if let Some(entry) = migration(version) {
                        apply_up_migration(connection, entry)?;
                    }
                }
            } else {
                for version in ((target_version + 1)..=current_version).rev() {
                    if let Some(entry) = migration(version) {
                        apply_down_migration(connection, entry)?;
                    }
                }
            }

            Ok(())
        })
    }
}

impl DocumentStore for SqliteStore {
    fn read_document(&self, key: DocumentKey) -> PersistenceResult<Option<String>> {
        self.with_connection("read_document", |connection| {
            ensure_schema_ready(connection)?;
            connection
                .query_row(
                    "SELECT body FROM stored_documents WHERE doc_key = ?1",
                    [key.as_str()],
                    |row| row.get(0),
                )
                .optional()
        })
    }

    fn write_document(&self, key: DocumentKey, body: &str) -> PersistenceResult<()> {
        self.with_connection("write_document", |connection| {
            ensure_schema_ready(connection)?;
            connection.execute(
                "
INSERT INTO stored_documents (doc_key, body, updated_at_unix)
VALUES (?1, ?2, strftime('%s', 'now'))
ON CONFLICT(doc_key) DO UPDATE SET
    body = excluded.body,
    updated_at_unix = excluded.updated_at_unix
",
                params![key.as_str(), body],
            )?;
            Ok(())
        })
    }

    fn remove_document(&self, key: DocumentKey) -> PersistenceResult<bool> {
        self.with_connection("remove_document", |connection| {
            ensure_schema_ready(connection)?;
            let removed = connection.execute(
                "DELETE FROM stored_documents WHERE doc_key = ?1",
                [key.as_str()],
            )?;
            Ok(removed > 0)
        })
    }

    fn document_len(&self, key: DocumentKey) -> PersistenceResult<usize> {
        self.with_connection("document_len", |connection| {
            ensure_schema_ready(connection)?;
            let length: Option<i64> = connection
                .query_row(
                    "SELECT LENGTH(body) FROM stored_documents WHERE doc_key = ?1",
                    [key.as_str()],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(usize::try_from(length.unwrap_or(0)).unwrap_or(0))
        })
    }
}

fn open_connection(database_path: &Path) -> rusqlite::Result<Connection> {
    if let Some(parent) = database_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|error| rusqlite::Error::ToSqlConversionFailure(Box::new(error)))?;
    }
    Connection::open(database_path)
}

fn ensure_migrations_table(connection: &Connection) -> rusqlite::Result<()> {
    connection.execute_batch(&format!(
        "
CREATE TABLE IF NOT EXISTS {MIGRATIONS_TABLE} (
    version INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    applied_at_unix INTEGER NOT NULL
);
"
    ))?;
    Ok(())
}

fn ensure_schema_ready(connection: &Connection) -> rusqlite::Result<()> {
    ensure_migrations_table(connection)?;
    let version = read_current_version(connection)?;
    if version <= 0 {
        return Err(storage_error_sqlite(
            "database schema is not initialized; apply migrations before document operations",
        ));
    }
    Ok(())
}

fn read_current_version(connection: &Connection) -> rusqlite::Result<i64> {
    connection.query_row(
        &format!("SELECT COALESCE(MAX(version), 0) FROM {MIGRATIONS_TABLE}"),
        [],
        |row| row.get(0),
    )
}

fn apply_up_migration(
    connection: &mut Connection,
    migration: &SqliteMigration,
) -> rusqlite::Result<()> {
    let transaction = connection.transaction()?;
    transaction.execute_batch(migration.up_sql)?;
    transaction.execute(
        &format!(
            "INSERT INTO {MIGRATIONS_TABLE} (version, name, applied_at_unix)
             VALUES (?1, ?2, strftime('%s', 'now'))"
        ),
        (migration.version, migration.name),
    )?;
    transaction.commit()?;
    Ok(())
}

fn apply_down_migration(
    connection: &mut Connection,
    migration: &SqliteMigration,
) -> rusqlite::Result<()> {
    let transaction = connection.transaction()?;
    transaction.execute_batch(migration.down_sql)?;
    transaction.execute(
        &format!("DELETE FROM {MIGRATIONS_TABLE} WHERE version = ?1"),
        [migration.version],
    )?;
    transaction.commit()?;
    Ok(())
}

fn storage_error(operation: &str, error: rusqlite::Error) -> CoreError {
    storage_error_text(operation, error.to_string())
}

fn storage_error_sqlite(message: &str) -> rusqlite::Error {
    rusqlite::Error::ToSqlConversionFailure(Box::new(std::io::Error::other(message.to_string())))
}

fn storage_error_text(operation: &str, message: impl AsRef<str>) -> CoreError {
    CoreError::storage(format!(
        "sqlite store '{operation}' failed: {}",
        message.as_ref()
    ))
}

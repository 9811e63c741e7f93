/// Database migration management
///
/// Schema changes are an ordered list of SQL batches. Each batch runs in its
/// own transaction together with the version bump, so a failed step leaves
/// the database at the previous version.

use rusqlite::{params, Connection, OptionalExtension};
use crate::storage::StorageError;

/// One forward schema step
struct Migration {
    version: i32,
    description: &'static str,
    sql: &'static str,
}

/// All migrations, oldest first
///
/// `start_date` is never stored: it is always derived from the log.
const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "habits and their completion logs",
    sql: "
        CREATE TABLE IF NOT EXISTS habits (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            frequency TEXT NOT NULL,
            reminder_time TEXT NOT NULL,
            latest_streak INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS habit_logs (
            habit_id TEXT NOT NULL,
            logged_on TEXT NOT NULL,
            PRIMARY KEY (habit_id, logged_on),
            FOREIGN KEY (habit_id) REFERENCES habits (id) ON DELETE CASCADE
        );
        CREATE INDEX IF NOT EXISTS idx_habits_created_at ON habits (created_at);
    ",
}];

/// The schema version this build writes
fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Bring the schema up to date
///
/// Refuses to open a database written by a newer build.
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY)")?;

    let current = get_current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(StorageError::Migration(format!(
            "Database schema version {} is newer than supported version {}",
            current, latest
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        apply(conn, migration)?;
    }

    Ok(())
}

fn apply(conn: &Connection, migration: &Migration) -> Result<(), StorageError> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(migration.sql).map_err(|e| {
        StorageError::Migration(format!("v{} ({}): {}", migration.version, migration.description, e))
    })?;
    set_version(&tx, migration.version)?;
    tx.commit()?;

    tracing::info!("Applied migration v{}: {}", migration.version, migration.description);
    Ok(())
}

/// Version recorded in the database, 0 when nothing has been applied
fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    let version = conn
        .query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten()
        .unwrap_or(0);

    Ok(version)
}

fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", params![version])?;
    Ok(())
}

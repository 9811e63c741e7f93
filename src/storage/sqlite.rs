/// SQLite implementation of the habit storage interface
///
/// A habit lives in two tables: one row in `habits` for its fields and
/// streak values, one row per logged date in `habit_logs`. Every write goes
/// through an immediate transaction so a habit is never half-saved.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use crate::domain::{DomainError, Frequency, Habit, HabitId};
use crate::storage::{migrations, HabitStorage, StorageError};

/// SQLite-based storage implementation
///
/// This struct holds a connection to the SQLite database and implements
/// all the storage operations defined in the HabitStorage trait.
pub struct SqliteStorage {
    conn: Connection,
}

/// Columns of a `habits` row before the frequency token is checked
struct HabitRow {
    id: String,
    name: String,
    description: String,
    frequency: String,
    reminder_time: String,
    latest_streak: u32,
    longest_streak: u32,
    created_at: DateTime<Utc>,
}

const SELECT_HABIT: &str = "SELECT id, name, description, frequency, reminder_time,
        latest_streak, longest_streak, created_at
     FROM habits";

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        let db_path = db_path.as_ref();
        let conn = Connection::open(db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::with_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, StorageError> {
        conn.execute_batch("PRAGMA foreign_keys = ON")
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        Ok(Self { conn })
    }

    /// Start a write transaction that takes the database lock up front
    fn begin(&self) -> Result<Transaction<'_>, StorageError> {
        Ok(Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?)
    }

    fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<HabitRow> {
        Ok(HabitRow {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            frequency: row.get(3)?,
            reminder_time: row.get(4)?,
            latest_streak: row.get(5)?,
            longest_streak: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    /// Turn a row plus its log into a normalized habit
    fn hydrate(conn: &Connection, row: HabitRow) -> Result<Habit, StorageError> {
        let corrupt = |message: String| StorageError::Corrupt {
            habit_id: row.id.clone(),
            message,
        };

        let id = HabitId::parse(&row.id).map_err(|e| corrupt(e.to_string()))?;
        let frequency: Frequency = row.frequency.parse().map_err(|e: DomainError| corrupt(e.to_string()))?;
        let logs = Self::load_logs(conn, &id)?;

        Ok(Habit::from_existing(
            id,
            row.name,
            row.description,
            frequency,
            row.reminder_time,
            logs,
            row.latest_streak,
            row.longest_streak,
            row.created_at,
        ))
    }

    fn load_logs(conn: &Connection, habit_id: &HabitId) -> Result<Vec<NaiveDate>, StorageError> {
        let mut stmt = conn.prepare(
            "SELECT logged_on FROM habit_logs WHERE habit_id = ?1 ORDER BY logged_on DESC"
        )?;
        let logs = stmt
            .query_map(params![habit_id.as_str()], |row| row.get::<_, NaiveDate>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(logs)
    }

    fn load_habit(conn: &Connection, habit_id: &HabitId) -> Result<Habit, StorageError> {
        let row = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_HABIT),
                params![habit_id.as_str()],
                Self::read_row,
            )
            .optional()?
            .ok_or_else(|| StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            })?;

        Self::hydrate(conn, row)
    }

    /// Overwrite the fields and log of an existing habit
    fn write_habit(conn: &Connection, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = conn.execute(
            "UPDATE habits SET
                name = ?2,
                description = ?3,
                frequency = ?4,
                reminder_time = ?5,
                latest_streak = ?6,
                longest_streak = ?7
             WHERE id = ?1",
            params![
                habit.id.as_str(),
                habit.name,
                habit.description,
                habit.frequency.token(),
                habit.reminder_time,
                habit.latest_streak,
                habit.longest_streak,
            ],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit.id.to_string(),
            });
        }

        Self::write_logs(conn, habit)
    }

    fn write_logs(conn: &Connection, habit: &Habit) -> Result<(), StorageError> {
        conn.execute(
            "DELETE FROM habit_logs WHERE habit_id = ?1",
            params![habit.id.as_str()],
        )?;

        let mut insert = conn.prepare(
            "INSERT OR IGNORE INTO habit_logs (habit_id, logged_on) VALUES (?1, ?2)"
        )?;
        for date in &habit.logs {
            insert.execute(params![habit.id.as_str(), date])?;
        }
        Ok(())
    }
}

impl HabitStorage for SqliteStorage {
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.begin()?;

        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM habits WHERE id = ?1)",
            params![habit.id.as_str()],
            |row| row.get(0),
        )?;
        if exists {
            return Err(StorageError::DuplicateHabit {
                habit_id: habit.id.to_string(),
            });
        }

        tx.execute(
            "INSERT INTO habits (
                id, name, description, frequency, reminder_time,
                latest_streak, longest_streak, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                habit.id.as_str(),
                habit.name,
                habit.description,
                habit.frequency.token(),
                habit.reminder_time,
                habit.latest_streak,
                habit.longest_streak,
                habit.created_at,
            ],
        )?;
        Self::write_logs(&tx, habit)?;
        tx.commit()?;

        tracing::debug!("Created habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError> {
        Self::load_habit(&self.conn, habit_id)
    }

    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError> {
        let tx = self.begin()?;
        Self::write_habit(&tx, habit)?;
        tx.commit()?;

        tracing::debug!("Updated habit: {} ({})", habit.name, habit.id);
        Ok(())
    }

    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError> {
        let tx = self.begin()?;
        tx.execute(
            "DELETE FROM habit_logs WHERE habit_id = ?1",
            params![habit_id.as_str()],
        )?;
        let rows_affected = tx.execute(
            "DELETE FROM habits WHERE id = ?1",
            params![habit_id.as_str()],
        )?;

        if rows_affected == 0 {
            return Err(StorageError::HabitNotFound {
                habit_id: habit_id.to_string(),
            });
        }
        tx.commit()?;

        tracing::debug!("Deleted habit: {}", habit_id);
        Ok(())
    }

    fn list_habits(&self) -> Result<Vec<Habit>, StorageError> {
        let mut stmt = self.conn.prepare(
            &format!("{} ORDER BY created_at DESC, id ASC", SELECT_HABIT)
        )?;
        let rows = stmt
            .query_map([], Self::read_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|row| Self::hydrate(&self.conn, row))
            .collect()
    }

    fn modify_habit(
        &self,
        habit_id: &HabitId,
        apply: &mut dyn FnMut(&mut Habit) -> Result<(), DomainError>,
    ) -> Result<Habit, StorageError> {
        let tx = self.begin()?;
        let mut habit = Self::load_habit(&tx, habit_id)?;

        // Dropping the transaction on error rolls it back
        apply(&mut habit)?;
        habit.normalize();

        Self::write_habit(&tx, &habit)?;
        tx.commit()?;

        tracing::debug!("Modified habit: {} ({})", habit.name, habit.id);
        Ok(habit)
    }
}

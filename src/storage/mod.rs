/// Storage layer for persisting habit data
///
/// This module handles all database operations using SQLite. Habits are
/// loaded and saved as whole documents keyed by their id; the domain layer
/// never talks to the database directly.

pub mod sqlite;
pub mod migrations;

// Re-export the main storage types
pub use sqlite::*;

use thiserror::Error;
use crate::domain::{DomainError, Habit, HabitId};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Corrupt record for habit {habit_id}: {message}")]
    Corrupt { habit_id: String, message: String },

    #[error("Habit not found: {habit_id}")]
    HabitNotFound { habit_id: String },

    #[error("Habit id already present: {habit_id}")]
    DuplicateHabit { habit_id: String },

    #[error("Update rejected: {0}")]
    Rejected(#[from] DomainError),

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for habits
///
/// Implementations own durability, date serialization and the atomicity of
/// [`HabitStorage::modify_habit`].
pub trait HabitStorage {
    /// Create a new habit; fails if the id is already taken
    fn create_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Get a habit by ID
    fn get_habit(&self, habit_id: &HabitId) -> Result<Habit, StorageError>;

    /// Replace an existing habit document
    fn update_habit(&self, habit: &Habit) -> Result<(), StorageError>;

    /// Delete a habit and its log
    fn delete_habit(&self, habit_id: &HabitId) -> Result<(), StorageError>;

    /// List all habits, newest first
    fn list_habits(&self) -> Result<Vec<Habit>, StorageError>;

    /// Load, change and save one habit as a single atomic step
    ///
    /// If `apply` returns an error nothing is written and the error comes
    /// back as [`StorageError::Rejected`].
    fn modify_habit(
        &self,
        habit_id: &HabitId,
        apply: &mut dyn FnMut(&mut Habit) -> Result<(), DomainError>,
    ) -> Result<Habit, StorageError>;
}

/// Domain module containing core business logic and data types
///
/// This module defines the Habit entity, the frequency rule, the streak
/// engine and the tracking validator. Nothing in here touches storage.
/// Tracking rules take the current date as an argument; only `Habit::new`
/// reads the clock, to stamp `created_at`.

pub mod habit;
pub mod streak;
pub mod tracking;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use streak::*;
pub use tracking::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid habit ID: {0}")]
    InvalidHabitId(String),

    #[error("Invalid habit name: {0}")]
    InvalidHabitName(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

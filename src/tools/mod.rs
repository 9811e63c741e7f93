/// MCP tools for habit management
///
/// This module contains all the MCP tools that external clients can call to
/// interact with the habit tracker. Each tool takes a storage handle plus a
/// params struct and returns a serializable response.

pub mod create;
pub mod delete;
pub mod edit;
pub mod list;
pub mod track;
pub mod view;

// Re-export tool functions for easy access
pub use create::*;
pub use delete::*;
pub use edit::*;
pub use list::*;
pub use track::*;
pub use view::*;

use thiserror::Error;
use crate::domain::{DomainError, HabitId};
use crate::storage::StorageError;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Nothing to update")]
    NothingToUpdate,

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for ToolError {
    fn from(error: StorageError) -> Self {
        match error {
            // Refusals from inside an atomic modify are domain errors
            StorageError::Rejected(domain) => ToolError::Domain(domain),
            other => ToolError::Storage(other),
        }
    }
}

/// Parse a client-supplied habit id
fn parse_habit_id(raw: &str) -> Result<HabitId, ToolError> {
    Ok(HabitId::parse(raw)?)
}

/// Public library interface for the Habit Streak Tracker MCP server
///
/// This module exports the server, the domain rules (frequency, streak
/// engine, tracking validation) and the storage layer so they can be used
/// by other applications or tests.

use std::path::PathBuf;
use thiserror::Error;

// Internal modules
mod domain;
mod storage;
mod tools;
mod mcp;

// Re-export public modules and types
pub use domain::*;
pub use storage::{SqliteStorage, StorageError, HabitStorage};
pub use tools::*;
pub use mcp::McpServer;

/// Errors that can occur during server operation
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Database error: {0}")]
    Database(#[from] storage::StorageError),

    #[error("Domain validation error: {0}")]
    Domain(#[from] domain::DomainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Main habit tracker server that implements the MCP protocol
///
/// This server manages habit data through a SQLite database and exposes
/// tools for creating habits and tracking them day by day.
pub struct HabitTrackerServer {
    storage: SqliteStorage,
    engine: StreakEngine,
}

impl HabitTrackerServer {
    /// Create a new habit tracker server with the specified database path
    ///
    /// This will initialize the SQLite database with the required schema
    /// if it doesn't already exist.
    pub async fn new(db_path: PathBuf) -> Result<Self, ServerError> {
        tracing::info!("Initializing Habit Tracker server with database: {:?}", db_path);

        let storage = SqliteStorage::new(db_path)?;

        Ok(Self {
            storage,
            engine: StreakEngine::default(),
        })
    }

    /// Choose how full rescans treat the recorded longest streak
    pub fn with_streak_policy(mut self, policy: LongestStreakPolicy) -> Self {
        tracing::info!("Longest streak policy: {:?}", policy);
        self.engine = StreakEngine::new(policy);
        self
    }

    /// Run the MCP server, handling JSON-RPC requests over stdin/stdout
    ///
    /// This method will block until stdin is closed or an error occurs.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!("Starting MCP server...");

        let habits = self.storage.list_habits()?;
        tracing::info!("Server started successfully, found {} existing habits", habits.len());

        let mut mcp_server = McpServer::new(self);
        mcp_server.run().await?;

        Ok(())
    }

    /// Get a reference to the storage layer
    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    /// Get the streak engine used for tracking
    pub fn engine(&self) -> &StreakEngine {
        &self.engine
    }
}

/// Main entry point for the Habit Streak Tracker MCP server
///
/// This file sets up logging, parses command line arguments, and starts the MCP server.
/// The server listens for JSON-RPC requests over stdin/stdout following the MCP protocol.

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use habit_streak_tracker::{HabitTrackerServer, LongestStreakPolicy};

const DB_FILE: &str = "habits.db";

/// Directories to try for the database, most preferred first
fn candidate_dirs() -> Vec<PathBuf> {
    [
        dirs::home_dir().map(|p| p.join(".habit_streak_tracker")),
        dirs::data_dir().map(|p| p.join("habit_streak_tracker")),
        dirs::config_dir().map(|p| p.join("habit_streak_tracker")),
        std::env::current_dir().ok().map(|p| p.join(".habit_streak_tracker")),
    ]
    .into_iter()
    .flatten()
    .collect()
}

/// Create `dir` if needed and check that a file can be written inside it
fn is_writable_dir(dir: &Path) -> bool {
    let probe = dir.join(".write_probe");
    let writable = std::fs::create_dir_all(dir).is_ok() && std::fs::write(&probe, b"").is_ok();
    let _ = std::fs::remove_file(&probe);
    writable
}

/// Pick the first writable candidate, falling back to the temp directory
fn default_database_path() -> std::io::Result<PathBuf> {
    if let Some(dir) = candidate_dirs().into_iter().find(|dir| is_writable_dir(dir)) {
        return Ok(dir.join(DB_FILE));
    }

    let dir = std::env::temp_dir().join("habit_streak_tracker");
    std::fs::create_dir_all(&dir)?;
    warn!("No writable data directory found, using {}", dir.display());
    Ok(dir.join(DB_FILE))
}

/// Command line arguments for the Habit Streak Tracker MCP server
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// How undoing or back-filling a date treats the longest streak
    #[arg(long, value_enum, default_value = "rescan")]
    longest_streak: LongestStreakPolicy,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("habit_streak_tracker={}", log_level))
        .with_writer(std::io::stderr) // Send logs to stderr, not stdout
        .init();

    info!("Starting Habit Streak Tracker MCP server");

    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let server = HabitTrackerServer::new(db_path)
        .await?
        .with_streak_policy(args.longest_streak);

    // Handles JSON-RPC communication over stdin/stdout until stdin closes
    server.run().await?;

    info!("Habit Streak Tracker MCP server shutdown complete");
    Ok(())
}

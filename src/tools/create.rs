/// Tool for creating new habits
///
/// This module implements the habit_create MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{Frequency, Habit, HabitId};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for creating a new habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct CreateHabitParams {
    /// Unique id for the habit (e.g. "H001"); generated when omitted
    #[serde(default)]
    pub id: Option<String>,
    /// Name of the habit
    pub name: String,
    /// Description of the habit
    pub description: String,
    /// "Daily" or a day of the week ("Mon".."Sun")
    pub frequency: String,
    /// Reminder time, e.g. "06:30"
    pub reminder_time: String,
}

/// Response from creating a habit
#[derive(Debug, Serialize)]
pub struct CreateHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub message: String,
}

/// Create a new habit using the provided storage
pub fn create_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: CreateHabitParams,
) -> Result<CreateHabitResponse, ToolError> {
    let id = match params.id.as_deref() {
        Some(raw) => parse_habit_id(raw)?,
        None => HabitId::generate(),
    };
    let frequency: Frequency = params.frequency.parse()?;

    let habit = Habit::new(
        id,
        params.name,
        params.description,
        frequency,
        params.reminder_time,
    )?;

    storage.create_habit(&habit)?;
    tracing::info!("Created habit '{}' ({}), frequency {}", habit.name, habit.id, habit.frequency);

    Ok(CreateHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        message: format!("✅ New habit '{}' with id {} saved. Ready to start your streak!", habit.name, habit.id),
    })
}

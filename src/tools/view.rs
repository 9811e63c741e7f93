/// Tool for viewing a single habit
///
/// This module implements the habit_view MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for viewing a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ViewHabitParams {
    /// ID of the habit to show
    pub habit_id: String,
}

/// Response from viewing a habit
#[derive(Debug, Serialize)]
pub struct ViewHabitResponse {
    pub habit: Habit,
    pub message: String,
}

/// Load one habit, with its log and derived start date
pub fn view_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: ViewHabitParams,
) -> Result<ViewHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let habit = storage.get_habit(&habit_id)?;

    let message = format!(
        "🎯 {} ({})\n   📅 Frequency: {} | ⏰ Reminder: {}\n   🔥 Current streak: {} | Best: {}{}",
        habit.name,
        habit.id,
        habit.frequency,
        habit.reminder_time,
        habit.latest_streak,
        habit.longest_streak,
        match habit.start_date {
            Some(start) => format!("\n   Started: {} | Logged days: {}", start, habit.logs.len()),
            None => "\n   Not tracked yet".to_string(),
        }
    );

    Ok(ViewHabitResponse { habit, message })
}

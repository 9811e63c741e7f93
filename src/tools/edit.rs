/// Tool for editing existing habits
///
/// This module implements the habit_edit MCP tool. Only the descriptive
/// fields can change; the log and streaks are owned by habit_track.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Frequency;
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for editing an existing habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct EditHabitParams {
    /// ID of the habit to edit
    pub habit_id: String,
    /// New name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New frequency: "Daily" or "Mon".."Sun"
    pub frequency: Option<String>,
    /// New reminder time
    pub reminder_time: Option<String>,
}

impl EditHabitParams {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.frequency.is_none()
            && self.reminder_time.is_none()
    }
}

/// Response from editing a habit
#[derive(Debug, Serialize)]
pub struct EditHabitResponse {
    pub success: bool,
    pub message: String,
}

/// Apply a partial update to a habit
pub fn edit_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: EditHabitParams,
) -> Result<EditHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;

    if params.is_empty() {
        // Unknown ids are reported before empty updates
        storage.get_habit(&habit_id)?;
        return Err(ToolError::NothingToUpdate);
    }

    let frequency = params
        .frequency
        .as_deref()
        .map(str::parse::<Frequency>)
        .transpose()?;

    let EditHabitParams { name, description, reminder_time, .. } = params;
    let mut update = Some((name, description, reminder_time));

    let habit = storage.modify_habit(&habit_id, &mut |habit| {
        let (name, description, reminder_time) = update.take().unwrap_or_default();
        habit.update(name, description, frequency, reminder_time)
    })?;

    tracing::info!("Edited habit {}", habit.id);

    Ok(EditHabitResponse {
        success: true,
        message: format!("✅ Habit {} successfully edited", habit.id),
    })
}

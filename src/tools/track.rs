/// Tool for marking habits done or undone
///
/// This module implements the habit_track MCP tool. The whole
/// validate-edit-recompute step runs inside one storage transaction.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::{apply_tracking, StreakEngine, StreakPath, TrackAction, TrackOutcome};
use crate::storage::HabitStorage;
use crate::tools::{parse_habit_id, ToolError};

/// Parameters for tracking a habit
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TrackHabitParams {
    /// ID of the habit to track
    pub habit_id: String,
    /// Date to track (YYYY-MM-DD), defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// true marks the date done, false marks it undone (default true)
    #[serde(default)]
    pub done: Option<bool>,
}

/// Response from tracking a habit
#[derive(Debug, Serialize)]
pub struct TrackHabitResponse {
    pub success: bool,
    pub habit_id: String,
    pub date: NaiveDate,
    pub latest_streak: u32,
    pub longest_streak: u32,
    pub start_date: Option<NaiveDate>,
    pub path: StreakPath,
    pub message: String,
}

/// Mark a date done or undone and update the habit's streaks
///
/// `today` is the caller's current calendar date; it bounds future dates
/// and fills in a missing `date`.
pub fn track_habit<S: HabitStorage + ?Sized>(
    storage: &S,
    params: TrackHabitParams,
    today: NaiveDate,
    engine: &StreakEngine,
) -> Result<TrackHabitResponse, ToolError> {
    let habit_id = parse_habit_id(&params.habit_id)?;
    let date = params.date.unwrap_or(today);
    let action = TrackAction::from(params.done.unwrap_or(true));

    let mut outcome: Option<TrackOutcome> = None;
    let habit = storage.modify_habit(&habit_id, &mut |habit| {
        outcome = Some(apply_tracking(habit, date, action, today, engine)?);
        Ok(())
    })?;

    let outcome = outcome.ok_or_else(|| {
        ToolError::InvalidInput(format!("Tracking for habit {} did not run", habit_id))
    })?;

    let verb = match action {
        TrackAction::Done => "Marked done",
        TrackAction::Undone => "Unmarked",
    };
    tracing::info!(
        "{} habit {} on {}: streak {} (best {})",
        verb, habit.id, date, outcome.streak.latest, outcome.streak.longest
    );

    Ok(TrackHabitResponse {
        success: true,
        habit_id: habit.id.to_string(),
        date,
        latest_streak: habit.latest_streak,
        longest_streak: habit.longest_streak,
        start_date: habit.start_date,
        path: outcome.path,
        message: format!(
            "🔥 {} {} for '{}'. Current streak: {} | Longest: {}\n{}",
            verb,
            date,
            habit.name,
            outcome.streak.latest,
            outcome.streak.longest,
            outcome.streak.motivational_message()
        ),
    })
}

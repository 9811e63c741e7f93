/// Tool for listing all habits
///
/// This module implements the habit_list MCP tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::domain::Habit;
use crate::storage::HabitStorage;
use crate::tools::ToolError;

/// Parameters for listing habits (none yet)
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListHabitsParams {}

/// Summary statistics for all habits
#[derive(Debug, Serialize)]
pub struct HabitListSummary {
    pub total_habits: u32,
    /// Habits whose current streak is above zero
    pub habits_on_streak: u32,
    pub best_longest_streak: u32,
}

/// Response from listing habits
#[derive(Debug, Serialize)]
pub struct ListHabitsResponse {
    pub habits: Vec<Habit>,
    pub summary: HabitListSummary,
}

/// List every habit, newest first
pub fn list_habits<S: HabitStorage + ?Sized>(
    storage: &S,
    _params: ListHabitsParams,
) -> Result<ListHabitsResponse, ToolError> {
    let habits = storage.list_habits()?;

    let summary = HabitListSummary {
        total_habits: habits.len() as u32,
        habits_on_streak: habits.iter().filter(|h| h.latest_streak > 0).count() as u32,
        best_longest_streak: habits.iter().map(|h| h.longest_streak).max().unwrap_or(0),
    };

    Ok(ListHabitsResponse { habits, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Frequency, HabitId};
    use crate::storage::SqliteStorage;

    #[test]
    fn test_list_summary() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        assert_eq!(list_habits(&storage, ListHabitsParams::default()).unwrap().summary.total_habits, 0);

        for (id, latest, longest) in [("H001", 0, 4), ("H002", 2, 2)] {
            let mut habit = Habit::new(
                HabitId::parse(id).unwrap(),
                "Habit".to_string(),
                String::new(),
                Frequency::Daily,
                "08:00".to_string(),
            ).unwrap();
            habit.latest_streak = latest;
            habit.longest_streak = longest;
            storage.create_habit(&habit).unwrap();
        }

        let response = list_habits(&storage, ListHabitsParams::default()).unwrap();
        assert_eq!(response.summary.total_habits, 2);
        assert_eq!(response.summary.habits_on_streak, 1);
        assert_eq!(response.summary.best_longest_streak, 4);
    }
}

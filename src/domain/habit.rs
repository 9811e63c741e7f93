/// Habit entity and related functionality
///
/// This module defines the core Habit struct, the field validation rules it
/// enforces, and the normalization that keeps its log canonical.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{DomainError, Frequency, HabitId, Streak};

/// A habit represents something the user wants to do regularly
///
/// Besides the descriptive fields, a habit carries its completion log and the
/// streak values derived from it. `start_date` is never authoritative: it is
/// re-derived from the log every time the habit is loaded or changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for this habit
    pub id: HabitId,
    /// Display name (e.g., "Morning Walk")
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Daily, or a fixed weekday
    pub frequency: Frequency,
    /// Opaque reminder string (e.g. "06:30"), stored as given
    pub reminder_time: String,
    /// Oldest logged date, absent while the log is empty
    pub start_date: Option<NaiveDate>,
    /// Dates the habit was done, most recent first, no duplicates
    pub logs: Vec<NaiveDate>,
    /// Length of the run ending at the most recent log entry
    pub latest_streak: u32,
    /// Longest run recorded for this habit
    pub longest_streak: u32,
    /// When this habit was created
    pub created_at: DateTime<Utc>,
}

impl Habit {
    /// Create a new habit with validation
    ///
    /// New habits start with an empty log and zero streaks.
    pub fn new(
        id: HabitId,
        name: String,
        description: String,
        frequency: Frequency,
        reminder_time: String,
    ) -> Result<Self, DomainError> {
        Self::validate_name(&name)?;
        Self::validate_description(&description)?;
        Self::validate_reminder_time(&reminder_time)?;

        Ok(Self {
            id,
            name,
            description,
            frequency,
            reminder_time,
            start_date: None,
            logs: Vec::new(),
            latest_streak: 0,
            longest_streak: 0,
            created_at: Utc::now(),
        })
    }

    /// Create a habit from existing data (used when loading from database)
    ///
    /// Field validation is skipped, but the log is always normalized so the
    /// streak engine sees canonical data.
    #[allow(clippy::too_many_arguments)]
    pub fn from_existing(
        id: HabitId,
        name: String,
        description: String,
        frequency: Frequency,
        reminder_time: String,
        logs: Vec<NaiveDate>,
        latest_streak: u32,
        longest_streak: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut habit = Self {
            id,
            name,
            description,
            frequency,
            reminder_time,
            start_date: None,
            logs,
            latest_streak,
            longest_streak,
            created_at,
        };
        habit.normalize();
        habit
    }

    /// Update the habit's descriptive properties with validation
    ///
    /// Logs and streaks are left untouched, even when the frequency changes.
    pub fn update(
        &mut self,
        name: Option<String>,
        description: Option<String>,
        frequency: Option<Frequency>,
        reminder_time: Option<String>,
    ) -> Result<(), DomainError> {
        // Validate everything before applying anything
        if let Some(ref new_name) = name {
            Self::validate_name(new_name)?;
        }
        if let Some(ref new_desc) = description {
            Self::validate_description(new_desc)?;
        }
        if let Some(ref new_reminder) = reminder_time {
            Self::validate_reminder_time(new_reminder)?;
        }

        if let Some(new_name) = name {
            self.name = new_name;
        }
        if let Some(new_description) = description {
            self.description = new_description;
        }
        if let Some(new_frequency) = frequency {
            self.frequency = new_frequency;
        }
        if let Some(new_reminder) = reminder_time {
            self.reminder_time = new_reminder;
        }

        self.normalize();
        Ok(())
    }

    /// Sort the log most-recent-first, drop duplicates, re-derive the start date
    pub fn normalize(&mut self) {
        normalize_logs(&mut self.logs);
        self.start_date = derive_start_date(&self.logs);
    }

    /// Whether the habit was marked done on this date
    pub fn is_logged(&self, date: NaiveDate) -> bool {
        // `logs` is public and may be out of order until the next normalize
        self.logs.contains(&date)
    }

    /// Current streak values as a pair
    pub fn streak(&self) -> Streak {
        Streak {
            longest: self.longest_streak,
            latest: self.latest_streak,
        }
    }

    // Validation helper methods

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<(), DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be empty".to_string()
            ));
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::InvalidHabitName(
                "Habit name cannot be longer than 100 characters".to_string()
            ));
        }

        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), DomainError> {
        if description.chars().count() > 500 {
            return Err(DomainError::Validation {
                message: "Description cannot be longer than 500 characters".to_string()
            });
        }
        Ok(())
    }

    /// The reminder is opaque; only presence and length are checked
    fn validate_reminder_time(reminder_time: &str) -> Result<(), DomainError> {
        let trimmed = reminder_time.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Reminder time cannot be empty".to_string()
            });
        }
        if trimmed.chars().count() > 20 {
            return Err(DomainError::Validation {
                message: "Reminder time cannot be longer than 20 characters".to_string()
            });
        }
        Ok(())
    }
}

/// Put a log into canonical form: descending, without duplicates
pub fn normalize_logs(logs: &mut Vec<NaiveDate>) {
    logs.sort_unstable_by(|a, b| b.cmp(a));
    logs.dedup();
}

/// The oldest date in the log, or `None` for an empty log
pub fn derive_start_date(logs: &[NaiveDate]) -> Option<NaiveDate> {
    logs.iter().min().copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn morning_walk() -> Habit {
        Habit::new(
            HabitId::parse("H001").unwrap(),
            "Morning Walk".to_string(),
            "Walk for at least 20 minutes every morning.".to_string(),
            Frequency::Daily,
            "06:30".to_string(),
        ).unwrap()
    }

    #[test]
    fn test_create_valid_habit() {
        let habit = morning_walk();

        assert_eq!(habit.name, "Morning Walk");
        assert!(habit.logs.is_empty());
        assert_eq!(habit.start_date, None);
        assert_eq!(habit.latest_streak, 0);
        assert_eq!(habit.longest_streak, 0);
    }

    #[test]
    fn test_invalid_habit_name() {
        let result = Habit::new(
            HabitId::generate(),
            "   ".to_string(), // Blank name should fail
            String::new(),
            Frequency::Daily,
            "06:30".to_string(),
        );

        assert!(matches!(result, Err(DomainError::InvalidHabitName(_))));
    }

    #[test]
    fn test_empty_reminder_rejected() {
        let result = Habit::new(
            HabitId::generate(),
            "Read".to_string(),
            String::new(),
            Frequency::Weekly(Weekday::Sun),
            "".to_string(),
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_from_existing_normalizes_logs() {
        let habit = Habit::from_existing(
            HabitId::parse("H002").unwrap(),
            "Stretch".to_string(),
            String::new(),
            Frequency::Daily,
            "21:00".to_string(),
            vec![date("2024-01-02"), date("2024-01-05"), date("2024-01-01"), date("2024-01-05")],
            1,
            2,
            Utc::now(),
        );

        assert_eq!(habit.logs, vec![date("2024-01-05"), date("2024-01-02"), date("2024-01-01")]);
        assert_eq!(habit.start_date, Some(date("2024-01-01")));
        assert!(habit.is_logged(date("2024-01-02")));
        assert!(!habit.is_logged(date("2024-01-03")));
    }

    #[test]
    fn test_update_keeps_logs_and_streaks() {
        let mut habit = morning_walk();
        habit.logs = vec![date("2024-01-01"), date("2024-01-02")];
        habit.latest_streak = 2;
        habit.longest_streak = 2;

        habit.update(None, None, Some(Frequency::Weekly(Weekday::Mon)), Some("07:00".to_string())).unwrap();

        assert_eq!(habit.frequency, Frequency::Weekly(Weekday::Mon));
        assert_eq!(habit.reminder_time, "07:00");
        assert_eq!(habit.logs, vec![date("2024-01-02"), date("2024-01-01")]);
        assert_eq!(habit.start_date, Some(date("2024-01-01")));
        assert_eq!(habit.streak(), Streak { longest: 2, latest: 2 });
    }

    #[test]
    fn test_update_is_all_or_nothing() {
        let mut habit = morning_walk();
        let result = habit.update(Some("Jog".to_string()), Some("x".repeat(501)), None, None);

        assert!(result.is_err());
        assert_eq!(habit.name, "Morning Walk");
    }

    #[test]
    fn test_derive_start_date() {
        assert_eq!(derive_start_date(&[]), None);
        assert_eq!(
            derive_start_date(&[date("2024-03-01"), date("2024-02-01")]),
            Some(date("2024-02-01"))
        );
    }
}

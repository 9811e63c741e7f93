/// Basic unit tests to verify core functionality
use habit_streak_tracker::*;
use chrono::{NaiveDate, Weekday};
use tempfile::NamedTempFile;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn dates(days: &[&str]) -> Vec<NaiveDate> {
        days.iter().map(|d| date(d)).collect()
    }

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(
            HabitId::parse("H001").unwrap(),
            "Test Habit".to_string(),
            "A test habit".to_string(),
            Frequency::Daily,
            "06:30".to_string(),
        );

        assert!(habit.is_ok());
        let habit = habit.unwrap();
        assert_eq!(habit.name, "Test Habit");
        assert!(habit.logs.is_empty());
        assert_eq!(habit.start_date, None);
        assert_eq!(habit.streak(), Streak::default());
    }

    #[test]
    fn test_frequency_tokens() {
        assert_eq!(resolve_frequency_gap("Daily").unwrap(), 1);
        assert_eq!(resolve_frequency_gap("Wed").unwrap(), 7);
        assert!(matches!(
            resolve_frequency_gap("daily"),
            Err(DomainError::InvalidFrequency(_))
        ));
        assert!(resolve_frequency_gap("Monday").is_err());
        assert_eq!("Fri".parse::<Frequency>().unwrap(), Frequency::Weekly(Weekday::Fri));
    }

    #[test]
    fn test_daily_streak_scenarios() {
        // Extending at the head
        let logs = dates(&["2024-01-04", "2024-01-03", "2024-01-02", "2024-01-01"]);
        let previous = Streak { longest: 3, latest: 3 };
        let streak = recompute_streaks(&logs, date("2024-01-04"), 1, TrackAction::Done, previous);
        assert_eq!(streak, Streak { longest: 4, latest: 4 });

        // Gap before the new head resets the run
        let logs = dates(&["2024-01-06", "2024-01-04", "2024-01-03"]);
        let previous = Streak { longest: 2, latest: 2 };
        let streak = recompute_streaks(&logs, date("2024-01-06"), 1, TrackAction::Done, previous);
        assert_eq!(streak, Streak { longest: 2, latest: 1 });

        // Undoing a middle date splits the run
        let logs = dates(&["2024-01-04", "2024-01-03", "2024-01-01"]);
        let previous = Streak { longest: 4, latest: 4 };
        let streak = recompute_streaks(&logs, date("2024-01-02"), 1, TrackAction::Undone, previous);
        assert_eq!(streak, Streak { longest: 2, latest: 2 });

        // Back-filling a hole merges two runs
        let logs = dates(&["2024-01-05", "2024-01-04", "2024-01-03", "2024-01-02", "2024-01-01"]);
        let previous = Streak { longest: 2, latest: 2 };
        let streak = recompute_streaks(&logs, date("2024-01-03"), 1, TrackAction::Done, previous);
        assert_eq!(streak, Streak { longest: 5, latest: 5 });

        // Empty log
        let streak = recompute_streaks(&[], date("2024-01-01"), 1, TrackAction::Undone, Streak { longest: 1, latest: 1 });
        assert_eq!(streak, Streak::default());
    }

    #[test]
    fn test_weekly_streak_scan() {
        let logs = dates(&["2024-01-22", "2024-01-15", "2024-01-01"]);
        assert_eq!(scan_streaks(&logs, 7), Streak { longest: 2, latest: 2 });
    }

    #[test]
    fn test_validation_order() {
        let mut habit = Habit::new(
            HabitId::parse("H002").unwrap(),
            "Gym".to_string(),
            String::new(),
            Frequency::Weekly(Weekday::Mon),
            "18:00".to_string(),
        )
        .unwrap();
        let today = date("2024-01-10");
        let engine = StreakEngine::default();

        apply_tracking(&mut habit, date("2024-01-08"), TrackAction::Done, today, &engine).unwrap();

        // 2024-01-15 is a Monday in the future
        assert!(matches!(
            validate_tracking_request(&habit, date("2024-01-15"), TrackAction::Done, today),
            Err(TrackingError::FutureDate { .. })
        ));
        // 2024-01-02 is a Tuesday before the start date
        assert!(matches!(
            validate_tracking_request(&habit, date("2024-01-02"), TrackAction::Done, today),
            Err(TrackingError::BeforeStartDate { .. })
        ));
        assert!(matches!(
            validate_tracking_request(&habit, date("2024-01-09"), TrackAction::Done, today),
            Err(TrackingError::FrequencyMismatch { expected: Weekday::Mon, actual: Weekday::Tue, .. })
        ));
        assert!(matches!(
            validate_tracking_request(&habit, date("2024-01-08"), TrackAction::Done, today),
            Err(TrackingError::AlreadyTracked { .. })
        ));

        apply_tracking(&mut habit, date("2024-01-08"), TrackAction::Undone, today, &engine).unwrap();
        assert!(matches!(
            validate_tracking_request(&habit, date("2024-01-08"), TrackAction::Undone, today),
            Err(TrackingError::NotTracked { .. })
        ));
        assert_eq!(habit.start_date, None);
        assert_eq!(habit.streak(), Streak::default());
    }

    #[tokio::test]
    async fn test_server_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let server = HabitTrackerServer::new(temp_file.path().to_path_buf()).await;
        assert!(server.is_ok());
        assert_eq!(server.unwrap().engine().policy(), LongestStreakPolicy::Rescan);
    }

    #[test]
    fn test_storage_creation() {
        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        let storage = SqliteStorage::new(temp_file.path().to_path_buf());
        assert!(storage.is_ok());
        assert!(storage.unwrap().list_habits().unwrap().is_empty());
    }
}

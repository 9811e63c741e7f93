/// Marking habits done or undone on a date
///
/// Tracking runs in three steps: validate the request against the habit as
/// it is, edit the log, then hand the edited log to the streak engine. All
/// checks happen before the first mutation, so a rejected request leaves the
/// habit exactly as it was.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{derive_start_date, normalize_logs, Habit, Streak, StreakEngine, StreakPath, TrackAction};

/// Reasons a tracking request is refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    #[error("Cannot track future date {date} (today is {today})")]
    FutureDate { date: NaiveDate, today: NaiveDate },

    #[error("Date {date} is before the habit's start date {start_date}")]
    BeforeStartDate { date: NaiveDate, start_date: NaiveDate },

    #[error("Habit is not set for this day of the week: {date} is a {actual}, expected {expected}")]
    FrequencyMismatch { date: NaiveDate, expected: Weekday, actual: Weekday },

    #[error("Already tracked for {date}")]
    AlreadyTracked { date: NaiveDate },

    #[error("No log to uncheck for {date}")]
    NotTracked { date: NaiveDate },
}

/// What a successful tracking request changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackOutcome {
    pub date: NaiveDate,
    pub action: TrackAction,
    pub previous: Streak,
    pub streak: Streak,
    pub path: StreakPath,
}

/// Check a tracking request against the habit's current state
///
/// Checks run in a fixed order and the first failure wins: future date,
/// before start date, weekday mismatch, double mark, double unmark.
pub fn validate_tracking_request(
    habit: &Habit,
    date: NaiveDate,
    action: TrackAction,
    today: NaiveDate,
) -> Result<(), TrackingError> {
    if date > today {
        return Err(TrackingError::FutureDate { date, today });
    }

    if let Some(start_date) = derive_start_date(&habit.logs) {
        if date < start_date {
            return Err(TrackingError::BeforeStartDate { date, start_date });
        }
    }

    if !habit.frequency.is_scheduled_for_date(date) {
        if let Some(expected) = habit.frequency.weekday() {
            return Err(TrackingError::FrequencyMismatch {
                date,
                expected,
                actual: date.weekday(),
            });
        }
    }

    match (action, habit.is_logged(date)) {
        (TrackAction::Done, true) => Err(TrackingError::AlreadyTracked { date }),
        (TrackAction::Undone, false) => Err(TrackingError::NotTracked { date }),
        _ => Ok(()),
    }
}

/// Validate, edit the log, and recompute streaks for one habit
///
/// On success the habit holds the new log, streak values and start date.
/// On failure it is untouched.
pub fn apply_tracking(
    habit: &mut Habit,
    date: NaiveDate,
    action: TrackAction,
    today: NaiveDate,
    engine: &StreakEngine,
) -> Result<TrackOutcome, TrackingError> {
    validate_tracking_request(habit, date, action, today)?;

    match action {
        TrackAction::Done => habit.logs.push(date),
        TrackAction::Undone => habit.logs.retain(|logged| *logged != date),
    }
    normalize_logs(&mut habit.logs);

    let previous = habit.streak();
    let update = engine.recompute(
        &habit.logs,
        date,
        habit.frequency.gap_days(),
        action,
        previous,
    );

    habit.latest_streak = update.streak.latest;
    habit.longest_streak = update.streak.longest;
    habit.normalize();

    tracing::debug!(
        "Tracked habit {} {:?} on {} via {:?} path: latest {} -> {}, longest {} -> {}",
        habit.id, action, date, update.path,
        previous.latest, update.streak.latest,
        previous.longest, update.streak.longest
    );

    Ok(TrackOutcome {
        date,
        action,
        previous,
        streak: update.streak,
        path: update.path,
    })
}

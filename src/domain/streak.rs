/// Streak calculation
///
/// This module holds the streak engine: given a habit's log after an edit,
/// it works out the new current ("latest") and longest streak. Appending a
/// date at the head of the log is handled in O(1) from the previous values;
/// every other edit rescans the whole log, because removing or inserting a
/// date in the middle can split or merge runs.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

/// Streak values for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Streak {
    /// Longest run recorded
    pub longest: u32,
    /// Run ending at the most recent log entry
    pub latest: u32,
}

impl Streak {
    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.latest {
            0 => "Ready to start your streak! Every journey begins with a single step.".to_string(),
            1 => "Great start! Keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} in a row. You're building a strong habit.", self.latest),
            7..=13 => format!("Excellent! {} strong. You're in the groove now!", self.latest),
            14..=29 => format!("Amazing! {} straight. This is becoming second nature.", self.latest),
            30..=99 => format!("Incredible! {} of consistency. You're a habit master!", self.latest),
            _ => format!("Legendary! {} of unwavering commitment.", self.latest),
        }
    }
}

/// Whether a tracking request marks a date done or undone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackAction {
    Done,
    Undone,
}

impl From<bool> for TrackAction {
    fn from(done: bool) -> Self {
        if done { TrackAction::Done } else { TrackAction::Undone }
    }
}

/// How a full rescan treats the previously recorded longest streak
///
/// With `Rescan` the longest streak is the longest run currently present in
/// the log, so undoing a date inside the record run can lower it. With
/// `HighWaterMark` a rescan never lowers it below the previous value.
/// Either way an empty log resets both values to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LongestStreakPolicy {
    /// Longest streak is the longest run still present in the log
    #[default]
    Rescan,
    /// Longest streak never drops below a previously recorded value
    HighWaterMark,
}

/// Which branch of the engine produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakPath {
    /// Head-of-log "mark done", updated from the previous values
    Fast,
    /// Full rescan of the log
    General,
}

/// Result of one recomputation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakUpdate {
    pub streak: Streak,
    pub path: StreakPath,
}

/// Recomputes streak values after a log edit
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakEngine {
    policy: LongestStreakPolicy,
}

impl StreakEngine {
    pub fn new(policy: LongestStreakPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> LongestStreakPolicy {
        self.policy
    }

    /// Recompute streaks from the post-edit log
    ///
    /// `logs` must already contain the edit and be sorted most recent first
    /// without duplicates. `gap_days` is the frequency's expected gap.
    pub fn recompute(
        &self,
        logs: &[NaiveDate],
        target: NaiveDate,
        gap_days: i64,
        action: TrackAction,
        previous: Streak,
    ) -> StreakUpdate {
        if action == TrackAction::Done && logs.first() == Some(&target) {
            let continues = match logs.get(1) {
                None => true,
                Some(next) => (target - *next).num_days() == gap_days,
            };
            let latest = if continues {
                previous.latest.saturating_add(1)
            } else {
                1
            };
            return StreakUpdate {
                streak: Streak {
                    longest: previous.longest.max(latest),
                    latest,
                },
                path: StreakPath::Fast,
            };
        }

        let mut streak = scan_streaks(logs, gap_days);
        if self.policy == LongestStreakPolicy::HighWaterMark && !logs.is_empty() {
            streak.longest = streak.longest.max(previous.longest);
        }
        StreakUpdate {
            streak,
            path: StreakPath::General,
        }
    }
}

/// Recompute streaks with the default [`LongestStreakPolicy::Rescan`] policy
pub fn recompute_streaks(
    logs: &[NaiveDate],
    target: NaiveDate,
    gap_days: i64,
    action: TrackAction,
    previous: Streak,
) -> Streak {
    StreakEngine::default()
        .recompute(logs, target, gap_days, action, previous)
        .streak
}

/// Measure runs in a descending log in a single pass
///
/// Neighbors exactly `gap_days` apart belong to the same run. `latest` is
/// the run anchored at the head, `longest` the longest run anywhere.
pub fn scan_streaks(logs: &[NaiveDate], gap_days: i64) -> Streak {
    if logs.is_empty() {
        return Streak::default();
    }

    let mut run = 1u32;
    let mut head_run = None;
    let mut longest = 0u32;

    for pair in logs.windows(2) {
        if (pair[0] - pair[1]).num_days() == gap_days {
            run += 1;
        } else {
            head_run.get_or_insert(run);
            longest = longest.max(run);
            run = 1;
        }
    }
    longest = longest.max(run);

    Streak {
        longest,
        latest: head_run.unwrap_or(run),
    }
}

/// Core types used throughout the domain layer
///
/// This module defines the habit identifier and the frequency rule, which
/// together with the log decide how streaks are counted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{NaiveDate, Weekday, Datelike};
use uuid::Uuid;

use crate::domain::DomainError;

/// Longest identifier we accept from clients
const MAX_ID_LEN: usize = 64;

/// Unique identifier for a habit
///
/// Clients may pick their own ids (e.g. "H001"); when they don't, a UUID is
/// generated. Once a habit is created its id never changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generate a new random habit ID
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a habit ID from client input
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        if s.trim().is_empty() {
            return Err(DomainError::InvalidHabitId("Habit ID cannot be empty".to_string()));
        }
        if s.trim() != s {
            return Err(DomainError::InvalidHabitId(
                format!("Habit ID '{}' has surrounding whitespace", s)
            ));
        }
        if s.len() > MAX_ID_LEN {
            return Err(DomainError::InvalidHabitId(
                format!("Habit ID cannot be longer than {} characters", MAX_ID_LEN)
            ));
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How often a habit should be performed
///
/// Either every day, or once a week on a fixed weekday. The frequency decides
/// which dates may be logged and the gap that keeps a streak alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// Every single day
    Daily,
    /// Once a week, on this weekday
    Weekly(Weekday),
}

impl Frequency {
    /// All tokens accepted by [`Frequency::from_str`]
    pub const TOKENS: [&'static str; 8] = ["Daily", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

    /// Expected number of days between two consecutive qualifying log dates
    pub fn gap_days(&self) -> i64 {
        match self {
            Frequency::Daily => 1,
            Frequency::Weekly(_) => 7,
        }
    }

    /// The weekday this habit is pinned to, if any
    pub fn weekday(&self) -> Option<Weekday> {
        match self {
            Frequency::Daily => None,
            Frequency::Weekly(day) => Some(*day),
        }
    }

    /// Check if this frequency allows the habit to be logged on a given date
    pub fn is_scheduled_for_date(&self, date: NaiveDate) -> bool {
        match self {
            Frequency::Daily => true,
            Frequency::Weekly(day) => date.weekday() == *day,
        }
    }

    /// The canonical token for this frequency ("Daily", "Mon", ...)
    pub fn token(&self) -> &'static str {
        match self {
            Frequency::Daily => "Daily",
            Frequency::Weekly(Weekday::Mon) => "Mon",
            Frequency::Weekly(Weekday::Tue) => "Tue",
            Frequency::Weekly(Weekday::Wed) => "Wed",
            Frequency::Weekly(Weekday::Thu) => "Thu",
            Frequency::Weekly(Weekday::Fri) => "Fri",
            Frequency::Weekly(Weekday::Sat) => "Sat",
            Frequency::Weekly(Weekday::Sun) => "Sun",
        }
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    /// Tokens are case-sensitive: "daily" and "monday" are rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let frequency = match s {
            "Daily" => Frequency::Daily,
            "Mon" => Frequency::Weekly(Weekday::Mon),
            "Tue" => Frequency::Weekly(Weekday::Tue),
            "Wed" => Frequency::Weekly(Weekday::Wed),
            "Thu" => Frequency::Weekly(Weekday::Thu),
            "Fri" => Frequency::Weekly(Weekday::Fri),
            "Sat" => Frequency::Weekly(Weekday::Sat),
            "Sun" => Frequency::Weekly(Weekday::Sun),
            other => {
                return Err(DomainError::InvalidFrequency(format!(
                    "'{}' is not a valid frequency. Valid options: {}",
                    other,
                    Self::TOKENS.join(", ")
                )))
            }
        };
        Ok(frequency)
    }
}

impl TryFrom<String> for Frequency {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.token().to_string()
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Resolve a raw frequency token to the expected gap in days
///
/// `Daily` resolves to 1 and every weekday token to 7.
pub fn resolve_frequency_gap(token: &str) -> Result<i64, DomainError> {
    Ok(token.parse::<Frequency>()?.gap_days())
}

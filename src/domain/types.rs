/// Core types and enums used throughout the domain layer
///
/// This module defines the identifier types and the mood scale that every
/// record, entry and analytics computation agrees on.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use uuid::Uuid;

/// Identifier of the person whose journal is being tracked
///
/// A local install normally has a single user ("local"), but every record is
/// keyed by user so a shared database never mixes journals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self("local".to_string())
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a logged entry (mood, food, productivity or journal)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub Uuid);

impl EntryId {
    /// Generate a new random entry ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entry ID from a string (useful for database loading)
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The five-point categorical mood scale
///
/// Each level maps onto an ordinal value 1..=5. Analytics work on the
/// numeric value; the label is what the user picks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodLevel {
    Sad,
    Neutral,
    Happy,
    VeryHappy,
    Ecstatic,
}

/// Value used for any label outside the scale
pub const DEFAULT_MOOD_VALUE: f64 = 3.0;

/// Upper end of the mood scale, used to normalize values onto [0, 1]
pub const MOOD_SCALE_MAX: f64 = 5.0;

impl MoodLevel {
    /// All levels, lowest first
    pub const ALL: [MoodLevel; 5] = [
        MoodLevel::Sad,
        MoodLevel::Neutral,
        MoodLevel::Happy,
        MoodLevel::VeryHappy,
        MoodLevel::Ecstatic,
    ];

    /// Parse a user-facing label ("Very Happy", "sad", ...)
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        Self::ALL
            .into_iter()
            .find(|level| level.label().eq_ignore_ascii_case(trimmed))
    }

    /// The label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            MoodLevel::Sad => "Sad",
            MoodLevel::Neutral => "Neutral",
            MoodLevel::Happy => "Happy",
            MoodLevel::VeryHappy => "Very Happy",
            MoodLevel::Ecstatic => "Ecstatic",
        }
    }

    /// Ordinal value on the 1..=5 scale
    pub fn value(&self) -> f64 {
        match self {
            MoodLevel::Sad => 1.0,
            MoodLevel::Neutral => 2.0,
            MoodLevel::Happy => 3.0,
            MoodLevel::VeryHappy => 4.0,
            MoodLevel::Ecstatic => 5.0,
        }
    }
}

/// Map a mood label to its numeric value
///
/// This is the only place labels become numbers. Unknown labels fall back to
/// the neutral midpoint of the scale.
pub fn mood_value(label: &str) -> f64 {
    MoodLevel::from_label(label)
        .map(|level| level.value())
        .unwrap_or(DEFAULT_MOOD_VALUE)
}

/// Parse an ISO 8601 calendar date (YYYY-MM-DD)
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// Journal entries as the user logs them
///
/// Each entry type is validated on creation and carries its own id, owner and
/// logging timestamp. The analytics engine never sees these directly; the
/// storage layer reduces them to the plain records in `records.rs`.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};
use crate::domain::{mood_value, DomainError, EntryId, MoodLevel, UserId};

/// Longest note attached to a mood, food or productivity entry
const MAX_NOTE_LEN: usize = 500;
/// Longest free-text journal entry
const MAX_JOURNAL_LEN: usize = 5000;
const MAX_TITLE_LEN: usize = 100;
/// How far back an entry may be backdated
const MAX_BACKDATE_DAYS: i64 = 365;

/// A logged mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: EntryId,
    pub user_id: UserId,
    /// Label as entered ("Happy", "Very Happy", ...)
    pub label: String,
    /// Numeric value derived from the label
    pub value: f64,
    /// Which day this mood was for
    pub date: NaiveDate,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl MoodEntry {
    /// Create a new mood entry with validation
    ///
    /// Labels outside the scale are accepted and stored as-is; they score as
    /// the neutral midpoint.
    pub fn new(
        user_id: UserId,
        label: String,
        date: NaiveDate,
        note: Option<String>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        validate_date(date, today)?;
        validate_note(&note)?;

        let label = label.trim().to_string();
        if label.is_empty() {
            return Err(DomainError::Validation {
                message: "Mood label cannot be empty".to_string(),
            });
        }

        // Store the canonical spelling when the label is on the scale
        let label = MoodLevel::from_label(&label)
            .map(|level| level.label().to_string())
            .unwrap_or(label);
        let value = mood_value(&label);

        Ok(Self {
            id: EntryId::new(),
            user_id,
            label,
            value,
            date,
            note,
            logged_at: now,
        })
    }
}

/// Foods eaten on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub foods: Vec<String>,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl FoodEntry {
    pub fn new(
        user_id: UserId,
        date: NaiveDate,
        foods: Vec<String>,
        note: Option<String>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        validate_date(date, today)?;
        validate_note(&note)?;

        let foods: Vec<String> = foods
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        if foods.is_empty() {
            return Err(DomainError::Validation {
                message: "At least one food item is required".to_string(),
            });
        }

        Ok(Self {
            id: EntryId::new(),
            user_id,
            date,
            foods,
            note,
            logged_at: now,
        })
    }
}

/// Self-rated productivity for a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductivityEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub date: NaiveDate,
    /// Rating from 1-10
    pub score: u8,
    pub note: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl ProductivityEntry {
    pub fn new(
        user_id: UserId,
        date: NaiveDate,
        score: u8,
        note: Option<String>,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        validate_date(date, today)?;
        validate_note(&note)?;

        if !(1..=10).contains(&score) {
            return Err(DomainError::InvalidValue {
                message: "Productivity score must be between 1 and 10".to_string(),
            });
        }

        Ok(Self {
            id: EntryId::new(),
            user_id,
            date,
            score,
            note,
            logged_at: now,
        })
    }
}

/// Free-text journal entry
///
/// Journal entries are kept for reflection only; they do not count as
/// activity for streaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub title: Option<String>,
    pub content: String,
    pub logged_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(
        user_id: UserId,
        date: NaiveDate,
        title: Option<String>,
        content: String,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        validate_date(date, today)?;

        if content.trim().is_empty() {
            return Err(DomainError::Validation {
                message: "Journal entry cannot be empty".to_string(),
            });
        }
        if content.chars().count() > MAX_JOURNAL_LEN {
            return Err(DomainError::Validation {
                message: format!("Journal entry cannot be longer than {} characters", MAX_JOURNAL_LEN),
            });
        }
        if let Some(t) = &title {
            if t.chars().count() > MAX_TITLE_LEN {
                return Err(DomainError::Validation {
                    message: format!("Title cannot be longer than {} characters", MAX_TITLE_LEN),
                });
            }
        }

        Ok(Self {
            id: EntryId::new(),
            user_id,
            date,
            title,
            content,
            logged_at: now,
        })
    }
}

/// Weather observed on a day (one per user and date)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherEntry {
    pub user_id: UserId,
    pub date: NaiveDate,
    pub condition: String,
    /// Degrees Celsius
    pub temperature: f64,
}

impl WeatherEntry {
    pub fn new(
        user_id: UserId,
        date: NaiveDate,
        condition: String,
        temperature: f64,
        today: NaiveDate,
    ) -> Result<Self, DomainError> {
        validate_date(date, today)?;

        let condition = condition.trim().to_string();
        if condition.is_empty() {
            return Err(DomainError::Validation {
                message: "Weather condition cannot be empty".to_string(),
            });
        }
        if !temperature.is_finite() || !(-90.0..=60.0).contains(&temperature) {
            return Err(DomainError::InvalidValue {
                message: format!("Temperature {} is out of range", temperature),
            });
        }

        Ok(Self {
            user_id,
            date,
            condition,
            temperature,
        })
    }
}

// Validation helpers shared by all entry types

/// Entries may not be in the future nor older than a year
fn validate_date(date: NaiveDate, today: NaiveDate) -> Result<(), DomainError> {
    if date > today {
        return Err(DomainError::InvalidDate(
            "Cannot log entries for future dates".to_string(),
        ));
    }

    if (today - date).num_days() > MAX_BACKDATE_DAYS {
        return Err(DomainError::InvalidDate(
            "Cannot log entries more than 1 year in the past".to_string(),
        ));
    }

    Ok(())
}

fn validate_note(note: &Option<String>) -> Result<(), DomainError> {
    if let Some(text) = note {
        if text.chars().count() > MAX_NOTE_LEN {
            return Err(DomainError::Validation {
                message: format!("Notes cannot be longer than {} characters", MAX_NOTE_LEN),
            });
        }
    }
    Ok(())
}

/// Dated records consumed by the analytics engine
///
/// These are the minimal `{date, value}` shapes the engine works on. They are
/// produced by the storage layer from full entries and carry no ids or notes.

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;

use crate::domain::MOOD_SCALE_MAX;

/// Anything that belongs to a single calendar day
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// A mood reading on the 1..=5 scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub date: NaiveDate,
    pub mood_value: f64,
}

impl MoodRecord {
    pub fn new(date: NaiveDate, mood_value: f64) -> Self {
        Self { date, mood_value }
    }

    /// Mood value mapped onto [0, 1]
    pub fn normalized(&self) -> f64 {
        self.mood_value / MOOD_SCALE_MAX
    }
}

/// Weather context for a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub condition: String,
    pub temperature: f64,
}

impl WeatherRecord {
    pub fn new(date: NaiveDate, condition: impl Into<String>, temperature: f64) -> Self {
        Self {
            date,
            condition: condition.into(),
            temperature,
        }
    }
}

/// Everything eaten on a day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    pub date: NaiveDate,
    pub foods: Vec<String>,
}

impl FoodRecord {
    pub fn new(date: NaiveDate, foods: Vec<String>) -> Self {
        Self { date, foods }
    }
}

impl Dated for MoodRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for WeatherRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for FoodRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

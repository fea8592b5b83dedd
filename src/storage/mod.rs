/// Storage layer for persisting journal data
///
/// This module handles all database operations using SQLite. It provides
/// the persistence interface (`JournalStorage`) and the record retrieval
/// interface the analytics side reads through (`RecordSource`).

pub mod migrations;
pub mod sqlite;

// Re-export the main storage types
pub use sqlite::*;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{
    FoodEntry, FoodRecord, JournalEntry, MoodEntry, MoodRecord, ProductivityEntry, StreakState,
    UnlockedAchievement, UserId, WeatherEntry, WeatherRecord,
};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Duplicate entry: {kind} already logged for {date}")]
    DuplicateEntry { kind: String, date: String },

    #[error("Migration error: {0}")]
    Migration(String),
}

/// Trait defining the storage interface for the journal
///
/// This trait allows us to potentially swap out SQLite for other databases
/// in the future while keeping the same interface.
pub trait JournalStorage {
    /// Store a mood entry
    fn create_mood_entry(&self, entry: &MoodEntry) -> Result<(), StorageError>;

    /// Store a food entry
    fn create_food_entry(&self, entry: &FoodEntry) -> Result<(), StorageError>;

    /// Store a productivity rating
    fn create_productivity_entry(&self, entry: &ProductivityEntry) -> Result<(), StorageError>;

    /// Store a journal entry
    fn create_journal_entry(&self, entry: &JournalEntry) -> Result<(), StorageError>;

    /// Insert or replace the weather for a user and day
    fn upsert_weather(&self, entry: &WeatherEntry) -> Result<(), StorageError>;

    /// Most recent journal entries, newest first
    fn list_journal_entries(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<JournalEntry>, StorageError>;

    /// Mood records with `from <= date <= to`, oldest first
    fn get_mood_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MoodRecord>, StorageError>;

    /// Weather records with `from <= date <= to`, oldest first
    fn get_weather_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeatherRecord>, StorageError>;

    /// Food records with `from <= date <= to`, oldest first
    fn get_food_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FoodRecord>, StorageError>;

    /// Every distinct day with a mood, food or productivity entry
    fn get_activity_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, StorageError>;

    /// Overwrite the cached streak state for a user
    fn save_streak(&self, user_id: &UserId, streak: &StreakState) -> Result<(), StorageError>;

    /// Cached streak state, empty if none was stored yet
    fn get_streak(&self, user_id: &UserId) -> Result<StreakState, StorageError>;

    /// Record an unlock; returns false when the key was already unlocked
    fn unlock_achievement(
        &self,
        user_id: &UserId,
        unlocked: &UnlockedAchievement,
    ) -> Result<bool, StorageError>;

    /// All unlocks for a user, oldest first
    fn get_unlocked_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, StorageError>;
}

/// Asynchronous record retrieval used by the analytics side
///
/// An empty result means "no data"; failures are reported as errors and the
/// caller decides how to surface them.
#[async_trait]
pub trait RecordSource {
    async fn fetch_mood_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MoodRecord>, StorageError>;

    async fn fetch_weather_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeatherRecord>, StorageError>;

    async fn fetch_food_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FoodRecord>, StorageError>;

    async fn fetch_activity_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, StorageError>;
}

#[async_trait]
impl<S> RecordSource for S
where
    S: JournalStorage + Sync,
{
    async fn fetch_mood_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MoodRecord>, StorageError> {
        self.get_mood_records(user_id, from, to)
    }

    async fn fetch_weather_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeatherRecord>, StorageError> {
        self.get_weather_records(user_id, from, to)
    }

    async fn fetch_food_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FoodRecord>, StorageError> {
        self.get_food_records(user_id, from, to)
    }

    async fn fetch_activity_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, StorageError> {
        self.get_activity_dates(user_id)
    }
}

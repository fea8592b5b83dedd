/// SQLite implementation of the journal storage interface
///
/// This module provides the concrete SQLite implementation for storing
/// and retrieving journal data. It handles all SQL queries and data conversion.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ErrorCode};
use chrono::{NaiveDate, Utc};

use crate::domain::{
    parse_iso_date, FoodEntry, FoodRecord, JournalEntry, EntryId, MoodEntry, MoodRecord,
    ProductivityEntry, StreakState, UnlockedAchievement, UserId, WeatherEntry, WeatherRecord,
};
use crate::storage::{migrations, JournalStorage, StorageError};

/// SQLite-based storage implementation
///
/// The connection sits behind a mutex so the storage can be shared with
/// async tasks that read records concurrently.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Create a new SQLite storage instance
    ///
    /// This opens the database file and runs any necessary migrations
    /// to ensure the schema is up to date.
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        let storage = Self::from_connection(conn)?;
        tracing::info!("SQLite storage initialized at: {:?}", db_path);
        Ok(storage)
    }

    /// Storage that lives only as long as the process (tests, dry runs)
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(|e| {
            StorageError::Connection(format!("Failed to open in-memory database: {}", e))
        })?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StorageError> {
        migrations::initialize_database(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Connection("Database lock poisoned".to_string()))
    }

    /// Map a unique-constraint failure onto a duplicate entry error
    fn map_duplicate(error: rusqlite::Error, kind: &str, date: NaiveDate) -> StorageError {
        match &error {
            rusqlite::Error::SqliteFailure(failure, _)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                StorageError::DuplicateEntry {
                    kind: kind.to_string(),
                    date: date.to_string(),
                }
            }
            _ => StorageError::Query(error),
        }
    }
}

/// Parse a stored date, logging rows that cannot be read
fn stored_date(raw: &str, table: &str) -> Option<NaiveDate> {
    let parsed = parse_iso_date(raw);
    if parsed.is_none() {
        tracing::warn!("Skipping {} row with malformed date {:?}", table, raw);
    }
    parsed
}

impl JournalStorage for SqliteStorage {
    fn create_mood_entry(&self, entry: &MoodEntry) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO mood_entries (id, user_id, entry_date, label, mood_value, note, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.id.to_string(),
                entry.user_id.as_str(),
                entry.date.to_string(),
                entry.label,
                entry.value,
                entry.note,
                entry.logged_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Created mood entry {} ({}) for {}", entry.id, entry.label, entry.date);
        Ok(())
    }

    fn create_food_entry(&self, entry: &FoodEntry) -> Result<(), StorageError> {
        let foods_json = serde_json::to_string(&entry.foods)?;

        self.conn()?.execute(
            "INSERT INTO food_entries (id, user_id, entry_date, foods, note, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id.to_string(),
                entry.user_id.as_str(),
                entry.date.to_string(),
                foods_json,
                entry.note,
                entry.logged_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Created food entry {} with {} items", entry.id, entry.foods.len());
        Ok(())
    }

    fn create_productivity_entry(&self, entry: &ProductivityEntry) -> Result<(), StorageError> {
        self.conn()?
            .execute(
                "INSERT INTO productivity_entries (id, user_id, entry_date, score, note, logged_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.id.to_string(),
                    entry.user_id.as_str(),
                    entry.date.to_string(),
                    entry.score,
                    entry.note,
                    entry.logged_at.to_rfc3339()
                ],
            )
            .map_err(|e| Self::map_duplicate(e, "productivity", entry.date))?;

        tracing::debug!("Created productivity entry {} (score {})", entry.id, entry.score);
        Ok(())
    }

    fn create_journal_entry(&self, entry: &JournalEntry) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT INTO journal_entries (id, user_id, entry_date, title, content, logged_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                entry.id.to_string(),
                entry.user_id.as_str(),
                entry.date.to_string(),
                entry.title,
                entry.content,
                entry.logged_at.to_rfc3339()
            ],
        )?;

        tracing::debug!("Created journal entry {}", entry.id);
        Ok(())
    }

    fn upsert_weather(&self, entry: &WeatherEntry) -> Result<(), StorageError> {
        self.conn()?.execute(
            "INSERT OR REPLACE INTO weather_entries (user_id, entry_date, condition, temperature)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.user_id.as_str(),
                entry.date.to_string(),
                entry.condition,
                entry.temperature
            ],
        )?;

        tracing::debug!("Stored weather for {}: {}", entry.date, entry.condition);
        Ok(())
    }

    fn list_journal_entries(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<JournalEntry>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, entry_date, title, content, logged_at FROM journal_entries
             WHERE user_id = ?1
             ORDER BY entry_date DESC, logged_at DESC
             LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![user_id.as_str(), limit], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut entries = Vec::new();
        for row in rows {
            let (id, date, title, content, logged_at) = row?;
            let id = EntryId::from_string(&id).ok();
            let date = stored_date(&date, "journal_entries");
            let logged_at = chrono::DateTime::parse_from_rfc3339(&logged_at)
                .ok()
                .map(|dt| dt.with_timezone(&Utc));

            if let (Some(id), Some(date), Some(logged_at)) = (id, date, logged_at) {
                entries.push(JournalEntry {
                    id,
                    user_id: user_id.clone(),
                    date,
                    title,
                    content,
                    logged_at,
                });
            }
        }

        Ok(entries)
    }

    fn get_mood_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<MoodRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entry_date, mood_value FROM mood_entries
             WHERE user_id = ?1 AND entry_date BETWEEN ?2 AND ?3
             ORDER BY entry_date ASC, logged_at ASC",
        )?;

        let rows = stmt.query_map(
            params![user_id.as_str(), from.to_string(), to.to_string()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
        )?;

        let mut records = Vec::new();
        for row in rows {
            let (date, value) = row?;
            if let Some(date) = stored_date(&date, "mood_entries") {
                records.push(MoodRecord::new(date, value));
            }
        }

        Ok(records)
    }

    fn get_weather_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<WeatherRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entry_date, condition, temperature FROM weather_entries
             WHERE user_id = ?1 AND entry_date BETWEEN ?2 AND ?3
             ORDER BY entry_date ASC",
        )?;

        let rows = stmt.query_map(
            params![user_id.as_str(), from.to_string(), to.to_string()],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                ))
            },
        )?;

        let mut records = Vec::new();
        for row in rows {
            let (date, condition, temperature) = row?;
            if let Some(date) = stored_date(&date, "weather_entries") {
                records.push(WeatherRecord::new(date, condition, temperature));
            }
        }

        Ok(records)
    }

    fn get_food_records(
        &self,
        user_id: &UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FoodRecord>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entry_date, foods FROM food_entries
             WHERE user_id = ?1 AND entry_date BETWEEN ?2 AND ?3
             ORDER BY entry_date ASC, logged_at ASC",
        )?;

        let rows = stmt.query_map(
            params![user_id.as_str(), from.to_string(), to.to_string()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        let mut records = Vec::new();
        for row in rows {
            let (date, foods_json) = row?;
            let Some(date) = stored_date(&date, "food_entries") else {
                continue;
            };
            match serde_json::from_str::<Vec<String>>(&foods_json) {
                Ok(foods) => records.push(FoodRecord::new(date, foods)),
                Err(e) => {
                    tracing::warn!("Skipping food row for {} with unreadable items: {}", date, e)
                }
            }
        }

        Ok(records)
    }

    fn get_activity_dates(&self, user_id: &UserId) -> Result<Vec<NaiveDate>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT entry_date FROM mood_entries WHERE user_id = ?1
             UNION
             SELECT entry_date FROM food_entries WHERE user_id = ?1
             UNION
             SELECT entry_date FROM productivity_entries WHERE user_id = ?1",
        )?;

        let rows = stmt.query_map(params![user_id.as_str()], |row| row.get::<_, String>(0))?;

        let mut dates = Vec::new();
        for row in rows {
            if let Some(date) = stored_date(&row?, "activity") {
                dates.push(date);
            }
        }

        Ok(dates)
    }

    fn save_streak(&self, user_id: &UserId, streak: &StreakState) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();

        self.conn()?.execute(
            "INSERT OR REPLACE INTO streaks (
                user_id, current_streak, longest_streak, total_entries, last_entry_date, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id.as_str(),
                streak.current_streak,
                streak.longest_streak,
                streak.total_entries,
                streak.last_entry_date.map(|d| d.to_string()),
                now
            ],
        )?;

        tracing::debug!("Updated streak for user {}: {:?}", user_id, streak);
        Ok(())
    }

    fn get_streak(&self, user_id: &UserId) -> Result<StreakState, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT current_streak, longest_streak, total_entries, last_entry_date
             FROM streaks WHERE user_id = ?1",
        )?;

        let result = stmt.query_row(params![user_id.as_str()], |row| {
            let last_entry_date: Option<String> = row.get(3)?;

            Ok(StreakState {
                current_streak: row.get(0)?,
                longest_streak: row.get(1)?,
                total_entries: row.get(2)?,
                last_entry_date: last_entry_date.and_then(|s| parse_iso_date(&s)),
            })
        });

        match result {
            Ok(streak) => Ok(streak),
            // No streak cached yet
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(StreakState::new()),
            Err(e) => Err(StorageError::Query(e)),
        }
    }

    fn unlock_achievement(
        &self,
        user_id: &UserId,
        unlocked: &UnlockedAchievement,
    ) -> Result<bool, StorageError> {
        let inserted = self.conn()?.execute(
            "INSERT OR IGNORE INTO unlocked_achievements (user_id, achievement_key, unlocked_at)
             VALUES (?1, ?2, ?3)",
            params![
                user_id.as_str(),
                unlocked.achievement_key,
                unlocked.unlocked_at.to_rfc3339()
            ],
        )?;

        if inserted > 0 {
            tracing::info!("User {} unlocked achievement {}", user_id, unlocked.achievement_key);
        }
        Ok(inserted > 0)
    }

    fn get_unlocked_achievements(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<UnlockedAchievement>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT achievement_key, unlocked_at FROM unlocked_achievements
             WHERE user_id = ?1
             ORDER BY unlocked_at ASC, achievement_key ASC",
        )?;

        let rows = stmt.query_map(params![user_id.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut unlocked = Vec::new();
        for row in rows {
            let (key, unlocked_at) = row?;
            match chrono::DateTime::parse_from_rfc3339(&unlocked_at) {
                Ok(at) => unlocked.push(UnlockedAchievement::new(key, at.with_timezone(&Utc))),
                Err(e) => tracing::warn!("Skipping unlock {} with bad timestamp: {}", key, e),
            }
        }

        Ok(unlocked)
    }
}

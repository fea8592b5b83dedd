/// Tools for logging journal entries
///
/// This module implements the mood_log, food_log, productivity_log,
/// journal_write and weather_log MCP tools. Mood, food and productivity
/// entries count as activity and refresh the streak.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{AnalyticsEngine, ProgressUpdate};
use crate::domain::{FoodEntry, JournalEntry, MoodEntry, ProductivityEntry, UserId, WeatherEntry};
use crate::storage::JournalStorage;
use crate::tools::{date_or_today, format_progress, refresh_progress, ToolError};

/// Parameters for logging a mood
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogMoodParams {
    /// One of Sad, Neutral, Happy, Very Happy, Ecstatic
    pub mood: String,
    /// Day the mood was for (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
    /// Optional note about the day
    pub note: Option<String>,
}

/// Parameters for logging food
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogFoodParams {
    /// Foods eaten, e.g. ["oatmeal", "chocolate"]
    pub foods: Vec<String>,
    /// Day eaten (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Parameters for rating productivity
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogProductivityParams {
    /// Rating 1-10
    pub score: u8,
    /// Day rated (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
    pub note: Option<String>,
}

/// Parameters for writing a journal entry
#[derive(Debug, Deserialize, JsonSchema)]
pub struct WriteJournalParams {
    pub content: String,
    pub title: Option<String>,
    /// Day written about (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
}

/// Parameters for recording the weather
#[derive(Debug, Deserialize, JsonSchema)]
pub struct LogWeatherParams {
    /// e.g. "Clear", "Sunny", "Rain", "Cloudy"
    pub condition: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Day observed (YYYY-MM-DD, defaults to today)
    pub date: Option<String>,
}

/// Parameters for reading back recent journal entries
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListJournalParams {
    /// How many entries to return (default 5, max 50)
    pub limit: Option<u32>,
}

/// Recent journal entries, newest first
#[derive(Debug, Serialize)]
pub struct ListJournalResponse {
    pub entries: Vec<JournalEntry>,
    pub message: String,
}

/// Response from any logging tool
#[derive(Debug, Serialize)]
pub struct LogResponse {
    pub success: bool,
    pub message: String,
    /// Present for entries that count as activity
    pub progress: Option<ProgressUpdate>,
}

impl LogResponse {
    fn with_progress(headline: String, progress: ProgressUpdate) -> Self {
        Self {
            success: true,
            message: format!("{}\n{}", headline, format_progress(&progress)),
            progress: Some(progress),
        }
    }
}

/// Log a mood using the provided storage
pub fn log_mood<S: JournalStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
    params: LogMoodParams,
) -> Result<LogResponse, ToolError> {
    let today = analytics.today();
    let date = date_or_today(params.date.as_deref(), today)?;

    let entry = MoodEntry::new(
        user_id.clone(),
        params.mood,
        date,
        params.note,
        analytics.clock().now(),
        today,
    )?;
    storage.create_mood_entry(&entry)?;

    let progress = refresh_progress(storage, analytics, user_id)?;
    Ok(LogResponse::with_progress(
        format!("😊 Logged mood '{}' for {}", entry.label, entry.date),
        progress,
    ))
}

/// Log food using the provided storage
pub fn log_food<S: JournalStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
    params: LogFoodParams,
) -> Result<LogResponse, ToolError> {
    let today = analytics.today();
    let date = date_or_today(params.date.as_deref(), today)?;

    let entry = FoodEntry::new(
        user_id.clone(),
        date,
        params.foods,
        params.note,
        analytics.clock().now(),
        today,
    )?;
    storage.create_food_entry(&entry)?;

    let progress = refresh_progress(storage, analytics, user_id)?;
    Ok(LogResponse::with_progress(
        format!("🍽️ Logged {} for {}", entry.foods.join(", "), entry.date),
        progress,
    ))
}

/// Log a productivity rating using the provided storage
pub fn log_productivity<S: JournalStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
    params: LogProductivityParams,
) -> Result<LogResponse, ToolError> {
    let today = analytics.today();
    let date = date_or_today(params.date.as_deref(), today)?;

    let entry = ProductivityEntry::new(
        user_id.clone(),
        date,
        params.score,
        params.note,
        analytics.clock().now(),
        today,
    )?;
    storage.create_productivity_entry(&entry)?;

    let progress = refresh_progress(storage, analytics, user_id)?;
    Ok(LogResponse::with_progress(
        format!("📈 Logged productivity {}/10 for {}", entry.score, entry.date),
        progress,
    ))
}

/// Store a journal entry (does not affect streaks)
pub fn write_journal<S: JournalStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
    params: WriteJournalParams,
) -> Result<LogResponse, ToolError> {
    let today = analytics.today();
    let date = date_or_today(params.date.as_deref(), today)?;

    let entry = JournalEntry::new(
        user_id.clone(),
        date,
        params.title,
        params.content,
        analytics.clock().now(),
        today,
    )?;
    storage.create_journal_entry(&entry)?;

    Ok(LogResponse {
        success: true,
        message: format!("📓 Saved journal entry for {}", entry.date),
        progress: None,
    })
}

/// Record the weather for a day (does not affect streaks)
pub fn log_weather<S: JournalStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
    params: LogWeatherParams,
) -> Result<LogResponse, ToolError> {
    let today = analytics.today();
    let date = date_or_today(params.date.as_deref(), today)?;

    let entry = WeatherEntry::new(user_id.clone(), date, params.condition, params.temperature, today)?;
    storage.upsert_weather(&entry)?;

    Ok(LogResponse {
        success: true,
        message: format!(
            "🌤️ Recorded {} at {:.1}°C for {}",
            entry.condition, entry.temperature, entry.date
        ),
        progress: None,
    })
}

/// List the most recent journal entries
pub fn list_journal<S: JournalStorage>(
    storage: &S,
    user_id: &UserId,
    params: ListJournalParams,
) -> Result<ListJournalResponse, ToolError> {
    let limit = params.limit.unwrap_or(5).clamp(1, 50);
    let entries = storage.list_journal_entries(user_id, limit)?;

    let message = if entries.is_empty() {
        "📓 No journal entries yet".to_string()
    } else {
        entries
            .iter()
            .map(|e| match &e.title {
                Some(title) => format!("📓 {} {}\n{}", e.date, title, e.content),
                None => format!("📓 {}\n{}", e.date, e.content),
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    };

    Ok(ListJournalResponse { entries, message })
}

/// Tool for checking streak and achievement status
///
/// This module implements the streak_status MCP tool.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{AchievementProgress, AnalyticsEngine};
use crate::domain::{StreakState, UserId};
use crate::storage::JournalStorage;
use crate::tools::{format_progress, plural_days, refresh_progress, ToolError};

/// Parameters for checking status
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct StreakStatusParams {
    /// Also list achievements that are still locked (default: true)
    pub include_locked: Option<bool>,
}

/// Response from checking status
#[derive(Debug, Serialize)]
pub struct StreakStatusResponse {
    pub streak: StreakState,
    pub on_track: bool,
    pub achievements: Vec<AchievementProgress>,
    pub message: String,
}

/// Recompute the streak (it may have lapsed since the last log) and report it
pub fn get_streak_status<S: JournalStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
    params: StreakStatusParams,
) -> Result<StreakStatusResponse, ToolError> {
    let update = refresh_progress(storage, analytics, user_id)?;

    let unlocked_keys: HashSet<String> = storage
        .get_unlocked_achievements(user_id)?
        .into_iter()
        .map(|u| u.achievement_key)
        .collect();

    let include_locked = params.include_locked.unwrap_or(true);
    let achievements: Vec<AchievementProgress> = analytics
        .achievement_progress(&update.streak, &unlocked_keys)
        .into_iter()
        .filter(|p| include_locked || p.unlocked)
        .collect();

    let on_track = update.streak.is_on_track(analytics.today());

    let last_entry = match update.streak.last_entry_date {
        Some(date) => format!("Last entry: {}", date),
        None => "No entries yet".to_string(),
    };

    let achievement_lines = achievements
        .iter()
        .map(|p| {
            if p.unlocked {
                format!("✅ {} {}", p.achievement.icon, p.achievement.title)
            } else {
                format!("⬜ {} {} ({:.0}%)", p.achievement.icon, p.achievement.title, p.progress)
            }
        })
        .collect::<Vec<_>>()
        .join("\n");

    let message = format!(
        "{}\n📅 Active days: {} | {}\n{}\n\n🏅 Achievements ({}/{} unlocked)\n{}",
        format_progress(&update),
        plural_days(update.streak.total_entries),
        last_entry,
        update.streak.motivational_message(),
        unlocked_keys.len(),
        analytics.catalog().len(),
        achievement_lines
    );

    Ok(StreakStatusResponse {
        streak: update.streak,
        on_track,
        achievements,
        message,
    })
}

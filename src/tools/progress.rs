/// Streak refresh shared by every activity-logging tool
///
/// Recomputes the streak from all activity dates, stores it, persists any
/// newly crossed achievements and reports what changed.

use std::collections::HashSet;

use crate::analytics::{AnalyticsEngine, ProgressUpdate};
use crate::domain::{UnlockedAchievement, UserId};
use crate::storage::JournalStorage;
use crate::tools::{plural_days, ToolError};

/// Recompute and persist streak state and unlocks for a user
pub fn refresh_progress<S: JournalStorage>(
    storage: &S,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
) -> Result<ProgressUpdate, ToolError> {
    let previous = storage.get_streak(user_id)?;
    let dates = storage.get_activity_dates(user_id)?;
    let current = analytics.compute_streak(&dates);

    let unlocked_keys: HashSet<String> = storage
        .get_unlocked_achievements(user_id)?
        .into_iter()
        .map(|u| u.achievement_key)
        .collect();

    let update = analytics.progress_update(&previous, current, &unlocked_keys);

    let now = analytics.clock().now();
    for definition in &update.newly_unlocked {
        let unlocked = UnlockedAchievement::new(definition.key.clone(), now);
        storage.unlock_achievement(user_id, &unlocked)?;
    }

    // Only after the unlocks, so a failed unlock keeps the previous streak
    storage.save_streak(user_id, &update.streak)?;

    tracing::debug!(
        "Refreshed progress for {}: streak {} (best {}), {} new unlocks",
        user_id,
        update.streak.current_streak,
        update.streak.longest_streak,
        update.newly_unlocked.len()
    );

    Ok(update)
}

/// Streak line plus one line per event
pub fn format_progress(update: &ProgressUpdate) -> String {
    let mut lines = vec![format!(
        "🔥 Current streak: {} | Best: {}",
        plural_days(update.streak.current_streak),
        plural_days(update.streak.longest_streak)
    )];
    lines.extend(update.events.iter().map(|event| event.message()));
    lines.join("\n")
}

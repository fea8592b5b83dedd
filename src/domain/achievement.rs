/// Achievements unlocked by logging consistently
///
/// An achievement is a named threshold on a monotonic metric: the longest
/// streak or the number of distinct days with entries. The catalog is an
/// immutable table passed in by the caller; unlocks are append-only.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::domain::{DomainError, StreakState};

/// Which metric an achievement is measured against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    /// Compared against `longest_streak`
    Streak,
    /// Compared against `total_entries`
    Entries,
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    /// Stable unique key (e.g. "streak_7")
    pub key: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    /// Threshold; zero or negative means always satisfied
    pub requirement: i64,
}

impl AchievementDefinition {
    pub fn new(
        key: &str,
        title: &str,
        description: &str,
        icon: &str,
        category: AchievementCategory,
        requirement: i64,
    ) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            category,
            requirement,
        }
    }

    /// The metric this achievement tracks, read from the streak state
    pub fn current_metric(&self, state: &StreakState) -> u32 {
        match self.category {
            AchievementCategory::Streak => state.longest_streak,
            AchievementCategory::Entries => state.total_entries,
        }
    }

    /// Whether the threshold has been reached
    pub fn should_unlock(&self, state: &StreakState) -> bool {
        self.requirement <= 0 || i64::from(self.current_metric(state)) >= self.requirement
    }

    /// Progress towards the threshold as a percentage in [0, 100]
    pub fn progress_for(&self, state: &StreakState) -> f64 {
        if self.requirement <= 0 {
            return 100.0;
        }
        let metric = f64::from(self.current_metric(state));
        (100.0 * metric / self.requirement as f64).min(100.0)
    }
}

/// Read-only table of achievement definitions
///
/// Cloning is cheap; all clones share the same table.
#[derive(Debug, Clone, PartialEq)]
pub struct AchievementCatalog {
    definitions: Arc<Vec<AchievementDefinition>>,
}

impl AchievementCatalog {
    /// Build a catalog from definitions, rejecting duplicate keys
    pub fn new(definitions: Vec<AchievementDefinition>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for definition in &definitions {
            if definition.key.trim().is_empty() {
                return Err(DomainError::Validation {
                    message: "Achievement key cannot be empty".to_string(),
                });
            }
            if !seen.insert(definition.key.as_str()) {
                return Err(DomainError::Validation {
                    message: format!("Duplicate achievement key: {}", definition.key),
                });
            }
        }

        Ok(Self {
            definitions: Arc::new(definitions),
        })
    }

    /// The catalog shipped with the app
    pub fn standard() -> Self {
        use AchievementCategory::{Entries, Streak};

        let definitions = vec![
            AchievementDefinition::new("first_entry", "First Step", "Log your very first entry", "🌱", Entries, 1),
            AchievementDefinition::new("streak_3", "Getting Started", "Log something 3 days in a row", "🔥", Streak, 3),
            AchievementDefinition::new("streak_7", "Week Warrior", "Keep a 7 day streak", "📅", Streak, 7),
            AchievementDefinition::new("streak_14", "Fortnight Focus", "Keep a 14 day streak", "💪", Streak, 14),
            AchievementDefinition::new("streak_30", "Monthly Master", "Keep a 30 day streak", "🏆", Streak, 30),
            AchievementDefinition::new("streak_100", "Centurion", "Keep a 100 day streak", "💯", Streak, 100),
            AchievementDefinition::new("entries_10", "Regular", "Log entries on 10 different days", "📝", Entries, 10),
            AchievementDefinition::new("entries_50", "Dedicated", "Log entries on 50 different days", "📔", Entries, 50),
            AchievementDefinition::new("entries_100", "Self-Aware", "Log entries on 100 different days", "🧠", Entries, 100),
            AchievementDefinition::new("entries_365", "Year in Review", "Log entries on 365 different days", "🌟", Entries, 365),
        ];

        Self {
            definitions: Arc::new(definitions),
        }
    }

    /// Load a catalog from a JSON array of definitions
    pub fn from_json_str(json: &str) -> Result<Self, DomainError> {
        let definitions: Vec<AchievementDefinition> = serde_json::from_str(json)
            .map_err(|e| DomainError::Validation {
                message: format!("Invalid achievement catalog: {}", e),
            })?;
        Self::new(definitions)
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, DomainError> {
        let json = std::fs::read_to_string(path).map_err(|e| DomainError::Validation {
            message: format!("Cannot read achievement catalog {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&json)
    }

    pub fn definitions(&self) -> &[AchievementDefinition] {
        &self.definitions
    }

    pub fn get(&self, key: &str) -> Option<&AchievementDefinition> {
        self.definitions.iter().find(|d| d.key == key)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions whose threshold is met and which are not unlocked yet
    ///
    /// Returned in catalog order. Feeding the result back into
    /// `unlocked_keys` makes the next call return nothing.
    pub fn evaluate_new_unlocks(
        &self,
        state: &StreakState,
        unlocked_keys: &HashSet<String>,
    ) -> Vec<AchievementDefinition> {
        self.definitions
            .iter()
            .filter(|d| !unlocked_keys.contains(&d.key))
            .filter(|d| d.should_unlock(state))
            .cloned()
            .collect()
    }
}

impl Default for AchievementCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Record of an achievement the user has earned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub achievement_key: String,
    pub unlocked_at: DateTime<Utc>,
}

impl UnlockedAchievement {
    pub fn new(achievement_key: impl Into<String>, unlocked_at: DateTime<Utc>) -> Self {
        Self {
            achievement_key: achievement_key.into(),
            unlocked_at,
        }
    }
}

/// Current-streak lengths worth celebrating
pub const STREAK_MILESTONES: [u32; 7] = [3, 7, 14, 30, 50, 100, 365];

/// Notifications derived from a progress update
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    AchievementUnlocked { achievement: AchievementDefinition },
    MilestoneReached { streak: u32 },
}

impl EngineEvent {
    /// Short user-facing text for the notification
    pub fn message(&self) -> String {
        match self {
            EngineEvent::AchievementUnlocked { achievement } => format!(
                "{} Achievement unlocked: {} ({})",
                achievement.icon, achievement.title, achievement.description
            ),
            EngineEvent::MilestoneReached { streak } => {
                format!("🎉 Milestone reached: {} day streak!", streak)
            }
        }
    }
}

/// Milestone crossed when moving from `previous` to `current` streak state
///
/// Fires only when the current streak grew and now sits exactly on a
/// milestone, so re-logging the same day does not repeat it.
pub fn milestone_reached(previous: &StreakState, current: &StreakState) -> Option<u32> {
    if current.current_streak <= previous.current_streak {
        return None;
    }
    STREAK_MILESTONES
        .iter()
        .copied()
        .find(|m| *m == current.current_streak)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(longest: u32, total: u32) -> StreakState {
        StreakState {
            current_streak: 0,
            longest_streak: longest,
            total_entries: total,
            last_entry_date: None,
        }
    }

    fn fixture_catalog() -> AchievementCatalog {
        AchievementCatalog::new(vec![
            AchievementDefinition::new("streak_7", "Week", "7 days", "🔥", AchievementCategory::Streak, 7),
            AchievementDefinition::new("entries_5", "Five", "5 days", "📝", AchievementCategory::Entries, 5),
            AchievementDefinition::new("broken", "Broken", "bad row", "?", AchievementCategory::Entries, 0),
        ])
        .unwrap()
    }

    #[test]
    fn test_streak_seven_unlocks_once() {
        let catalog = fixture_catalog();
        let s = state(7, 1);
        let unlocked: HashSet<String> = HashSet::new();

        let first = catalog.evaluate_new_unlocks(&s, &unlocked);
        let keys: Vec<&str> = first.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["streak_7", "broken"]);
        assert_eq!(keys.iter().filter(|k| **k == "streak_7").count(), 1);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let catalog = AchievementCatalog::standard();
        let s = state(30, 60);
        let mut unlocked: HashSet<String> = HashSet::new();

        let first = catalog.evaluate_new_unlocks(&s, &unlocked);
        assert!(!first.is_empty());
        unlocked.extend(first.into_iter().map(|d| d.key));

        let second = catalog.evaluate_new_unlocks(&s, &unlocked);
        assert!(second.is_empty());
    }

    #[test]
    fn test_results_follow_catalog_order() {
        let catalog = AchievementCatalog::standard();
        let found = catalog.evaluate_new_unlocks(&state(14, 10), &HashSet::new());
        let keys: Vec<&str> = found.iter().map(|d| d.key.as_str()).collect();
        assert_eq!(keys, vec!["first_entry", "streak_3", "streak_7", "streak_14", "entries_10"]);
    }

    #[test]
    fn test_progress_is_capped() {
        let def = AchievementDefinition::new("streak_7", "", "", "", AchievementCategory::Streak, 7);
        assert_eq!(def.progress_for(&state(0, 0)), 0.0);
        assert!((def.progress_for(&state(3, 0)) - 300.0 / 7.0).abs() < 1e-9);
        assert_eq!(def.progress_for(&state(21, 0)), 100.0);
    }

    #[test]
    fn test_progress_uses_entries_metric() {
        let def = AchievementDefinition::new("entries_10", "", "", "", AchievementCategory::Entries, 10);
        assert_eq!(def.progress_for(&state(50, 5)), 50.0);
    }

    #[test]
    fn test_non_positive_requirement_is_always_satisfied() {
        let def = AchievementDefinition::new("weird", "", "", "", AchievementCategory::Streak, -3);
        assert_eq!(def.progress_for(&StreakState::new()), 100.0);
        assert!(def.should_unlock(&StreakState::new()));
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = AchievementCatalog::new(vec![
            AchievementDefinition::new("a", "", "", "", AchievementCategory::Streak, 1),
            AchievementDefinition::new("a", "", "", "", AchievementCategory::Entries, 2),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"[
            {"key": "streak_2", "title": "Two", "description": "two days", "icon": "2", "category": "streak", "requirement": 2}
        ]"#;
        let catalog = AchievementCatalog::from_json_str(json).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("streak_2").map(|d| d.category), Some(AchievementCategory::Streak));
    }

    #[test]
    fn test_milestone_only_on_growth() {
        let mut before = StreakState::new();
        before.current_streak = 6;
        let mut after = before.clone();
        after.current_streak = 7;

        assert_eq!(milestone_reached(&before, &after), Some(7));
        assert_eq!(milestone_reached(&after, &after), None);

        after.current_streak = 8;
        assert_eq!(milestone_reached(&before, &after), None);
    }
}

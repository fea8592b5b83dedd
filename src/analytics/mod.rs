/// Analytics engine for streaks, achievements and mood insights
///
/// This module ties the pure computations together behind `AnalyticsEngine`,
/// which carries the injected configuration and clock. Every method is a
/// synchronous function of its inputs; record retrieval and persistence are
/// the caller's job.

pub mod correlation;
pub mod prediction;
pub mod trend;

pub use correlation::*;
pub use prediction::*;
pub use trend::*;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use chrono::{Datelike, NaiveDate};
use crate::config::AnalyticsConfig;
use crate::domain::{
    milestone_reached, AchievementCatalog, AchievementDefinition, Clock, EngineEvent, FoodRecord,
    MoodRecord, StreakState, SystemClock, WeatherRecord,
};

/// Progress towards one achievement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AchievementProgress {
    pub achievement: AchievementDefinition,
    /// Percentage in [0, 100]
    pub progress: f64,
    pub unlocked: bool,
}

/// Outcome of re-evaluating a user's streak after new activity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressUpdate {
    pub streak: StreakState,
    /// Achievements crossed by this update, in catalog order
    pub newly_unlocked: Vec<AchievementDefinition>,
    pub events: Vec<EngineEvent>,
}

/// Everything the insights view shows for one analysis window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightsReport {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    pub mood_count: usize,
    pub average_mood: Option<f64>,
    pub weather: CorrelationResult,
    pub food: CorrelationResult,
    pub day_of_week: CorrelationResult,
    pub day_of_week_averages: BTreeMap<String, f64>,
    pub trend: MoodTrend,
    /// None when there are too few moods to predict
    pub prediction: Option<MoodPrediction>,
}

/// Analytics engine for processing journal data
pub struct AnalyticsEngine {
    config: AnalyticsConfig,
    clock: Arc<dyn Clock>,
}

impl AnalyticsEngine {
    /// Create an engine with explicit configuration and clock
    pub fn new(config: AnalyticsConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn catalog(&self) -> &AchievementCatalog {
        &self.config.catalog
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Today according to the injected clock
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Inclusive date range of the trailing analysis window ending today
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        let today = self.today();
        let start = today - chrono::Duration::days(i64::from(self.config.window_days) - 1);
        (start, today)
    }

    /// Recompute streak state from every activity date
    pub fn compute_streak(&self, dates: &[NaiveDate]) -> StreakState {
        StreakState::compute(dates, self.clock.as_ref())
    }

    /// Achievements newly earned by `state`
    pub fn evaluate_new_unlocks(
        &self,
        state: &StreakState,
        unlocked_keys: &HashSet<String>,
    ) -> Vec<AchievementDefinition> {
        self.config.catalog.evaluate_new_unlocks(state, unlocked_keys)
    }

    /// Compare a fresh streak with the previously stored one
    ///
    /// Produces the new unlocks and the notification events for them, plus a
    /// milestone event when the current streak just landed on one.
    pub fn progress_update(
        &self,
        previous: &StreakState,
        current: StreakState,
        unlocked_keys: &HashSet<String>,
    ) -> ProgressUpdate {
        let newly_unlocked = self.evaluate_new_unlocks(&current, unlocked_keys);

        let mut events: Vec<EngineEvent> = newly_unlocked
            .iter()
            .cloned()
            .map(|achievement| EngineEvent::AchievementUnlocked { achievement })
            .collect();

        if let Some(streak) = milestone_reached(previous, &current) {
            events.push(EngineEvent::MilestoneReached { streak });
        }

        ProgressUpdate {
            streak: current,
            newly_unlocked,
            events,
        }
    }

    /// Progress towards every catalog entry
    pub fn achievement_progress(
        &self,
        state: &StreakState,
        unlocked_keys: &HashSet<String>,
    ) -> Vec<AchievementProgress> {
        self.config
            .catalog
            .definitions()
            .iter()
            .map(|definition| {
                let unlocked = unlocked_keys.contains(&definition.key);
                AchievementProgress {
                    achievement: definition.clone(),
                    progress: if unlocked { 100.0 } else { definition.progress_for(state) },
                    unlocked,
                }
            })
            .collect()
    }

    pub fn weather_correlation(
        &self,
        moods: &[MoodRecord],
        weather: &[WeatherRecord],
    ) -> CorrelationResult {
        CorrelationResult::compute(
            "weather",
            moods,
            weather,
            weather_score,
            self.config.correlation_method,
        )
    }

    pub fn food_correlation(
        &self,
        moods: &[MoodRecord],
        foods: &[FoodRecord],
    ) -> CorrelationResult {
        CorrelationResult::compute("food", moods, foods, food_score, self.config.correlation_method)
    }

    /// Weekday effect for today's weekday
    pub fn day_of_week_correlation(&self, moods: &[MoodRecord]) -> CorrelationResult {
        let target = self.today().weekday();
        let data_points = moods.iter().filter(|m| m.date.weekday() == target).count();

        CorrelationResult {
            factor: "day_of_week".to_string(),
            correlation: day_of_week_correlation(moods, target),
            data_points,
        }
    }

    /// Build the full insights report for records inside the window
    pub fn analyze(
        &self,
        moods: &[MoodRecord],
        weather: &[WeatherRecord],
        foods: &[FoodRecord],
    ) -> InsightsReport {
        let (window_start, window_end) = self.window();

        let weather_result = self.weather_correlation(moods, weather);
        let food_result = self.food_correlation(moods, foods);
        let day_result = self.day_of_week_correlation(moods);

        let prediction = predict(
            moods,
            weather_result.correlation,
            food_result.correlation,
            day_result.correlation,
            self.today().weekday(),
        );

        let average_mood = if moods.is_empty() {
            None
        } else {
            Some(moods.iter().map(|m| m.mood_value).sum::<f64>() / moods.len() as f64)
        };

        tracing::debug!(
            "Analyzed {} moods, {} weather and {} food records",
            moods.len(),
            weather.len(),
            foods.len()
        );

        InsightsReport {
            window_start,
            window_end,
            mood_count: moods.len(),
            average_mood,
            weather: weather_result,
            food: food_result,
            day_of_week: day_result,
            day_of_week_averages: day_of_week_averages(moods),
            trend: mood_trend(moods),
            prediction,
        }
    }
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new(AnalyticsConfig::default(), Arc::new(SystemClock))
    }
}

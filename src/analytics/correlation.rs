/// Mood correlation scoring
///
/// Correlations here are a lightweight heuristic, not a statistical
/// coefficient: each day that has both a mood and a context record gets a
/// signed factor score, multiplied by the normalized mood, and the products
/// are averaged. `pearson` is offered as the statistical alternative.
///
/// Inputs are assumed pre-validated by the caller (no missing dates/values).

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use chrono::{Datelike, NaiveDate, Weekday};
use crate::domain::{Dated, FoodRecord, MoodRecord, WeatherRecord};

/// Score for a clear or sunny day
pub const CLEAR_WEATHER_SCORE: f64 = 1.0;
/// Score for any other weather
pub const OTHER_WEATHER_SCORE: f64 = -0.5;
/// Score for a day with at least one healthy food
pub const HEALTHY_FOOD_SCORE: f64 = 0.5;
/// Score for a day without healthy food
pub const OTHER_FOOD_SCORE: f64 = -0.3;

/// Keywords that mark a food as healthy (substring match, case-insensitive)
pub const HEALTHY_FOOD_KEYWORDS: [&str; 16] = [
    "salad", "fruit", "vegetable", "veggie", "apple", "banana", "berries", "broccoli",
    "spinach", "fish", "salmon", "nuts", "yogurt", "oat", "beans", "water",
];

/// How a correlation coefficient is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Average of factor score times normalized mood
    #[default]
    Heuristic,
    /// Pearson coefficient between factor score and normalized mood
    Pearson,
}

/// Correlation between mood and one contextual factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub factor: String,
    /// In [-1, 1]; exactly 0 when there are no data points
    pub correlation: f64,
    /// Number of days that had both a mood and a context record
    pub data_points: usize,
}

impl CorrelationResult {
    /// Score `context` against `moods` using the chosen method
    pub fn compute<R: Dated>(
        factor: &str,
        moods: &[MoodRecord],
        context: &[R],
        scoring_fn: impl Fn(&R) -> f64,
        method: CorrelationMethod,
    ) -> Self {
        let pairs = matched_pairs(moods, context, scoring_fn);
        let correlation = match method {
            CorrelationMethod::Heuristic => average_product(&pairs),
            CorrelationMethod::Pearson => pearson(&pairs),
        };

        Self {
            factor: factor.to_string(),
            correlation,
            data_points: pairs.len(),
        }
    }

    /// Plain-language strength of the relationship
    pub fn strength_label(&self) -> &'static str {
        if self.data_points == 0 {
            return "no data";
        }
        match self.correlation.abs() {
            x if x >= 0.5 => "strong",
            x if x >= 0.2 => "moderate",
            _ => "weak",
        }
    }
}

/// Heuristic correlation between mood and a context series
///
/// Returns exactly 0 when no context record shares a date with a mood record.
pub fn correlate<R: Dated>(
    moods: &[MoodRecord],
    context: &[R],
    scoring_fn: impl Fn(&R) -> f64,
) -> f64 {
    average_product(&matched_pairs(moods, context, scoring_fn))
}

/// +1 for clear or sunny weather, -0.5 otherwise
pub fn weather_score(record: &WeatherRecord) -> f64 {
    let condition = record.condition.to_lowercase();
    if condition.contains("clear") || condition.contains("sunny") {
        CLEAR_WEATHER_SCORE
    } else {
        OTHER_WEATHER_SCORE
    }
}

/// +0.5 when any food matches a healthy keyword, -0.3 otherwise
pub fn food_score(record: &FoodRecord) -> f64 {
    let healthy = record.foods.iter().any(|food| {
        let food = food.to_lowercase();
        HEALTHY_FOOD_KEYWORDS.iter().any(|k| food.contains(k))
    });
    if healthy {
        HEALTHY_FOOD_SCORE
    } else {
        OTHER_FOOD_SCORE
    }
}

/// Average normalized mood per weekday name
///
/// Weekdays without records are left out rather than reported as zero.
pub fn day_of_week_averages(moods: &[MoodRecord]) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for mood in moods {
        let slot = sums
            .entry(weekday_name(mood.date.weekday()).to_string())
            .or_insert((0.0, 0));
        slot.0 += mood.normalized();
        slot.1 += 1;
    }

    sums.into_iter()
        .map(|(day, (sum, count))| (day, sum / count as f64))
        .collect()
}

/// How a weekday's normalized mood compares with the overall average
///
/// Positive when the weekday tends to be better than usual. Zero when there
/// are no records at all or none on that weekday.
pub fn day_of_week_correlation(moods: &[MoodRecord], weekday: Weekday) -> f64 {
    if moods.is_empty() {
        return 0.0;
    }

    let overall = moods.iter().map(|m| m.normalized()).sum::<f64>() / moods.len() as f64;
    match day_of_week_averages(moods).get(weekday_name(weekday)) {
        Some(day_average) => day_average - overall,
        None => 0.0,
    }
}

/// Pearson coefficient over (factor score, normalized mood) pairs
///
/// Zero for fewer than two pairs or when either side has no variance.
pub fn pearson(pairs: &[(f64, f64)]) -> f64 {
    if pairs.len() < 2 {
        return 0.0;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator <= f64::EPSILON {
        return 0.0;
    }
    (covariance / denominator).clamp(-1.0, 1.0)
}

/// Full English weekday name
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Join context records to moods by exact date
///
/// When several moods share a date, the first one in input order is used.
fn matched_pairs<R: Dated>(
    moods: &[MoodRecord],
    context: &[R],
    scoring_fn: impl Fn(&R) -> f64,
) -> Vec<(f64, f64)> {
    let mut mood_by_date: HashMap<NaiveDate, f64> = HashMap::with_capacity(moods.len());
    for mood in moods {
        mood_by_date.entry(mood.date).or_insert_with(|| mood.normalized());
    }

    context
        .iter()
        .filter_map(|record| {
            mood_by_date
                .get(&record.date())
                .map(|normalized| (scoring_fn(record), *normalized))
        })
        .collect()
}

fn average_product(pairs: &[(f64, f64)]) -> f64 {
    if pairs.is_empty() {
        return 0.0;
    }
    let total: f64 = pairs.iter().map(|(score, mood)| score * mood).sum();
    (total / pairs.len() as f64).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_no_moods_gives_exact_zero() {
        let weather = vec![WeatherRecord::new(day(1, 1), "Clear", 20.0)];
        let result = correlate(&[], &weather, weather_score);
        assert_eq!(result, 0.0);
        assert!(!result.is_nan());
    }

    #[test]
    fn test_no_matching_dates_gives_zero() {
        let moods = vec![MoodRecord::new(day(1, 2), 5.0)];
        let weather = vec![WeatherRecord::new(day(1, 1), "Clear", 20.0)];
        let result = CorrelationResult::compute("weather", &moods, &weather, weather_score, CorrelationMethod::Heuristic);
        assert_eq!(result.correlation, 0.0);
        assert_eq!(result.data_points, 0);
        assert_eq!(result.strength_label(), "no data");
    }

    #[test]
    fn test_weather_heuristic_arithmetic() {
        let moods = vec![MoodRecord::new(day(1, 1), 5.0), MoodRecord::new(day(1, 2), 2.5)];
        let weather = vec![
            WeatherRecord::new(day(1, 1), "Sunny", 25.0),
            WeatherRecord::new(day(1, 2), "Rain", 10.0),
        ];
        // (1.0 * 1.0 + -0.5 * 0.5) / 2
        let result = correlate(&moods, &weather, weather_score);
        assert!((result - 0.375).abs() < 1e-9);
    }

    #[test]
    fn test_food_scores() {
        let healthy = FoodRecord::new(day(1, 1), vec!["Greek Yogurt".to_string()]);
        let other = FoodRecord::new(day(1, 1), vec!["chocolate".to_string(), "pizza".to_string()]);
        assert_eq!(food_score(&healthy), HEALTHY_FOOD_SCORE);
        assert_eq!(food_score(&other), OTHER_FOOD_SCORE);
    }

    #[test]
    fn test_first_mood_wins_on_duplicate_dates() {
        let moods = vec![MoodRecord::new(day(1, 1), 5.0), MoodRecord::new(day(1, 1), 1.0)];
        let weather = vec![WeatherRecord::new(day(1, 1), "clear sky", 20.0)];
        assert_eq!(correlate(&moods, &weather, weather_score), 1.0);
    }

    #[test]
    fn test_day_of_week_averages_omit_empty_days() {
        // 2024-01-01 is a Monday
        let moods = vec![
            MoodRecord::new(day(1, 1), 5.0),
            MoodRecord::new(day(1, 8), 3.0),
            MoodRecord::new(day(1, 2), 1.0),
        ];
        let averages = day_of_week_averages(&moods);

        assert_eq!(averages.len(), 2);
        assert!((averages["Monday"] - 0.8).abs() < 1e-9);
        assert!((averages["Tuesday"] - 0.2).abs() < 1e-9);
        assert!(!averages.contains_key("Sunday"));
    }

    #[test]
    fn test_day_of_week_correlation() {
        let moods = vec![
            MoodRecord::new(day(1, 1), 5.0),
            MoodRecord::new(day(1, 2), 1.0),
        ];
        // overall 0.6, Tuesday 0.2
        assert!((day_of_week_correlation(&moods, Weekday::Tue) + 0.4).abs() < 1e-9);
        assert_eq!(day_of_week_correlation(&moods, Weekday::Sun), 0.0);
        assert_eq!(day_of_week_correlation(&[], Weekday::Mon), 0.0);
    }

    #[test]
    fn test_pearson_perfect_and_degenerate() {
        let pairs = vec![(1.0, 0.8), (-0.5, 0.2), (1.0, 0.8), (-0.5, 0.2)];
        assert!((pearson(&pairs) - 1.0).abs() < 1e-9);

        let flat = vec![(1.0, 0.2), (1.0, 0.8)];
        assert_eq!(pearson(&flat), 0.0);
        assert_eq!(pearson(&[]), 0.0);
    }

    #[test]
    fn test_pearson_method_through_compute() {
        let moods = vec![MoodRecord::new(day(1, 1), 5.0), MoodRecord::new(day(1, 2), 1.0)];
        let weather = vec![
            WeatherRecord::new(day(1, 1), "Clear", 20.0),
            WeatherRecord::new(day(1, 2), "Rain", 8.0),
        ];
        let result = CorrelationResult::compute("weather", &moods, &weather, weather_score, CorrelationMethod::Pearson);
        assert!((result.correlation - 1.0).abs() < 1e-9);
        assert_eq!(result.data_points, 2);
        assert_eq!(result.strength_label(), "strong");
    }
}

use std::sync::Arc;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use mood_journal_mcp::analytics::{
    correlate, day_of_week_averages, food_score, predict, weather_score, MIN_RECORDS_FOR_PREDICTION,
};
use mood_journal_mcp::*;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

#[test]
fn test_mood_label_mapping() {
    assert_eq!(mood_value("Sad"), 1.0);
    assert_eq!(mood_value("Neutral"), 2.0);
    assert_eq!(mood_value("Happy"), 3.0);
    assert_eq!(mood_value("Very Happy"), 4.0);
    assert_eq!(mood_value("Ecstatic"), 5.0);
    assert_eq!(mood_value("Grumpy"), DEFAULT_MOOD_VALUE);
}

#[test]
fn test_correlate_without_moods_is_zero() {
    let weather = vec![WeatherRecord::new(day(1, 1), "Sunny", 20.0)];
    let value = correlate(&[], &weather, weather_score);

    assert_eq!(value, 0.0);
    assert!(!value.is_nan());
}

#[test]
fn test_weather_correlation_matches_by_date() {
    let moods = vec![MoodRecord::new(day(1, 1), 3.0), MoodRecord::new(day(1, 2), 1.0)];
    let weather = vec![
        WeatherRecord::new(day(1, 1), "Sunny", 22.0),
        WeatherRecord::new(day(1, 2), "Rain", 9.0),
        // No mood that day
        WeatherRecord::new(day(1, 3), "Clear", 18.0),
    ];

    // (1.0 * 0.6 + -0.5 * 0.2) / 2
    let value = correlate(&moods, &weather, weather_score);
    assert!((value - 0.25).abs() < 1e-9);
}

#[test]
fn test_food_correlation_uses_keywords() {
    let moods = vec![MoodRecord::new(day(2, 1), 5.0), MoodRecord::new(day(2, 2), 5.0)];
    let foods = vec![
        FoodRecord::new(day(2, 1), vec!["Greek Yogurt".to_string()]),
        FoodRecord::new(day(2, 2), vec!["chocolate".to_string(), "chips".to_string()]),
    ];

    // (0.5 * 1.0 + -0.3 * 1.0) / 2
    let value = correlate(&moods, &foods, food_score);
    assert!((value - 0.1).abs() < 1e-9);
}

#[test]
fn test_weekday_averages_skip_empty_days() {
    // 2024-01-01 is a Monday
    let moods = vec![
        MoodRecord::new(day(1, 1), 5.0),
        MoodRecord::new(day(1, 8), 3.0),
        MoodRecord::new(day(1, 3), 1.0),
    ];

    let averages = day_of_week_averages(&moods);
    assert_eq!(averages.len(), 2);
    assert!((averages["Monday"] - 0.8).abs() < 1e-9);
    assert!((averages["Wednesday"] - 0.2).abs() < 1e-9);
    assert!(!averages.contains_key("Sunday"));
}

#[test]
fn test_prediction_needs_five_moods() {
    let moods: Vec<MoodRecord> = (1..MIN_RECORDS_FOR_PREDICTION as u32)
        .map(|d| MoodRecord::new(day(3, d), 4.0))
        .collect();

    assert!(predict(&moods, 0.5, 0.5, 0.5, Weekday::Mon).is_none());
}

#[test]
fn test_prediction_scenario() {
    let moods: Vec<MoodRecord> = (1..=10).map(|d| MoodRecord::new(day(3, d), 4.0)).collect();

    let prediction = predict(&moods, 0.5, 0.0, 0.0, Weekday::Mon).unwrap();
    assert_eq!(prediction.predicted_mood, 8.3);
    assert_eq!(prediction.confidence, 0.7);
    // 0.7 is not above the encouragement threshold
    assert!(prediction.recommendations.is_empty());
    assert_eq!(prediction.factors["weather"], 0.5);
}

#[test]
fn test_prediction_is_clamped_and_confidence_capped() {
    let moods: Vec<MoodRecord> = (1..=30).map(|d| MoodRecord::new(day(4, d), 5.0)).collect();

    let prediction = predict(&moods, 1.0, 1.0, 1.0, Weekday::Fri).unwrap();
    assert_eq!(prediction.predicted_mood, 10.0);
    assert_eq!(prediction.confidence, 0.95);
}

#[test]
fn test_recommendations_fire_in_order() {
    let moods: Vec<MoodRecord> = (1..=20).map(|d| MoodRecord::new(day(5, d), 2.0)).collect();

    let prediction = predict(&moods, -0.5, -0.25, -0.3, Weekday::Tue).unwrap();
    assert_eq!(prediction.recommendations.len(), 4);
    assert!(prediction.recommendations[0].contains("indoor"));
    assert!(prediction.recommendations[1].contains("fruit"));
    assert!(prediction.recommendations[2].starts_with("Tuesday"));
    assert!(prediction.recommendations[3].contains("Keep tracking"));
}

#[test]
fn test_engine_flags_todays_low_weekday() {
    // Wednesday
    let today = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
    let engine = AnalyticsEngine::new(AnalyticsConfig::default(), Arc::new(FixedClock::new(today)));

    let moods: Vec<MoodRecord> = (1..=31)
        .map(|d| {
            let date = NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
            let value = if date.weekday() == Weekday::Wed { 1.0 } else { 5.0 };
            MoodRecord::new(date, value)
        })
        .collect();

    let report = engine.analyze(&moods, &[], &[]);
    assert_eq!(report.mood_count, 31);
    assert_eq!(report.weather.data_points, 0);
    assert_eq!(report.weather.correlation, 0.0);
    assert_eq!(report.day_of_week.data_points, 5);
    // 0.2 on Wednesdays against 27/31 overall
    assert!((report.day_of_week.correlation - (0.2 - 27.0 / 31.0)).abs() < 1e-9);

    let prediction = report.prediction.unwrap();
    assert!(prediction
        .recommendations
        .iter()
        .any(|r| r.starts_with("Wednesday has historically been a lower day")));
}

#[test]
fn test_other_weekdays_do_not_drag_today() {
    // Thursday, while Wednesdays are the bad days
    let today = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let engine = AnalyticsEngine::new(AnalyticsConfig::default(), Arc::new(FixedClock::new(today)));

    let moods: Vec<MoodRecord> = (0..28i64)
        .map(|offset| {
            let date = today - Duration::days(offset);
            let value = if date.weekday() == Weekday::Wed { 1.0 } else { 5.0 };
            MoodRecord::new(date, value)
        })
        .collect();

    let report = engine.analyze(&moods, &[], &[]);
    assert!(report.day_of_week.correlation > 0.0);
    let prediction = report.prediction.unwrap();
    assert!(!prediction.recommendations.iter().any(|r| r.contains("historically")));
}

#[test]
fn test_pearson_method_is_selectable() {
    let today = day(7, 10);
    let config = AnalyticsConfig::new(30, CorrelationMethod::Pearson, None).unwrap();
    let engine = AnalyticsEngine::new(config, Arc::new(FixedClock::new(today)));

    let moods: Vec<MoodRecord> = (1..=6).map(|d| MoodRecord::new(day(7, d), if d % 2 == 0 { 5.0 } else { 1.0 })).collect();
    let weather: Vec<WeatherRecord> = (1..=6)
        .map(|d| WeatherRecord::new(day(7, d), if d % 2 == 0 { "Clear" } else { "Storm" }, 15.0))
        .collect();

    let result = engine.weather_correlation(&moods, &weather);
    assert!((result.correlation - 1.0).abs() < 1e-9);
    assert_eq!(result.data_points, 6);
    assert_eq!(result.strength_label(), "strong");
}

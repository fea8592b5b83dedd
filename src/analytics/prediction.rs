/// Next-mood estimate from recent moods and factor correlations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use chrono::Weekday;
use crate::analytics::weekday_name;
use crate::domain::MoodRecord;

/// Fewer mood records than this yields no prediction
pub const MIN_RECORDS_FOR_PREDICTION: usize = 5;

const WEATHER_WEIGHT: f64 = 0.3;
const FOOD_WEIGHT: f64 = 0.3;
const DAY_WEIGHT: f64 = 0.4;
const BASE_CONFIDENCE: f64 = 0.5;
const CONFIDENCE_PER_RECORD: f64 = 0.02;
const MAX_CONFIDENCE: f64 = 0.95;

/// Best-effort estimate of tomorrow's mood
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodPrediction {
    /// On the 2..=10 display scale, one decimal
    pub predicted_mood: f64,
    /// In [0, 0.95], two decimals
    pub confidence: f64,
    /// Correlation inputs keyed by factor name
    pub factors: BTreeMap<String, f64>,
    pub recommendations: Vec<String>,
}

/// Combine the average mood with weighted factor correlations
///
/// `weekday` is the day being predicted, named in the low-day
/// recommendation. Returns `None` when there are fewer than
/// `MIN_RECORDS_FOR_PREDICTION` moods.
pub fn predict(
    moods: &[MoodRecord],
    weather_corr: f64,
    food_corr: f64,
    day_corr: f64,
    weekday: Weekday,
) -> Option<MoodPrediction> {
    if moods.len() < MIN_RECORDS_FOR_PREDICTION {
        return None;
    }

    let avg_mood = moods.iter().map(|m| m.mood_value).sum::<f64>() / moods.len() as f64;

    let base_prediction = (avg_mood
        + WEATHER_WEIGHT * weather_corr
        + FOOD_WEIGHT * food_corr
        + DAY_WEIGHT * day_corr)
        .clamp(1.0, 5.0);

    let predicted_mood = round_to(base_prediction * 2.0, 1);
    let confidence = round_to(
        (BASE_CONFIDENCE + CONFIDENCE_PER_RECORD * moods.len() as f64).min(MAX_CONFIDENCE),
        2,
    );

    let mut factors = BTreeMap::new();
    factors.insert("weather".to_string(), weather_corr);
    factors.insert("food".to_string(), food_corr);
    factors.insert("day_of_week".to_string(), day_corr);

    let mut recommendations = Vec::new();
    if weather_corr < -0.3 {
        recommendations.push(
            "Gloomy weather tends to pull your mood down. Plan some indoor activities you enjoy.".to_string(),
        );
    }
    if food_corr < -0.2 {
        recommendations.push(
            "Your meals seem linked to lower moods. Try adding more fruit, vegetables or whole foods.".to_string(),
        );
    }
    if day_corr < -0.2 {
        recommendations.push(format!(
            "{} has historically been a lower day for you. Schedule something uplifting.",
            weekday_name(weekday)
        ));
    }
    if confidence > 0.7 {
        recommendations.push(
            "Your predictions are getting more reliable. Keep tracking to sharpen them further!".to_string(),
        );
    }

    Some(MoodPrediction {
        predicted_mood,
        confidence,
        factors,
        recommendations,
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

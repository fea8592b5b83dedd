/// Direction of mood over the analysis window

use serde::{Deserialize, Serialize};
use crate::domain::MoodRecord;

/// Minimum records needed to call a trend
pub const MIN_RECORDS_FOR_TREND: usize = 4;
/// Change in mean raw mood (1..=5 scale) that counts as movement
pub const TREND_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodTrend {
    Improving,
    Declining,
    Stable,
    InsufficientData,
}

impl MoodTrend {
    pub fn description(&self) -> &'static str {
        match self {
            MoodTrend::Improving => "📈 Your mood has been improving lately",
            MoodTrend::Declining => "📉 Your mood has dipped recently. Be kind to yourself",
            MoodTrend::Stable => "➡️ Your mood has been steady",
            MoodTrend::InsufficientData => "Not enough mood entries to spot a trend yet",
        }
    }
}

/// Compare the older half of the window with the newer half
pub fn mood_trend(moods: &[MoodRecord]) -> MoodTrend {
    if moods.len() < MIN_RECORDS_FOR_TREND {
        return MoodTrend::InsufficientData;
    }

    let mut sorted: Vec<&MoodRecord> = moods.iter().collect();
    sorted.sort_by_key(|m| m.date);

    let (older, newer) = sorted.split_at(sorted.len() / 2);
    let mean = |records: &[&MoodRecord]| {
        records.iter().map(|m| m.mood_value).sum::<f64>() / records.len() as f64
    };

    let change = mean(newer) - mean(older);
    if change > TREND_THRESHOLD {
        MoodTrend::Improving
    } else if change < -TREND_THRESHOLD {
        MoodTrend::Declining
    } else {
        MoodTrend::Stable
    }
}

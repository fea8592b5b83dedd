/// Tool for mood insights and predictions
///
/// This module implements the mood_insights MCP tool: it fetches the
/// trailing window of moods, weather and food, then runs the correlation,
/// trend and prediction analytics over them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use crate::analytics::{AnalyticsEngine, CorrelationResult, InsightsReport, MIN_RECORDS_FOR_PREDICTION};
use crate::domain::UserId;
use crate::storage::RecordSource;
use crate::tools::ToolError;

/// Parameters for requesting insights
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct InsightsParams {
    /// 'correlations', 'prediction' or 'all' (default: all)
    pub insight_type: Option<String>,
}

/// Response with the full report and a readable summary
#[derive(Debug, Serialize)]
pub struct InsightsResponse {
    pub report: InsightsReport,
    pub message: String,
}

/// Fetch the analysis window and build insights
pub async fn get_mood_insights<R: RecordSource + Sync>(
    source: &R,
    analytics: &AnalyticsEngine,
    user_id: &UserId,
    params: InsightsParams,
) -> Result<InsightsResponse, ToolError> {
    let (from, to) = analytics.window();

    let (moods, weather, foods) = futures::try_join!(
        source.fetch_mood_records(user_id, from, to),
        source.fetch_weather_records(user_id, from, to),
        source.fetch_food_records(user_id, from, to),
    )?;

    let report = analytics.analyze(&moods, &weather, &foods);

    let insight_type = params
        .insight_type
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_else(|| "all".to_string());

    let mut sections = vec![format!(
        "🧠 Mood insights {} to {} ({} mood entries)",
        report.window_start, report.window_end, report.mood_count
    )];

    if insight_type == "all" || insight_type == "correlations" {
        sections.push(correlation_section(&report));
    }
    if insight_type == "all" || insight_type == "prediction" {
        sections.push(prediction_section(&report));
    }

    Ok(InsightsResponse {
        message: sections.join("\n\n"),
        report,
    })
}

fn describe(result: &CorrelationResult) -> String {
    if result.data_points == 0 {
        format!("- {}: no overlapping days yet", result.factor)
    } else {
        format!(
            "- {}: {:+.2} ({}, {} days)",
            result.factor,
            result.correlation,
            result.strength_label(),
            result.data_points
        )
    }
}

fn correlation_section(report: &InsightsReport) -> String {
    let mut lines = vec!["🔗 Correlations".to_string()];
    lines.push(describe(&report.weather));
    lines.push(describe(&report.food));
    lines.push(describe(&report.day_of_week));

    if !report.day_of_week_averages.is_empty() {
        let best = report
            .day_of_week_averages
            .iter()
            .max_by(|a, b| a.1.total_cmp(b.1));
        let worst = report
            .day_of_week_averages
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1));
        if let (Some(best), Some(worst)) = (best, worst) {
            lines.push(format!("- Best day: {} | Toughest day: {}", best.0, worst.0));
        }
    }

    lines.push(report.trend.description().to_string());
    lines.join("\n")
}

fn prediction_section(report: &InsightsReport) -> String {
    match &report.prediction {
        None => format!(
            "🔮 Prediction: log at least {} moods in this window to get one",
            MIN_RECORDS_FOR_PREDICTION
        ),
        Some(prediction) => {
            let mut lines = vec![format!(
                "🔮 Predicted mood tomorrow: {:.1}/10 (confidence {:.0}%)",
                prediction.predicted_mood,
                prediction.confidence * 100.0
            )];
            lines.extend(prediction.recommendations.iter().map(|r| format!("💡 {}", r)));
            lines.join("\n")
        }
    }
}

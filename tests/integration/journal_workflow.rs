use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use mood_journal_mcp::tools::{
    get_mood_insights, get_streak_status, log_food, log_mood, log_weather, InsightsParams,
    LogFoodParams, LogMoodParams, LogWeatherParams, StreakStatusParams,
};
use mood_journal_mcp::*;
use tempfile::{NamedTempFile, TempDir};

fn engine(today: NaiveDate, config: AnalyticsConfig) -> AnalyticsEngine {
    AnalyticsEngine::new(config, Arc::new(FixedClock::new(today)))
}

fn mood(mood: &str, date: &str) -> LogMoodParams {
    LogMoodParams {
        mood: mood.to_string(),
        date: Some(date.to_string()),
        note: None,
    }
}

#[tokio::test]
async fn test_server_opens_database_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("journal.db");

    let server = MoodJournalServer::new(db_path.clone(), AnalyticsConfig::default(), UserId::default())
        .await
        .expect("Failed to create server");

    assert!(db_path.exists());
    assert_eq!(server.user().as_str(), "local");
    assert_eq!(server.storage().get_streak(server.user()).unwrap(), StreakState::default());
}

#[test]
fn test_progress_survives_reopen() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_file.path().to_path_buf();
    let user = UserId::new("sam");
    let today = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();

    {
        let storage = SqliteStorage::new(db_path.clone()).expect("Failed to create storage");
        let analytics = engine(today, AnalyticsConfig::default());
        for date in ["2024-05-01", "2024-05-02", "2024-05-03"] {
            log_mood(&storage, &analytics, &user, mood("Happy", date)).unwrap();
        }
    }

    let storage = SqliteStorage::new(db_path).expect("Failed to reopen storage");
    let streak = storage.get_streak(&user).unwrap();
    assert_eq!(streak.current_streak, 3);
    assert_eq!(streak.last_entry_date, Some(today));

    let keys: Vec<String> = storage
        .get_unlocked_achievements(&user)
        .unwrap()
        .into_iter()
        .map(|u| u.achievement_key)
        .collect();
    assert!(keys.contains(&"first_entry".to_string()));
    assert!(keys.contains(&"streak_3".to_string()));

    // Another user's journal is untouched
    assert!(storage.get_activity_dates(&UserId::new("alex")).unwrap().is_empty());
}

#[test]
fn test_unlocks_are_never_revoked() {
    let storage = SqliteStorage::in_memory().unwrap();
    let user = UserId::default();

    let start = NaiveDate::from_ymd_opt(2024, 8, 7).unwrap();
    let analytics = engine(start, AnalyticsConfig::default());
    for d in 1..=7 {
        log_food(
            &storage,
            &analytics,
            &user,
            LogFoodParams {
                foods: vec!["banana".to_string()],
                date: Some(format!("2024-08-{:02}", d)),
                note: None,
            },
        )
        .unwrap();
    }

    // Two weeks of silence
    let later = engine(NaiveDate::from_ymd_opt(2024, 8, 21).unwrap(), AnalyticsConfig::default());
    let status = get_streak_status(&storage, &later, &user, StreakStatusParams::default()).unwrap();

    assert_eq!(status.streak.current_streak, 0);
    assert_eq!(status.streak.longest_streak, 7);
    let week = status
        .achievements
        .iter()
        .find(|p| p.achievement.key == "streak_7")
        .unwrap();
    assert!(week.unlocked);
    assert_eq!(week.progress, 100.0);
}

#[test]
fn test_custom_catalog_from_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        r#"[{{"key":"double","title":"Double","description":"Two days","icon":"✌️","category":"entries","requirement":2}}]"#
    )
    .unwrap();

    let config = AnalyticsConfig::new(14, CorrelationMethod::Heuristic, Some(file.path())).unwrap();
    assert_eq!(config.catalog.len(), 1);

    let storage = SqliteStorage::in_memory().unwrap();
    let user = UserId::default();
    let analytics = engine(NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(), config);

    let first = log_mood(&storage, &analytics, &user, mood("Sad", "2024-01-20")).unwrap();
    assert!(first.progress.unwrap().newly_unlocked.is_empty());

    let second = log_mood(&storage, &analytics, &user, mood("Neutral", "2024-01-25")).unwrap();
    let progress = second.progress.unwrap();
    assert_eq!(progress.newly_unlocked.len(), 1);
    assert_eq!(progress.newly_unlocked[0].key, "double");
    assert_eq!(progress.streak.current_streak, 0);
}

#[test]
fn test_bad_window_is_rejected() {
    assert!(matches!(
        AnalyticsConfig::new(0, CorrelationMethod::Heuristic, None),
        Err(ConfigError::InvalidWindow { got: 0, .. })
    ));
    assert!(AnalyticsConfig::new(366, CorrelationMethod::Heuristic, None).is_err());
}

#[test]
fn test_sunny_days_show_up_in_insights() {
    let storage = SqliteStorage::in_memory().unwrap();
    let user = UserId::default();
    let today = NaiveDate::from_ymd_opt(2024, 10, 10).unwrap();
    let analytics = engine(today, AnalyticsConfig::default());

    for d in 1..=10 {
        let date = format!("2024-10-{:02}", d);
        let sunny = d % 2 == 0;
        log_mood(&storage, &analytics, &user, mood(if sunny { "Ecstatic" } else { "Sad" }, &date)).unwrap();
        log_weather(
            &storage,
            &analytics,
            &user,
            LogWeatherParams {
                condition: if sunny { "Sunny" } else { "Overcast" }.to_string(),
                temperature: 16.0,
                date: Some(date),
            },
        )
        .unwrap();
    }

    let response = tokio_test::block_on(get_mood_insights(&storage, &analytics, &user, InsightsParams::default()))
        .unwrap();

    // (5 * 1.0 * 1.0 + 5 * -0.5 * 0.2) / 10
    assert!((response.report.weather.correlation - 0.45).abs() < 1e-9);
    assert_eq!(response.report.weather.data_points, 10);
    assert_eq!(response.report.food.data_points, 0);
    assert!(response.report.prediction.is_some());
    assert!(response.message.contains("Correlations"));
}

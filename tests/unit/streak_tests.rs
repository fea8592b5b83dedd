use std::collections::HashSet;

use chrono::{Duration, NaiveDate};
use mood_journal_mcp::*;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_three_consecutive_days() {
    let dates = [day(2024, 1, 1), day(2024, 1, 2), day(2024, 1, 3)];
    let state = StreakState::compute_as_of(&dates, day(2024, 1, 3));

    assert_eq!(state.current_streak, 3);
    assert_eq!(state.longest_streak, 3);
    assert_eq!(state.total_entries, 3);
    assert_eq!(state.last_entry_date, Some(day(2024, 1, 3)));
}

#[test]
fn test_gap_resets_current_streak() {
    let dates = [day(2024, 1, 1), day(2024, 1, 5)];
    let state = StreakState::compute_as_of(&dates, day(2024, 1, 5));

    assert_eq!(state.current_streak, 1);
    assert_eq!(state.longest_streak, 1);
    assert_eq!(state.total_entries, 2);
}

#[test]
fn test_empty_history() {
    let state = StreakState::compute_as_of(&[], day(2024, 1, 5));
    assert_eq!(state, StreakState::default());
    assert_eq!(state.last_entry_date, None);
}

#[test]
fn test_consecutive_run_ending_today_is_fully_counted() {
    let today = day(2024, 3, 31);
    for len in 1..=40i64 {
        let dates: Vec<NaiveDate> = (0..len).map(|i| today - Duration::days(i)).collect();
        let state = StreakState::compute_as_of(&dates, today);
        assert_eq!(state.current_streak as i64, len);
        assert_eq!(state.longest_streak, state.current_streak);
    }
}

#[test]
fn test_longest_never_below_current() {
    let today = day(2024, 1, 11);
    let histories: Vec<Vec<NaiveDate>> = vec![
        (1..=5).map(|d| day(2024, 1, d)).chain([day(2024, 1, 10), day(2024, 1, 11)]).collect(),
        vec![day(2024, 1, 10), day(2024, 1, 10), day(2024, 1, 11)],
        vec![day(2023, 12, 31), day(2024, 1, 1)],
        vec![day(2024, 1, 12)],
    ];

    for dates in histories {
        let state = StreakState::compute_as_of(&dates, today);
        assert!(state.longest_streak >= state.current_streak, "{:?}", dates);
    }

    let state = StreakState::compute_as_of(
        &(1..=5).map(|d| day(2024, 1, d)).chain([day(2024, 1, 10), day(2024, 1, 11)]).collect::<Vec<_>>(),
        today,
    );
    assert_eq!(state.current_streak, 2);
    assert_eq!(state.longest_streak, 5);
}

#[test]
fn test_malformed_dates_are_dropped() {
    let dates = parse_activity_dates(&["2024-01-02", "not a date", "2024-13-01", "2024-01-03"]);
    let state = StreakState::compute(&dates, &FixedClock::new(day(2024, 1, 3)));

    assert_eq!(state.total_entries, 2);
    assert_eq!(state.current_streak, 2);
}

#[test]
fn test_streak_seven_unlocks_once() {
    let catalog = AchievementCatalog::new(vec![AchievementDefinition::new(
        "streak_7",
        "Week Warrior",
        "Keep a 7 day streak",
        "📅",
        AchievementCategory::Streak,
        7,
    )])
    .unwrap();

    let state = StreakState {
        current_streak: 7,
        longest_streak: 7,
        total_entries: 7,
        last_entry_date: Some(day(2024, 1, 7)),
    };

    let mut unlocked = HashSet::new();
    let first = catalog.evaluate_new_unlocks(&state, &unlocked);
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].key, "streak_7");

    unlocked.extend(first.into_iter().map(|d| d.key));
    assert!(catalog.evaluate_new_unlocks(&state, &unlocked).is_empty());
}

#[test]
fn test_unlocks_use_longest_streak_and_distinct_days() {
    let catalog = AchievementCatalog::standard();
    let lapsed = StreakState {
        current_streak: 0,
        longest_streak: 14,
        total_entries: 20,
        last_entry_date: Some(day(2024, 2, 1)),
    };

    let keys: Vec<String> = catalog
        .evaluate_new_unlocks(&lapsed, &HashSet::new())
        .into_iter()
        .map(|d| d.key)
        .collect();
    assert_eq!(keys, vec!["first_entry", "streak_3", "streak_7", "streak_14", "entries_10"]);

    let streak_30 = catalog.get("streak_30").unwrap();
    assert!((streak_30.progress_for(&lapsed) - 46.666).abs() < 0.01);
}

#[test]
fn test_malformed_requirement_is_always_met() {
    let free = AchievementDefinition::new("free", "Freebie", "", "🎁", AchievementCategory::Entries, 0);
    let empty = StreakState::default();

    assert!(free.should_unlock(&empty));
    assert_eq!(free.progress_for(&empty), 100.0);
}

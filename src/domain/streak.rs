/// Streak calculation over activity dates
///
/// This module defines `StreakState`, the per-user summary of logging
/// consistency, and derives it from the set of days on which the user logged
/// anything (mood, food or productivity). The state is always recomputed from
/// the full set of dates; nothing is updated incrementally.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::domain::{parse_iso_date, Clock};

/// Calculated streak information for a user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StreakState {
    /// Consecutive days ending today or yesterday
    pub current_streak: u32,
    /// Best run of consecutive days ever, never below `current_streak`
    pub longest_streak: u32,
    /// Number of distinct activity days
    pub total_entries: u32,
    /// Most recent activity day (None if nothing was ever logged)
    pub last_entry_date: Option<NaiveDate>,
}

impl StreakState {
    /// Empty state for a user who has not logged anything yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute streak state using the clock's notion of today
    pub fn compute(dates: &[NaiveDate], clock: &dyn Clock) -> Self {
        Self::compute_as_of(dates, clock.today())
    }

    /// Compute streak state as seen on `today`
    ///
    /// Dates may be unordered and contain duplicates; each calendar day
    /// counts once.
    pub fn compute_as_of(dates: &[NaiveDate], today: NaiveDate) -> Self {
        let unique: BTreeSet<NaiveDate> = dates.iter().copied().collect();
        if unique.is_empty() {
            return Self::new();
        }

        // Newest first
        let descending: Vec<NaiveDate> = unique.into_iter().rev().collect();

        let total_entries = descending.len() as u32;
        let last_entry_date = descending.first().copied();

        let current_streak = Self::calculate_current_streak(&descending, today);
        let longest_streak = Self::calculate_longest_streak(&descending, current_streak);

        Self {
            current_streak,
            longest_streak,
            total_entries,
            last_entry_date,
        }
    }

    /// Whether the streak is still alive (last activity today or yesterday)
    pub fn is_on_track(&self, today: NaiveDate) -> bool {
        match self.last_entry_date {
            None => false,
            Some(last) => {
                let days_since = (today - last).num_days();
                (0..=1).contains(&days_since)
            }
        }
    }

    /// Get a motivational message based on current streak status
    pub fn motivational_message(&self) -> String {
        match self.current_streak {
            0 => "Ready to start your streak! Log how you feel today.".to_string(),
            1 => "Great start! One day down, keep the momentum going.".to_string(),
            2..=6 => format!("Nice work! {} days in a row of checking in with yourself.", self.current_streak),
            7..=13 => format!("Excellent! {} days strong. Journaling is becoming part of your routine.", self.current_streak),
            14..=29 => format!("Amazing! {} days straight. You know yourself better every day.", self.current_streak),
            30..=99 => format!("Incredible! {} days of consistency. Your insights keep getting sharper!", self.current_streak),
            _ => format!("Legendary! {} days of unwavering self-care. You're an inspiration!", self.current_streak),
        }
    }

    // Private helper methods for streak calculation

    /// Count back from the newest date while days stay consecutive
    ///
    /// Only counts when the newest date is today or yesterday.
    fn calculate_current_streak(descending: &[NaiveDate], today: NaiveDate) -> u32 {
        let Some(&newest) = descending.first() else {
            return 0;
        };

        let yesterday = today.pred_opt().unwrap_or(today);
        if newest != today && newest != yesterday {
            return 0;
        }

        let mut current_streak = 1;
        let mut previous = newest;

        for &date in descending.iter().skip(1) {
            if (previous - date).num_days() == 1 {
                current_streak += 1;
                previous = date;
            } else {
                break;
            }
        }

        current_streak
    }

    /// Longest run of consecutive days anywhere in the history
    fn calculate_longest_streak(descending: &[NaiveDate], current_streak: u32) -> u32 {
        let mut longest_streak = current_streak;
        let mut run = 0u32;
        let mut last_date: Option<NaiveDate> = None;

        // Oldest first
        for &date in descending.iter().rev() {
            run = match last_date {
                Some(last) if (date - last).num_days() == 1 => run + 1,
                _ => 1,
            };
            longest_streak = longest_streak.max(run);
            last_date = Some(date);
        }

        longest_streak
    }
}

/// Parse raw ISO date strings, silently dropping malformed ones
pub fn parse_activity_dates<S: AsRef<str>>(raw: &[S]) -> Vec<NaiveDate> {
    raw.iter()
        .filter_map(|s| parse_iso_date(s.as_ref()))
        .collect()
}

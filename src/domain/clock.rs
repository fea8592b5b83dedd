/// Source of "today" for streak and prediction logic
///
/// Streaks are anchored on the current calendar day, which callers supply
/// through a `Clock` rather than reading the system time directly.

use chrono::{DateTime, Local, NaiveDate, Utc};

/// Provides the current instant and the current local calendar day
pub trait Clock: Send + Sync {
    /// Current calendar day in the evaluation environment's local timezone
    fn today(&self) -> NaiveDate;

    /// Current instant, used for unlock and logging timestamps
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system
///
/// Day boundaries follow the device's local timezone. Travel across
/// timezones or DST changes can move an entry to a neighbouring day.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen on a given day, for deterministic evaluation
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        // Noon keeps the UTC instant on the same calendar day for any offset within +/-12h
        self.today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_is_stable() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let clock = FixedClock::new(day);
        assert_eq!(clock.today(), day);
        assert_eq!(clock.now().date_naive(), day);
    }
}

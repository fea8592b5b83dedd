/// MCP tools for journaling and insights
///
/// This module contains all the MCP tools that external clients (like Claude)
/// can call to log entries and read back streaks, achievements and insights.

pub mod insights;
pub mod log;
pub mod progress;
pub mod status;

// Re-export tool functions for easy access
pub use insights::*;
pub use log::*;
pub use progress::*;
pub use status::*;

use chrono::NaiveDate;
use thiserror::Error;
use crate::domain::{parse_iso_date, DomainError};
use crate::storage::StorageError;

/// Errors a tool call can end with
#[derive(Error, Debug)]
pub enum ToolError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Parse an optional YYYY-MM-DD argument, defaulting to today
pub(crate) fn date_or_today(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, DomainError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(today),
        Some(s) => parse_iso_date(s)
            .ok_or_else(|| DomainError::InvalidDate(format!("Expected YYYY-MM-DD, got '{}'", s))),
    }
}

/// "1 day", "3 days"
pub(crate) fn plural_days(n: u32) -> String {
    format!("{} day{}", n, if n == 1 { "" } else { "s" })
}

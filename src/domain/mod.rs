/// Domain module containing core business logic and data types
///
/// This module defines the journal entries, the dated records the analytics
/// engine consumes, streak state, the achievement catalog and the clock
/// abstraction used to decide what "today" is.

pub mod achievement;
pub mod clock;
pub mod entry;
pub mod records;
pub mod streak;
pub mod types;

// Re-export public types for easy access
pub use achievement::*;
pub use clock::*;
pub use entry::*;
pub use records::*;
pub use streak::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}

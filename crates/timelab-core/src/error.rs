//! Error types for TimeLab

use thiserror::Error;

/// Message shown to the user when a countdown is submitted without a date
pub const EMPTY_DATE_MESSAGE: &str = "请选择一个日期";

/// Core TimeLab errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeLabError {
    // User input errors
    #[error("请选择一个日期")]
    EmptyDate,

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    // Formatting errors
    #[error("Unsupported timezone: {0}")]
    UnsupportedTimezone(String),

    #[error("Instant out of range: {0}ms")]
    InstantOutOfRange(i64),
}

impl TimeLabError {
    /// True for errors caused by user input, which are reported and then
    /// ignored rather than aborting the tick loop
    pub fn is_user_error(&self) -> bool {
        matches!(self, TimeLabError::EmptyDate | TimeLabError::InvalidDate(_))
    }
}

/// Result type for TimeLab operations
pub type TimeLabResult<T> = Result<T, TimeLabError>;

// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid time window: end {end} must be after start {start}")]
    InvalidTimeWindow { start: i64, end: i64 },

    #[error("Invalid queue duration: {0} hours (must be positive)")]
    InvalidDuration(i64),

    #[error("Queue title too long: {len} characters (max {max})")]
    TitleTooLong { len: usize, max: usize },
}

pub type Result<T> = std::result::Result<T, DomainError>;

use thiserror::Error;

/// Core-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid interval: {0} (must be a positive integer)")]
    InvalidInterval(i64),

    #[error("Interval {0} is too large for its frequency")]
    IntervalOverflow(i64),

    #[error("Invalid period: {0}ms (must be strictly positive)")]
    InvalidPeriod(i64),

    #[error("Invariant violation: {0}")]
    InvariantViolation(&'static str),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

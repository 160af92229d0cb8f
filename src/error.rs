use thiserror::Error;

use crate::core::TimeKind;

pub type ScaleResult<T> = Result<T, ScaleError>;

#[derive(Debug, Error)]
pub enum ScaleError {
    #[error("mixed date-time representations: domain is {expected}, value is {found}")]
    MixedTimeKinds { expected: TimeKind, found: TimeKind },

    #[error("invalid range: start={start}, end={end}")]
    InvalidRange { start: f64, end: f64 },

    #[error("unsupported mode: {0}")]
    UnsupportedMode(String),

    #[error("invalid domain: {0}")]
    InvalidDomain(String),

    #[error("invalid ticks: {0}")]
    InvalidTicks(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

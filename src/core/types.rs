use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Date-time representation carried by a time domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeKind {
    /// Wall-clock time without an offset.
    Naive,
    /// Instant with a fixed UTC offset.
    Zoned,
}

impl fmt::Display for TimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Naive => f.write_str("naive date-time"),
            Self::Zoned => f.write_str("zoned date-time"),
        }
    }
}

/// A point in time accepted by [`crate::core::TimeScale`].
///
/// Both representations can be used as a domain, but never mixed within one
/// scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeValue {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl TimeValue {
    #[must_use]
    pub fn kind(self) -> TimeKind {
        match self {
            Self::Naive(_) => TimeKind::Naive,
            Self::Zoned(_) => TimeKind::Zoned,
        }
    }

    /// Wall-clock reading of this value in its own offset.
    #[must_use]
    pub fn naive_local(self) -> NaiveDateTime {
        match self {
            Self::Naive(naive) => naive,
            Self::Zoned(zoned) => zoned.naive_local(),
        }
    }

    #[must_use]
    pub fn offset(self) -> Option<FixedOffset> {
        match self {
            Self::Naive(_) => None,
            Self::Zoned(zoned) => Some(*zoned.offset()),
        }
    }

    /// Milliseconds on a linear time line shared by all values of the same kind.
    ///
    /// Naive values are read as if they were UTC.
    #[must_use]
    pub fn timestamp_millis(self) -> i64 {
        match self {
            Self::Naive(naive) => naive.and_utc().timestamp_millis(),
            Self::Zoned(zoned) => zoned.timestamp_millis(),
        }
    }
}

impl From<NaiveDateTime> for TimeValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::Naive(value)
    }
}

impl From<NaiveDate> for TimeValue {
    fn from(value: NaiveDate) -> Self {
        Self::Naive(value.and_time(NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for TimeValue {
    fn from(value: DateTime<Tz>) -> Self {
        Self::Zoned(value.fixed_offset())
    }
}

/// A domain value accepted by [`crate::core::AnyScale`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleValue {
    Number(f64),
    Category(String),
    Time(TimeValue),
}

impl From<f64> for ScaleValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ScaleValue {
    fn from(value: &str) -> Self {
        Self::Category(value.to_owned())
    }
}

impl From<String> for ScaleValue {
    fn from(value: String) -> Self {
        Self::Category(value)
    }
}

impl From<TimeValue> for ScaleValue {
    fn from(value: TimeValue) -> Self {
        Self::Time(value)
    }
}

/// Pixel span assigned to one ordinal category.
///
/// `start` is the edge nearer to the range start, so `start > end` on
/// inverted ranges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub start: f64,
    pub end: f64,
}

impl Band {
    #[must_use]
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        (self.end - self.start).abs()
    }

    #[must_use]
    pub fn center(self) -> f64 {
        (self.start + self.end) / 2.0
    }
}

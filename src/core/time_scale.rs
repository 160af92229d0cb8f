//! Calendar-aware time scale.
//!
//! The tick interval is picked from a fixed ladder of calendar steps, the first
//! tick is snapped to a calendar boundary at or before the domain start, and
//! ticks continue until one reaches the domain end. Positions are computed on
//! the millisecond time line; ticks are generated in the wall-clock time of
//! the domain start.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, NaiveDateTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::calendar;
use crate::core::nice::DEFAULT_TICK_COUNT;
use crate::core::scale::{DEFAULT_RANGE, Scale, deinterpolate, interpolate, validate_range};
use crate::core::types::{TimeKind, TimeValue};
use crate::error::{ScaleError, ScaleResult};

const MIN_TICK_COUNT: usize = 2;
const MAX_TIME_TICKS: u32 = 10_000;
const SECONDS_PER_MINUTE: u32 = 60;
const SECONDS_PER_HOUR: u32 = 3_600;
const SECONDS_PER_DAY: u32 = 86_400;
// Approximate lengths used only to pick a ladder rung.
const APPROX_SECONDS_PER_MONTH: f64 = 30.0 * 86_400.0;
const QUARTERS_PER_YEAR: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Quarter,
}

impl TimeUnit {
    fn approx_seconds(self) -> f64 {
        match self {
            Self::Second => 1.0,
            Self::Minute => f64::from(SECONDS_PER_MINUTE),
            Self::Hour => f64::from(SECONDS_PER_HOUR),
            Self::Day => f64::from(SECONDS_PER_DAY),
            Self::Month => APPROX_SECONDS_PER_MONTH,
            Self::Quarter => 3.0 * APPROX_SECONDS_PER_MONTH,
        }
    }

    fn fixed_seconds(self) -> Option<u32> {
        match self {
            Self::Second => Some(1),
            Self::Minute => Some(SECONDS_PER_MINUTE),
            Self::Hour => Some(SECONDS_PER_HOUR),
            Self::Day => Some(SECONDS_PER_DAY),
            Self::Month | Self::Quarter => None,
        }
    }
}

/// A tick spacing of `step` calendar units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickInterval {
    pub unit: TimeUnit,
    pub step: u32,
}

impl TickInterval {
    const fn new(unit: TimeUnit, step: u32) -> Self {
        Self { unit, step }
    }

    #[must_use]
    pub fn approx_seconds(self) -> f64 {
        self.unit.approx_seconds() * f64::from(self.step)
    }

    /// Picks the first ladder rung at least as long as `target_seconds`.
    ///
    /// Past the ladder, whole years are used (quarters in multiples of four).
    #[must_use]
    pub fn for_target_seconds(target_seconds: f64) -> Self {
        if let Some(interval) = TICK_LADDER
            .iter()
            .copied()
            .find(|interval| interval.approx_seconds() >= target_seconds)
        {
            return interval;
        }
        let year = TimeUnit::Quarter.approx_seconds() * f64::from(QUARTERS_PER_YEAR);
        let years = (target_seconds / year).ceil().clamp(1.0, f64::from(u32::MAX / 4));
        Self::new(TimeUnit::Quarter, years as u32 * QUARTERS_PER_YEAR)
    }

    /// Calendar boundary at or before `value` that ticks start from.
    #[must_use]
    pub fn snap(self, value: NaiveDateTime) -> Option<NaiveDateTime> {
        match self.unit {
            TimeUnit::Second | TimeUnit::Minute | TimeUnit::Hour => {
                let seconds = self.unit.fixed_seconds().unwrap_or(1);
                calendar::floor_to_seconds(value, seconds.saturating_mul(self.step))
            }
            TimeUnit::Day => Some(calendar::start_of_day(value)),
            TimeUnit::Month => Some(calendar::start_of_month(value)),
            TimeUnit::Quarter => Some(calendar::quarter_end_at_or_before(value)),
        }
    }

    /// The `index`-th tick after `anchor`; `anchor` must come from [`TickInterval::snap`].
    #[must_use]
    pub fn nth_tick(self, anchor: NaiveDateTime, index: u32) -> Option<NaiveDateTime> {
        let steps = index.checked_mul(self.step)?;
        match self.unit.fixed_seconds() {
            Some(seconds) => {
                let delta = TimeDelta::try_seconds(i64::from(steps) * i64::from(seconds))?;
                anchor.checked_add_signed(delta)
            }
            None => match self.unit {
                TimeUnit::Quarter => calendar::add_quarters_to_quarter_end(anchor, steps),
                _ => calendar::add_months(anchor, steps),
            },
        }
    }
}

const TICK_LADDER: [TickInterval; 29] = [
    TickInterval::new(TimeUnit::Second, 1),
    TickInterval::new(TimeUnit::Second, 2),
    TickInterval::new(TimeUnit::Second, 5),
    TickInterval::new(TimeUnit::Second, 10),
    TickInterval::new(TimeUnit::Second, 15),
    TickInterval::new(TimeUnit::Second, 30),
    TickInterval::new(TimeUnit::Minute, 1),
    TickInterval::new(TimeUnit::Minute, 2),
    TickInterval::new(TimeUnit::Minute, 5),
    TickInterval::new(TimeUnit::Minute, 10),
    TickInterval::new(TimeUnit::Minute, 15),
    TickInterval::new(TimeUnit::Minute, 30),
    TickInterval::new(TimeUnit::Hour, 1),
    TickInterval::new(TimeUnit::Hour, 3),
    TickInterval::new(TimeUnit::Hour, 6),
    TickInterval::new(TimeUnit::Hour, 12),
    TickInterval::new(TimeUnit::Day, 1),
    TickInterval::new(TimeUnit::Day, 2),
    TickInterval::new(TimeUnit::Day, 5),
    TickInterval::new(TimeUnit::Day, 7),
    TickInterval::new(TimeUnit::Day, 10),
    TickInterval::new(TimeUnit::Month, 1),
    TickInterval::new(TimeUnit::Month, 2),
    TickInterval::new(TimeUnit::Quarter, 1),
    TickInterval::new(TimeUnit::Quarter, 2),
    TickInterval::new(TimeUnit::Quarter, 4),
    TickInterval::new(TimeUnit::Quarter, 8),
    TickInterval::new(TimeUnit::Quarter, 12),
    TickInterval::new(TimeUnit::Quarter, 16),
];

#[derive(Debug, Clone, PartialEq)]
pub struct TimeScale {
    raw_domain: (TimeValue, TimeValue),
    offset: Option<FixedOffset>,
    interval_count: usize,
    interval: TickInterval,
    ticks: Vec<TimeValue>,
    // Millisecond bounds of the first and last tick.
    nice_millis: (f64, f64),
    display_format: String,
    custom_format: Option<String>,
    range: (f64, f64),
}

impl TimeScale {
    /// Creates a scale over `[min, max]`; both bounds must share a [`TimeKind`].
    pub fn new(min: impl Into<TimeValue>, max: impl Into<TimeValue>) -> ScaleResult<Self> {
        let (min, max) = (min.into(), max.into());
        Self {
            raw_domain: (min, max),
            offset: None,
            interval_count: DEFAULT_TICK_COUNT,
            interval: TICK_LADDER[0],
            ticks: Vec::new(),
            nice_millis: (0.0, 0.0),
            display_format: String::new(),
            custom_format: None,
            range: DEFAULT_RANGE,
        }
        .retick()
    }

    pub fn domain(
        mut self,
        min: impl Into<TimeValue>,
        max: impl Into<TimeValue>,
    ) -> ScaleResult<Self> {
        self.raw_domain = (min.into(), max.into());
        self.retick()
    }

    /// Derives the domain from the earliest and latest of `values`.
    pub fn domain_from_values<I>(self, values: I) -> ScaleResult<Self>
    where
        I: IntoIterator<Item = TimeValue>,
    {
        let mut values = values.into_iter();
        let Some(first) = values.next() else {
            return Err(ScaleError::InvalidDomain(
                "time scale cannot be built from an empty value set".to_owned(),
            ));
        };
        let (mut min, mut max) = (first, first);
        for value in values {
            ensure_kind(first.kind(), value.kind())?;
            if value.timestamp_millis() < min.timestamp_millis() {
                min = value;
            }
            if value.timestamp_millis() > max.timestamp_millis() {
                max = value;
            }
        }
        self.domain(min, max)
    }

    pub fn with_interval_count(mut self, interval_count: usize) -> ScaleResult<Self> {
        self.interval_count = interval_count;
        self.retick()
    }

    /// Replaces the automatic tick label format with a `strftime` pattern.
    pub fn with_display_format(mut self, format: impl Into<String>) -> ScaleResult<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(ScaleError::InvalidData(format!(
                "invalid time display format: {format}"
            )));
        }
        self.custom_format = Some(format);
        Ok(self)
    }

    #[must_use]
    pub fn kind(&self) -> TimeKind {
        self.raw_domain.0.kind()
    }

    #[must_use]
    pub fn raw_domain(&self) -> (TimeValue, TimeValue) {
        self.raw_domain
    }

    /// First and last tick, which bound the mapped domain.
    #[must_use]
    pub fn nice_domain(&self) -> Option<(TimeValue, TimeValue)> {
        Some((*self.ticks.first()?, *self.ticks.last()?))
    }

    #[must_use]
    pub fn tick_interval(&self) -> TickInterval {
        self.interval
    }

    /// Format string used for tick labels.
    #[must_use]
    pub fn display_format(&self) -> &str {
        self.custom_format.as_deref().unwrap_or(&self.display_format)
    }

    /// Like [`Scale::domain_to_range`], reporting values of the other time kind as an error.
    pub fn try_domain_to_range(&self, value: &TimeValue) -> ScaleResult<f64> {
        ensure_kind(self.kind(), value.kind())?;
        Ok(interpolate(
            self.nice_millis,
            self.range,
            value.timestamp_millis() as f64,
        ))
    }

    /// Maps a pixel back to a time value in the domain's representation.
    #[must_use]
    pub fn range_to_domain(&self, pixel: f64) -> Option<TimeValue> {
        let millis = deinterpolate(self.nice_millis, self.range, pixel);
        if !millis.is_finite() {
            return None;
        }
        let utc = chrono::DateTime::from_timestamp_millis(millis.round() as i64)?;
        Some(match self.offset {
            None => TimeValue::Naive(utc.naive_utc()),
            Some(offset) => TimeValue::Zoned(utc.with_timezone(&offset)),
        })
    }

    fn retick(mut self) -> ScaleResult<Self> {
        let (first, second) = self.raw_domain;
        ensure_kind(first.kind(), second.kind())?;
        let (min, mut max) = if first.timestamp_millis() > second.timestamp_millis() {
            (second, first)
        } else {
            (first, second)
        };
        self.offset = min.offset();

        let local_min = min.naive_local();
        let mut local_max = self.to_local(max);
        if local_max <= local_min {
            local_max = local_min
                .checked_add_signed(TimeDelta::seconds(1))
                .ok_or_else(|| {
                    ScaleError::InvalidDomain(format!("cannot widen time domain past {local_min}"))
                })?;
            max = self.attach_offset(local_max).unwrap_or(max);
            debug!(?min, "widened degenerate time domain by one second");
        }

        let span_seconds = (local_max - local_min).num_milliseconds() as f64 / 1_000.0;
        let intervals = self.interval_count.max(MIN_TICK_COUNT) - 1;
        self.interval = TickInterval::for_target_seconds(span_seconds / intervals as f64);

        let anchor = self.interval.snap(local_min).ok_or_else(|| {
            ScaleError::InvalidDomain(format!("cannot snap {local_min} to a tick boundary"))
        })?;
        let mut local_ticks = Vec::new();
        for index in 0..MAX_TIME_TICKS {
            let Some(tick) = self.interval.nth_tick(anchor, index) else {
                break;
            };
            local_ticks.push(tick);
            if tick >= local_max {
                break;
            }
        }
        if local_ticks.last().is_none_or(|last| *last < local_max) {
            warn!(
                interval = ?self.interval,
                ticks = local_ticks.len(),
                "time ticks stopped before reaching the domain end"
            );
        }

        self.display_format = default_format(self.interval.unit, &local_ticks).to_owned();
        self.ticks = local_ticks
            .into_iter()
            .filter_map(|tick| self.attach_offset(tick))
            .collect();
        self.nice_millis = match (self.ticks.first(), self.ticks.last()) {
            (Some(first), Some(last)) => (
                first.timestamp_millis() as f64,
                last.timestamp_millis() as f64,
            ),
            _ => (min.timestamp_millis() as f64, max.timestamp_millis() as f64),
        };

        debug!(
            min = %local_min,
            max = %local_max,
            unit = ?self.interval.unit,
            step = self.interval.step,
            ticks = self.ticks.len(),
            "time scale domain"
        );
        Ok(self)
    }

    fn to_local(&self, value: TimeValue) -> NaiveDateTime {
        match (value, self.offset) {
            (TimeValue::Zoned(zoned), Some(offset)) => zoned.with_timezone(&offset).naive_local(),
            _ => value.naive_local(),
        }
    }

    fn attach_offset(&self, local: NaiveDateTime) -> Option<TimeValue> {
        match self.offset {
            None => Some(TimeValue::Naive(local)),
            Some(offset) => local
                .and_local_timezone(offset)
                .single()
                .map(TimeValue::Zoned),
        }
    }
}

fn ensure_kind(expected: TimeKind, found: TimeKind) -> ScaleResult<()> {
    if expected != found {
        return Err(ScaleError::MixedTimeKinds { expected, found });
    }
    Ok(())
}

fn default_format(unit: TimeUnit, ticks: &[NaiveDateTime]) -> &'static str {
    match unit {
        TimeUnit::Second => "%M:%S",
        TimeUnit::Minute if ticks.iter().any(|tick| tick.second() != 0) => "%H:%M:%S",
        TimeUnit::Minute => "%M:%S",
        TimeUnit::Hour | TimeUnit::Day => "%d %b %H:%M",
        TimeUnit::Month | TimeUnit::Quarter => "%b %Y",
    }
}

impl Scale for TimeScale {
    type Value = TimeValue;

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn with_range(mut self, start: f64, end: f64) -> ScaleResult<Self> {
        self.range = validate_range(start, end)?;
        Ok(self)
    }

    fn domain_to_range(&self, value: &TimeValue) -> Option<f64> {
        self.try_domain_to_range(value).ok()
    }

    fn ticks_domain(&self) -> Vec<TimeValue> {
        self.ticks.clone()
    }

    fn formatted_tick(&self, value: &TimeValue) -> String {
        let local = self.to_local(*value);
        let mut label = String::new();
        if write!(label, "{}", local.format(self.display_format())).is_err() {
            warn!(format = self.display_format(), "time tick format failed");
            label.clear();
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(month: u32, day: u32, hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .expect("valid date-time")
    }

    #[test]
    fn ladder_is_sorted_by_duration() {
        assert!(
            TICK_LADDER
                .windows(2)
                .all(|pair| pair[0].approx_seconds() < pair[1].approx_seconds())
        );
    }

    #[test]
    fn ladder_falls_back_to_whole_years() {
        let interval = TickInterval::for_target_seconds(10.0 * 365.0 * 86_400.0);
        assert_eq!(interval.unit, TimeUnit::Quarter);
        assert_eq!(interval.step % QUARTERS_PER_YEAR, 0);
        assert!(interval.approx_seconds() >= 10.0 * 365.0 * 86_400.0);
    }

    #[test]
    fn second_level_span_uses_minute_second_labels() {
        let scale = TimeScale::new(at(1, 1, 10, 0, 3), at(1, 1, 10, 0, 40)).expect("valid domain");
        assert_eq!(scale.tick_interval(), TickInterval::new(TimeUnit::Second, 5));
        assert_eq!(scale.display_format(), "%M:%S");
        let first = scale.ticks_domain()[0];
        assert_eq!(first, TimeValue::Naive(at(1, 1, 10, 0, 0)));
        assert_eq!(scale.formatted_tick(&first), "00:00");
    }

    #[test]
    fn degenerate_domain_widens_by_one_second() {
        let scale = TimeScale::new(at(3, 1, 12, 0, 0), at(3, 1, 12, 0, 0)).expect("valid domain");
        assert_eq!(
            scale.ticks_domain(),
            vec![
                TimeValue::Naive(at(3, 1, 12, 0, 0)),
                TimeValue::Naive(at(3, 1, 12, 0, 1)),
            ]
        );
    }

    #[test]
    fn invalid_display_format_is_rejected() {
        let scale = TimeScale::new(at(1, 1, 0, 0, 0), at(1, 2, 0, 0, 0)).expect("valid domain");
        assert!(scale.clone().with_display_format("%Q").is_err());
        let custom = scale.with_display_format("%Y-%m-%d").expect("valid format");
        assert_eq!(custom.formatted_tick(&TimeValue::Naive(at(1, 1, 0, 0, 0))), "2024-01-01");
    }
}

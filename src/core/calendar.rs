//! Calendar arithmetic used by the time scale.
//!
//! Month shifts clamp the day of month to the target month's length, so
//! `Jan 31 + 1 month` is the last day of February.

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};

const SECONDS_PER_DAY: u32 = 86_400;

/// Shifts by a signed number of months, clamping the day of month.
#[must_use]
pub fn shift_months(value: NaiveDateTime, months: i32) -> Option<NaiveDateTime> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        value.checked_add_months(magnitude)
    } else {
        value.checked_sub_months(magnitude)
    }
}

#[must_use]
pub fn add_months(value: NaiveDateTime, months: u32) -> Option<NaiveDateTime> {
    value.checked_add_months(Months::new(months))
}

/// Shifts by a signed number of years; Feb 29 clamps to Feb 28 in common years.
#[must_use]
pub fn shift_years(value: NaiveDateTime, years: i32) -> Option<NaiveDateTime> {
    shift_months(value, years.checked_mul(12)?)
}

#[must_use]
pub fn start_of_day(value: NaiveDateTime) -> NaiveDateTime {
    value.date().and_time(NaiveTime::MIN)
}

#[must_use]
pub fn start_of_month(value: NaiveDateTime) -> NaiveDateTime {
    value
        .date()
        .with_day(1)
        .unwrap_or(value.date())
        .and_time(NaiveTime::MIN)
}

#[must_use]
pub fn end_of_month(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

#[must_use]
pub fn is_quarter_end(date: NaiveDate) -> bool {
    date.month() % 3 == 0 && end_of_month(date) == date
}

/// Midnight of the latest quarter end (Mar 31, Jun 30, Sep 30, Dec 31) at or before `value`.
#[must_use]
pub fn quarter_end_at_or_before(value: NaiveDateTime) -> NaiveDateTime {
    let date = value.date();
    if is_quarter_end(date) {
        return date.and_time(NaiveTime::MIN);
    }
    // Months elapsed since the last quarter-end month.
    let back = date.month() % 3;
    let back = if back == 0 { 3 } else { back };
    let first = date.with_day(1).unwrap_or(date);
    let quarter_month = first
        .checked_sub_months(Months::new(back))
        .unwrap_or(first);
    end_of_month(quarter_month).and_time(NaiveTime::MIN)
}

/// Quarter end `quarters` quarters after the quarter end `anchor`.
#[must_use]
pub fn add_quarters_to_quarter_end(anchor: NaiveDateTime, quarters: u32) -> Option<NaiveDateTime> {
    let first = start_of_month(anchor);
    let target = add_months(first, quarters.checked_mul(3)?)?;
    Some(end_of_month(target.date()).and_time(NaiveTime::MIN))
}

/// Floors to a multiple of `step_seconds` counted from midnight.
///
/// `step_seconds` must divide a day evenly for the result to line up across days.
#[must_use]
pub fn floor_to_seconds(value: NaiveDateTime, step_seconds: u32) -> Option<NaiveDateTime> {
    let step = step_seconds.clamp(1, SECONDS_PER_DAY);
    let elapsed = value.num_seconds_from_midnight();
    let floored = elapsed - elapsed % step;
    start_of_day(value).checked_add_signed(TimeDelta::seconds(i64::from(floored)))
}

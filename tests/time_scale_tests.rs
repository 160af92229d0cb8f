use chart_scales::core::{Scale, TickInterval, TimeKind, TimeScale, TimeUnit, TimeValue};
use chart_scales::error::ScaleError;
use chrono::{FixedOffset, NaiveDate, NaiveDateTime, TimeZone};

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .expect("valid date-time")
}

fn naive_ticks(scale: &TimeScale) -> Vec<NaiveDateTime> {
    scale
        .ticks_domain()
        .into_iter()
        .map(TimeValue::naive_local)
        .collect()
}

#[test]
fn two_week_span_ticks_every_other_midnight_across_month_end() {
    let scale = TimeScale::new(at(2024, 11, 30, 0, 0), at(2024, 12, 13, 0, 0))
        .expect("valid time scale");

    assert_eq!(
        scale.tick_interval(),
        TickInterval {
            unit: TimeUnit::Day,
            step: 2
        }
    );
    assert_eq!(
        naive_ticks(&scale),
        vec![
            at(2024, 11, 30, 0, 0),
            at(2024, 12, 2, 0, 0),
            at(2024, 12, 4, 0, 0),
            at(2024, 12, 6, 0, 0),
            at(2024, 12, 8, 0, 0),
            at(2024, 12, 10, 0, 0),
            at(2024, 12, 12, 0, 0),
            at(2024, 12, 14, 0, 0),
        ]
    );
    let first = scale.ticks_domain()[0];
    assert_eq!(scale.formatted_tick(&first), "30 Nov 00:00");
}

#[test]
fn day_ticks_snap_to_midnight_when_domain_starts_mid_day() {
    let scale = TimeScale::new(at(2024, 11, 30, 15, 45), at(2024, 12, 13, 9, 0))
        .expect("valid time scale");
    assert_eq!(naive_ticks(&scale)[0], at(2024, 11, 30, 0, 0));
}

#[test]
fn month_ticks_start_on_the_first() {
    let scale = TimeScale::new(at(2024, 1, 15, 8, 0), at(2024, 9, 20, 0, 0))
        .expect("valid time scale");
    let ticks = naive_ticks(&scale);

    assert_eq!(scale.tick_interval().unit, TimeUnit::Month);
    assert_eq!(ticks.first().copied(), Some(at(2024, 1, 1, 0, 0)));
    assert_eq!(ticks.last().copied(), Some(at(2024, 10, 1, 0, 0)));
    assert_eq!(scale.formatted_tick(&scale.ticks_domain()[0]), "Jan 2024");
}

#[test]
fn multi_year_ticks_snap_to_quarter_ends() {
    let scale = TimeScale::new(at(2020, 2, 10, 0, 0), at(2024, 11, 5, 0, 0))
        .expect("valid time scale");

    assert_eq!(
        scale.tick_interval(),
        TickInterval {
            unit: TimeUnit::Quarter,
            step: 4
        }
    );
    assert_eq!(
        naive_ticks(&scale),
        vec![
            at(2019, 12, 31, 0, 0),
            at(2020, 12, 31, 0, 0),
            at(2021, 12, 31, 0, 0),
            at(2022, 12, 31, 0, 0),
            at(2023, 12, 31, 0, 0),
            at(2024, 12, 31, 0, 0),
        ]
    );
}

#[test]
fn quarter_ticks_follow_month_lengths() {
    let scale = TimeScale::new(at(2023, 11, 20, 0, 0), at(2024, 10, 1, 0, 0))
        .and_then(|scale| scale.with_interval_count(5))
        .expect("valid time scale");

    assert_eq!(
        scale.tick_interval(),
        TickInterval {
            unit: TimeUnit::Quarter,
            step: 1
        }
    );
    assert_eq!(
        naive_ticks(&scale),
        vec![
            at(2023, 9, 30, 0, 0),
            at(2023, 12, 31, 0, 0),
            at(2024, 3, 31, 0, 0),
            at(2024, 6, 30, 0, 0),
            at(2024, 9, 30, 0, 0),
            at(2024, 12, 31, 0, 0),
        ]
    );
}

#[test]
fn lower_interval_count_widens_the_step() {
    let dense = TimeScale::new(at(2024, 3, 1, 0, 0), at(2024, 3, 1, 6, 0))
        .expect("valid time scale");
    let sparse = dense.clone().with_interval_count(3).expect("valid time scale");

    assert!(sparse.tick_interval().approx_seconds() > dense.tick_interval().approx_seconds());
    assert!(sparse.ticks_domain().len() < dense.ticks_domain().len());
}

#[test]
fn minute_ticks_format_minutes_and_seconds() {
    let scale = TimeScale::new(at(2024, 3, 1, 10, 0), at(2024, 3, 1, 10, 40))
        .expect("valid time scale");

    assert_eq!(scale.tick_interval().unit, TimeUnit::Minute);
    assert_eq!(scale.display_format(), "%M:%S");
    assert_eq!(scale.formatted_tick(&scale.ticks_domain()[1]), "05:00");
}

#[test]
fn mixed_time_kinds_are_rejected() {
    let offset = FixedOffset::east_opt(2 * 3600).expect("valid offset");
    let zoned = offset
        .from_local_datetime(&at(2024, 3, 2, 0, 0))
        .single()
        .expect("unambiguous");

    let result = TimeScale::new(at(2024, 3, 1, 0, 0), zoned);
    assert!(matches!(
        result,
        Err(ScaleError::MixedTimeKinds {
            expected: TimeKind::Naive,
            found: TimeKind::Zoned
        })
    ));

    let naive = TimeScale::new(at(2024, 3, 1, 0, 0), at(2024, 3, 2, 0, 0))
        .expect("valid time scale");
    assert_eq!(naive.domain_to_range(&TimeValue::from(zoned)), None);
    assert!(naive.try_domain_to_range(&TimeValue::from(zoned)).is_err());
}

#[test]
fn zoned_ticks_use_local_wall_clock() {
    let offset = FixedOffset::east_opt(2 * 3600).expect("valid offset");
    let start = offset
        .from_local_datetime(&at(2024, 3, 1, 10, 30))
        .single()
        .expect("unambiguous");
    let end = offset
        .from_local_datetime(&at(2024, 3, 3, 10, 30))
        .single()
        .expect("unambiguous");
    let scale = TimeScale::new(start, end).expect("valid time scale");
    let first = scale.ticks_domain()[0];

    assert_eq!(scale.kind(), TimeKind::Zoned);
    assert_eq!(first.offset(), Some(offset));
    assert_eq!(first.naive_local(), at(2024, 3, 1, 6, 0));
    assert_eq!(scale.formatted_tick(&first), "01 Mar 06:00");
}

#[test]
fn ticks_bound_the_mapped_range() {
    let scale = TimeScale::new(at(2024, 11, 30, 0, 0), at(2024, 12, 13, 0, 0))
        .and_then(|scale| scale.with_range(0.0, 700.0))
        .expect("valid time scale");
    let pixels = scale.ticks_range();

    assert_eq!(pixels.first().copied(), Some(0.0));
    assert_eq!(pixels.last().copied(), Some(700.0));
    assert!(pixels.windows(2).all(|pair| pair[0] < pair[1]));
    let back = scale.range_to_domain(100.0).expect("finite pixel");
    assert_eq!(back.naive_local(), at(2024, 12, 2, 0, 0));
}

#[test]
fn display_format_override_is_used_for_labels() {
    let scale = TimeScale::new(at(2024, 1, 1, 0, 0), at(2024, 1, 20, 0, 0))
        .and_then(|scale| scale.with_display_format("%Y-%m-%d"))
        .expect("valid time scale");
    assert_eq!(scale.formatted_tick(&scale.ticks_domain()[0]), "2024-01-01");
}

#[test]
fn empty_value_set_is_rejected() {
    let scale = TimeScale::new(at(2024, 1, 1, 0, 0), at(2024, 1, 2, 0, 0))
        .expect("valid time scale");
    assert!(matches!(
        scale.domain_from_values(Vec::new()),
        Err(ScaleError::InvalidDomain(_))
    ));
}

#[test]
fn degenerate_domain_at_the_end_of_time_is_rejected() {
    assert!(matches!(
        TimeScale::new(NaiveDateTime::MAX, NaiveDateTime::MAX),
        Err(ScaleError::InvalidDomain(_))
    ));
}

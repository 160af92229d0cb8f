use approx::assert_relative_eq;
use chart_scales::core::{LinearScale, Scale, TickFormatter, TickLabelLocale, nice_domain};
use chart_scales::error::ScaleError;

#[test]
fn linear_domain_uses_two_tenths_interval() {
    let scale = LinearScale::new()
        .domain(1.2, 2.2)
        .and_then(|scale| scale.with_range(0.0, 1.0))
        .expect("valid scale");

    assert_eq!(scale.interval_size(), Some(0.2));
    assert_eq!(scale.nice_domain(), (1.2, 2.2));
    assert_eq!(scale.ticks_domain(), vec![1.2, 1.4, 1.6, 1.8, 2.0, 2.2]);
    assert_eq!(scale.display_precision(), 1);
    assert_eq!(scale.formatted_tick(&1.4), "1.4");
}

#[test]
fn tiny_values_keep_their_own_domain() {
    let data = [0.0, 0.0001, 0.0, 0.0001, 0.0];
    let scale = LinearScale::new()
        .domain_from_values(data)
        .expect("valid scale");

    assert_eq!(scale.nice_domain(), (0.0, 0.0001));
    assert_eq!(scale.interval_size(), Some(0.00002));
    assert_eq!(scale.ticks_domain().len(), 6);
}

#[test]
fn missing_and_non_finite_values_are_ignored() {
    let data = [None, Some(3.0), Some(f64::NAN), Some(17.0), None];
    let scale = LinearScale::new()
        .domain_from_values(data)
        .expect("valid scale");
    let (min, max) = scale.nice_domain();
    assert!(min <= 3.0 && max >= 17.0);

    let empty: [Option<f64>; 2] = [None, None];
    assert!(LinearScale::new().domain_from_values(empty).is_err());
}

#[test]
fn fixed_ticks_outside_domain_are_dropped() {
    let scale = LinearScale::new()
        .domain(0.0, 80.0)
        .and_then(|scale| scale.with_fixed_ticks(vec![0.0, 10.0, 50.0, 90.0, 130.0]))
        .expect("valid scale");

    assert_eq!(scale.ticks_domain(), vec![0.0, 10.0, 50.0]);
    assert_eq!(scale.nice_domain(), (0.0, 80.0));
    assert_eq!(scale.interval_size(), None);
}

#[test]
fn degenerate_domains_widen_towards_zero() {
    let positive = nice_domain(5.0, 5.0, None, 10).expect("finite");
    assert_eq!((positive.min, positive.max), (0.0, 5.0));

    let negative = nice_domain(-3.0, -3.0, None, 10).expect("finite");
    assert_eq!((negative.min, negative.max), (-3.0, 0.0));

    let zero = nice_domain(0.0, 0.0, None, 10).expect("finite");
    assert_eq!((zero.min, zero.max), (0.0, 1.0));
}

#[test]
fn reversed_bounds_are_swapped_and_non_finite_rejected() {
    let swapped = nice_domain(10.0, 0.0, None, 10).expect("finite");
    assert_eq!((swapped.min, swapped.max), (0.0, 10.0));

    assert!(nice_domain(f64::NAN, 1.0, None, 10).is_err());
    assert!(nice_domain(0.0, f64::INFINITY, None, 10).is_err());
    assert!(nice_domain(0.0, 1.0, Some(&[0.5, f64::NAN]), 10).is_err());
}

#[test]
fn tick_count_below_two_degrades_to_two() {
    let nice = nice_domain(0.0, 100.0, None, 0).expect("finite");
    assert!(nice.ticks.len() >= 2);
    assert_eq!(nice.ticks.first().copied(), Some(0.0));
    assert_eq!(nice.ticks.last().copied(), Some(100.0));
}

#[test]
fn interval_count_override_widens_the_step() {
    let dense = LinearScale::new().domain(0.0, 100.0).expect("valid scale");
    let sparse = dense.clone().with_interval_count(3).expect("valid scale");

    assert_eq!(dense.interval_size(), Some(20.0));
    assert_eq!(sparse.interval_size(), Some(50.0));
    assert_eq!(sparse.ticks_domain(), vec![0.0, 50.0, 100.0]);
}

#[test]
fn changing_range_keeps_domain_and_ticks() {
    let scale = LinearScale::new().domain(-5.0, 25.0).expect("valid scale");
    let moved = scale.clone().with_range(800.0, 0.0).expect("finite range");

    assert_eq!(moved.nice_domain(), scale.nice_domain());
    assert_eq!(moved.ticks_domain(), scale.ticks_domain());
    assert_eq!(moved.range(), (800.0, 0.0));
    assert!(scale.clone().with_range(0.0, f64::NAN).is_err());
}

#[test]
fn mapping_and_inverse_round_trip() {
    let scale = LinearScale::new()
        .domain(10.0, 110.0)
        .and_then(|scale| scale.with_range(0.0, 1000.0))
        .expect("valid scale");

    let pixel = scale.domain_to_range(&42.5).expect("finite");
    assert_relative_eq!(scale.range_to_domain(pixel), 42.5, epsilon = 1e-9);
    assert_eq!(scale.ticks_range().first().copied(), Some(0.0));
    assert_eq!(scale.ticks_range().last().copied(), Some(1000.0));
}

#[test]
fn locale_and_custom_formatter_shape_labels() {
    let scale = LinearScale::new()
        .domain(0.0, 1.0)
        .expect("valid scale")
        .with_locale(TickLabelLocale::EsEs);
    assert_eq!(scale.formatted_tick(&0.4), "0,4");

    let percent = scale.with_tick_formatter(TickFormatter::new(|value| {
        format!("{:.0}%", value * 100.0)
    }));
    assert_eq!(percent.formatted_tick(&0.4), "40%");
}

#[test]
fn subnormal_span_is_rejected_instead_of_collapsing() {
    assert!(matches!(
        LinearScale::new().domain(1e-310, 2e-310),
        Err(ScaleError::InvalidDomain(_))
    ));
}

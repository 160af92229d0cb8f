use tracing::debug;

use crate::core::extent::Extent;
use crate::core::nice::{DEFAULT_TICK_COUNT, NiceDomain, nice_domain};
use crate::core::scale::{
    DEFAULT_RANGE, DomainToRangeFn, Scale, deinterpolate, interpolate, validate_range,
};
use crate::core::tick_format::{TickFormatter, TickLabelLocale, format_numeric_tick};
use crate::error::{ScaleError, ScaleResult};

/// Continuous affine scale over a nice-rounded numeric domain.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearScale {
    raw_domain: (f64, f64),
    nice: NiceDomain,
    range: (f64, f64),
    interval_count: usize,
    fixed_ticks: Option<Vec<f64>>,
    locale: TickLabelLocale,
    formatter: Option<TickFormatter>,
}

impl Default for LinearScale {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearScale {
    /// Creates a scale over `(0, 1)` mapped onto `(0, 1)`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            raw_domain: (0.0, 1.0),
            nice: NiceDomain {
                min: 0.0,
                max: 1.0,
                ticks: (0..=5).map(|index| f64::from(index * 2) / 10.0).collect(),
                step: Some(0.2),
                precision: 1,
            },
            range: DEFAULT_RANGE,
            interval_count: DEFAULT_TICK_COUNT,
            fixed_ticks: None,
            locale: TickLabelLocale::default(),
            formatter: None,
        }
    }

    /// Sets the raw domain and recomputes the nice domain and ticks.
    pub fn domain(mut self, min: f64, max: f64) -> ScaleResult<Self> {
        self.raw_domain = (min, max);
        self.renice()
    }

    /// Derives the domain from raw values; missing and non-finite entries are ignored.
    pub fn domain_from_values<I>(self, values: I) -> ScaleResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        let Some(extent) = Extent::from_values(values) else {
            return Err(ScaleError::InvalidDomain(
                "linear scale cannot be built from values without numbers".to_owned(),
            ));
        };
        self.domain(extent.min, extent.max)
    }

    /// Overrides the target tick count and recomputes the ticks.
    pub fn with_interval_count(mut self, interval_count: usize) -> ScaleResult<Self> {
        self.interval_count = interval_count;
        self.renice()
    }

    /// Restricts ticks to caller-supplied values; the domain is not widened.
    pub fn with_fixed_ticks(mut self, ticks: Vec<f64>) -> ScaleResult<Self> {
        self.fixed_ticks = Some(ticks);
        self.renice()
    }

    #[must_use]
    pub fn with_tick_formatter(mut self, formatter: TickFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: TickLabelLocale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn raw_domain(&self) -> (f64, f64) {
        self.raw_domain
    }

    #[must_use]
    pub fn nice_domain(&self) -> (f64, f64) {
        (self.nice.min, self.nice.max)
    }

    /// Tick spacing, `None` when ticks were supplied by the caller.
    #[must_use]
    pub fn interval_size(&self) -> Option<f64> {
        self.nice.step
    }

    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.nice.interval_count()
    }

    #[must_use]
    pub fn display_precision(&self) -> usize {
        self.nice.precision
    }

    /// Unchecked affine mapping; non-finite input yields non-finite output.
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        interpolate(self.nice_domain(), self.range, value)
    }

    /// Maps a pixel back into domain units.
    #[must_use]
    pub fn range_to_domain(&self, pixel: f64) -> f64 {
        deinterpolate(self.nice_domain(), self.range, pixel)
    }

    fn renice(mut self) -> ScaleResult<Self> {
        let (min, max) = self.raw_domain;
        self.nice = nice_domain(min, max, self.fixed_ticks.as_deref(), self.interval_count)?;
        debug!(
            raw_min = min,
            raw_max = max,
            nice_min = self.nice.min,
            nice_max = self.nice.max,
            ticks = self.nice.ticks.len(),
            "linear scale domain"
        );
        Ok(self)
    }
}

impl Scale for LinearScale {
    type Value = f64;

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn with_range(mut self, start: f64, end: f64) -> ScaleResult<Self> {
        self.range = validate_range(start, end)?;
        Ok(self)
    }

    fn domain_to_range(&self, value: &f64) -> Option<f64> {
        value.is_finite().then(|| self.map(*value))
    }

    fn domain_to_range_fn(&self) -> DomainToRangeFn<f64>
    where
        Self: Clone + Send + Sync + 'static,
    {
        let (d0, d1) = self.nice_domain();
        let (r0, r1) = self.range;
        let span = d1 - d0;
        let (slope, midpoint) = if span == 0.0 {
            (0.0, (r0 + r1) / 2.0)
        } else {
            ((r1 - r0) / span, r0)
        };
        Box::new(move |value| {
            if !value.is_finite() {
                return None;
            }
            if slope == 0.0 {
                return Some(midpoint);
            }
            Some(r0 + (value - d0) * slope)
        })
    }

    fn ticks_domain(&self) -> Vec<f64> {
        self.nice.ticks.to_vec()
    }

    fn formatted_tick(&self, value: &f64) -> String {
        format_numeric_tick(
            *value,
            self.nice.precision,
            self.locale,
            self.formatter.as_ref(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_unit_domain_on_unit_range() {
        let scale = LinearScale::new();
        assert_eq!(scale.nice_domain(), (0.0, 1.0));
        assert_eq!(scale.range(), (0.0, 1.0));
        assert_eq!(scale.ticks_domain(), vec![0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        let reniced = LinearScale::new().domain(0.0, 1.0).expect("valid domain");
        assert_eq!(reniced, scale);
    }

    #[test]
    fn precomputed_fn_matches_direct_mapping() {
        let scale = LinearScale::new()
            .domain(-3.0, 17.0)
            .and_then(|scale| scale.with_range(400.0, 0.0))
            .expect("valid scale");
        let map = scale.domain_to_range_fn();
        for value in [-3.0, 0.0, 4.5, 17.0] {
            let direct = scale.domain_to_range(&value).expect("finite");
            let via_fn = map(&value).expect("finite");
            assert!((direct - via_fn).abs() <= 1e-9);
        }
        assert!(map(&f64::NAN).is_none());
    }
}

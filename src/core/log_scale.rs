//! Logarithmic scale with negative-number policies and a linear band around zero.
//!
//! Values pass through [`LogScale::log_value`] first, then an affine map from
//! the nice transformed domain onto the pixel range. Auto ticks are evenly
//! spaced in transformed space and reported back in domain units.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::extent::Extent;
use crate::core::nice::{
    DEFAULT_TICK_COUNT, NiceDomain, display_precision, nice_domain, sorted_unique_ticks,
};
use crate::core::scale::{DEFAULT_RANGE, Scale, deinterpolate, interpolate, validate_range};
use crate::core::tick_format::{TickFormatter, TickLabelLocale, format_numeric_tick};
use crate::error::{ScaleError, ScaleResult};

/// Logarithm base of a [`LogScale`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogBase {
    Base2,
    BaseE,
    #[default]
    Base10,
    /// Any finite base `> 0` other than `1`.
    Custom(f64),
}

impl LogBase {
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Base2 => 2.0,
            Self::BaseE => std::f64::consts::E,
            Self::Base10 => 10.0,
            Self::Custom(base) => base,
        }
    }

    #[must_use]
    pub fn log(self, value: f64) -> f64 {
        match self {
            Self::Base2 => value.log2(),
            Self::BaseE => value.ln(),
            Self::Base10 => value.log10(),
            Self::Custom(base) => value.ln() / base.ln(),
        }
    }

    #[must_use]
    pub fn pow(self, exponent: f64) -> f64 {
        match self {
            Self::Base2 => exponent.exp2(),
            Self::BaseE => exponent.exp(),
            Self::Base10 => 10_f64.powf(exponent),
            Self::Custom(base) => base.powf(exponent),
        }
    }

    fn validate(self) -> ScaleResult<Self> {
        let base = self.value();
        if !base.is_finite() || base <= 0.0 || base == 1.0 {
            return Err(ScaleError::UnsupportedMode(format!(
                "log base must be finite, > 0 and != 1, got {base}"
            )));
        }
        Ok(self)
    }
}

impl FromStr for LogBase {
    type Err = ScaleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "2" | "base_2" | "log2" => Ok(Self::Base2),
            "e" | "base_e" | "ln" => Ok(Self::BaseE),
            "10" | "base_10" | "log10" => Ok(Self::Base10),
            other => other
                .parse::<f64>()
                .map_err(|_| ScaleError::UnsupportedMode(format!("unknown log base: {other}")))
                .and_then(|base| Self::Custom(base).validate()),
        }
    }
}

/// How a [`LogScale`] treats values the logarithm cannot take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NegativeNumbers {
    /// Non-positive values are pinned to the lower bound of the axis.
    #[default]
    Clip,
    /// Non-positive values map to zero in log space.
    Mask,
    /// Signed log: `sign(v) * log(|v|)`.
    Sym,
}

impl FromStr for NegativeNumbers {
    type Err = ScaleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim() {
            "clip" => Ok(Self::Clip),
            "mask" => Ok(Self::Mask),
            "sym" => Ok(Self::Sym),
            other => Err(ScaleError::UnsupportedMode(format!(
                "unknown negative number policy: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogScale {
    raw_domain: (f64, f64),
    base: LogBase,
    negative_numbers: NegativeNumbers,
    linear_range: Option<f64>,
    interval_count: usize,
    tick_positions: Option<Vec<f64>>,
    // Domain in transformed (log) units.
    nice: NiceDomain,
    ticks: Vec<f64>,
    precision: usize,
    range: (f64, f64),
    locale: TickLabelLocale,
    formatter: Option<TickFormatter>,
}

impl LogScale {
    /// Creates a base-10 clipping scale over `(min, max)`.
    pub fn new(min: f64, max: f64) -> ScaleResult<Self> {
        Self {
            raw_domain: (min, max),
            base: LogBase::default(),
            negative_numbers: NegativeNumbers::default(),
            linear_range: None,
            interval_count: DEFAULT_TICK_COUNT,
            tick_positions: None,
            nice: NiceDomain {
                min: 0.0,
                max: 1.0,
                ticks: Default::default(),
                step: None,
                precision: 0,
            },
            ticks: Vec::new(),
            precision: 0,
            range: DEFAULT_RANGE,
            locale: TickLabelLocale::default(),
            formatter: None,
        }
        .renice()
    }

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
                "log scale cannot be built from values without numbers".to_owned(),
            ));
        };
        self.domain(extent.min, extent.max)
    }

    /// Derives the domain from the combined extent of several columns.
    pub fn domain_from_columns(self, columns: &[&[Option<f64>]]) -> ScaleResult<Self> {
        let Some(extent) = Extent::from_columns(columns.iter().copied()) else {
            return Err(ScaleError::InvalidDomain(
                "log scale cannot be built from columns without numbers".to_owned(),
            ));
        };
        self.domain(extent.min, extent.max)
    }

    pub fn with_base(mut self, base: LogBase) -> ScaleResult<Self> {
        self.base = base.validate()?;
        self.renice()
    }

    pub fn with_negative_numbers(mut self, negative_numbers: NegativeNumbers) -> ScaleResult<Self> {
        self.negative_numbers = negative_numbers;
        self.renice()
    }

    /// Sets the half-width of the band around zero that is mapped linearly.
    pub fn with_linear_range(mut self, linear_range: Option<f64>) -> ScaleResult<Self> {
        if let Some(threshold) = linear_range {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ScaleError::InvalidData(
                    "log scale linear range must be finite and >= 0".to_owned(),
                ));
            }
        }
        self.linear_range = linear_range;
        self.renice()
    }

    pub fn with_interval_count(mut self, interval_count: usize) -> ScaleResult<Self> {
        self.interval_count = interval_count;
        self.renice()
    }

    /// Uses explicit tick positions, given in domain units.
    pub fn with_tick_positions(mut self, positions: Vec<f64>) -> ScaleResult<Self> {
        self.tick_positions = Some(positions);
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
    pub fn base(&self) -> LogBase {
        self.base
    }

    #[must_use]
    pub fn negative_numbers(&self) -> NegativeNumbers {
        self.negative_numbers
    }

    #[must_use]
    pub fn linear_range(&self) -> Option<f64> {
        self.linear_range
    }

    /// Nice domain in transformed units.
    #[must_use]
    pub fn transformed_domain(&self) -> (f64, f64) {
        (self.nice.min, self.nice.max)
    }

    #[must_use]
    pub fn display_precision(&self) -> usize {
        self.precision
    }

    /// Transforms a domain value into log space according to the negative-number policy.
    ///
    /// Inside the linear band (`|v| <= L`) values pass through unchanged. Beyond
    /// it the logarithm is floored at `L`, so both branches meet at `|v| = L`.
    #[must_use]
    pub fn log_value(&self, value: f64) -> f64 {
        match self.negative_numbers {
            NegativeNumbers::Mask => self.masked(value),
            NegativeNumbers::Sym => self.symmetric(value),
            NegativeNumbers::Clip => {
                let lower = self.nice.min;
                if value <= 0.0 {
                    lower
                } else {
                    self.masked(value).max(lower)
                }
            }
        }
    }

    /// Maps a transformed value back into domain units.
    #[must_use]
    pub fn inverse_log_value(&self, transformed: f64) -> f64 {
        match self.negative_numbers {
            NegativeNumbers::Sym => {
                let threshold = self.threshold();
                if transformed.abs() <= threshold {
                    transformed
                } else {
                    transformed.signum() * self.base.pow(transformed.abs())
                }
            }
            NegativeNumbers::Mask | NegativeNumbers::Clip => match self.linear_range {
                Some(threshold) if transformed <= threshold => transformed,
                _ => self.base.pow(transformed),
            },
        }
    }

    /// Maps a pixel back into domain units.
    #[must_use]
    pub fn range_to_domain(&self, pixel: f64) -> f64 {
        self.inverse_log_value(deinterpolate(self.transformed_domain(), self.range, pixel))
    }

    fn threshold(&self) -> f64 {
        self.linear_range.unwrap_or(0.0)
    }

    fn masked(&self, value: f64) -> f64 {
        let threshold = self.threshold();
        if value <= 0.0 {
            0.0
        } else if value <= threshold {
            value
        } else if threshold > 0.0 {
            self.base.log(value).max(threshold)
        } else {
            self.base.log(value)
        }
    }

    fn symmetric(&self, value: f64) -> f64 {
        let threshold = self.threshold();
        if value.abs() <= threshold {
            value
        } else {
            value.signum() * self.base.log(value.abs()).max(threshold)
        }
    }

    fn transformed_extent(&self) -> (f64, f64) {
        let (min, max) = self.raw_domain;
        match self.negative_numbers {
            NegativeNumbers::Mask => (self.masked(min), self.masked(max)),
            NegativeNumbers::Sym => (self.symmetric(min), self.symmetric(max)),
            NegativeNumbers::Clip => {
                let upper = if max > 0.0 { self.masked(max) } else { 0.0 };
                let lower = if min > 0.0 {
                    self.masked(min)
                } else {
                    upper.min(0.0)
                };
                (lower, upper)
            }
        }
    }

    fn renice(mut self) -> ScaleResult<Self> {
        let (min, max) = self.raw_domain;
        if !min.is_finite() || !max.is_finite() {
            return Err(ScaleError::InvalidDomain(
                "log scale domain must be finite".to_owned(),
            ));
        }
        let (t_min, t_max) = self.transformed_extent();

        match self.tick_positions.clone() {
            Some(positions) => self.apply_fixed_ticks(t_min, t_max, &positions)?,
            None => {
                self.nice = nice_domain(t_min, t_max, None, self.interval_count)?;
                self.ticks = self
                    .nice
                    .ticks
                    .iter()
                    .map(|tick| self.inverse_log_value(*tick))
                    .collect();
            }
        }
        self.precision = display_precision(&self.ticks);

        debug!(
            raw_min = min,
            raw_max = max,
            log_min = self.nice.min,
            log_max = self.nice.max,
            base = self.base.value(),
            mode = ?self.negative_numbers,
            ticks = self.ticks.len(),
            "log scale domain"
        );
        Ok(self)
    }

    fn apply_fixed_ticks(&mut self, t_min: f64, t_max: f64, positions: &[f64]) -> ScaleResult<()> {
        let positions = sorted_unique_ticks(positions)?;
        let lower = t_min.min(t_max);
        let upper = t_min.max(t_max);

        let mut pairs: Vec<(f64, f64)> = Vec::with_capacity(positions.len());
        for position in positions {
            let Some(transformed) = self.fixed_tick_value(position, lower) else {
                trace!(position, "fixed log tick falls below the domain");
                continue;
            };
            match pairs.last_mut() {
                Some(last) if last.0 == transformed => {
                    // Collapsed positions keep the one that lies inside the raw domain.
                    if !self.in_raw_domain(last.1) && self.in_raw_domain(position) {
                        last.1 = position;
                    }
                    trace!(position, "fixed log tick collapses onto previous tick");
                }
                _ => pairs.push((transformed, position)),
            }
        }

        let transformed: Vec<f64> = pairs.iter().map(|(transformed, _)| *transformed).collect();
        self.nice = nice_domain(lower, upper, Some(&transformed), self.interval_count)?;
        let (nice_min, nice_max) = (self.nice.min, self.nice.max);
        self.ticks = pairs
            .into_iter()
            .filter(|(transformed, _)| *transformed >= nice_min && *transformed <= nice_max)
            .map(|(_, position)| position)
            .collect();
        Ok(())
    }

    /// Transformed value of a fixed tick position, `None` when clip mode drops it.
    ///
    /// Clip pins non-positive positions to `lower` only when the raw domain
    /// itself reaches zero; positive positions below `lower` are dropped.
    fn fixed_tick_value(&self, position: f64, lower: f64) -> Option<f64> {
        if self.negative_numbers != NegativeNumbers::Clip {
            return Some(self.log_value(position));
        }
        if position <= 0.0 {
            let (min, max) = self.raw_domain;
            return (min.min(max) <= 0.0).then_some(lower);
        }
        let transformed = self.masked(position);
        (transformed >= lower).then_some(transformed)
    }

    fn in_raw_domain(&self, value: f64) -> bool {
        let (min, max) = self.raw_domain;
        value >= min.min(max) && value <= min.max(max)
    }
}

impl Scale for LogScale {
    type Value = f64;

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn with_range(mut self, start: f64, end: f64) -> ScaleResult<Self> {
        self.range = validate_range(start, end)?;
        Ok(self)
    }

    fn domain_to_range(&self, value: &f64) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        Some(interpolate(
            self.transformed_domain(),
            self.range,
            self.log_value(*value),
        ))
    }

    fn ticks_domain(&self) -> Vec<f64> {
        self.ticks.clone()
    }

    fn formatted_tick(&self, value: &f64) -> String {
        format_numeric_tick(*value, self.precision, self.locale, self.formatter.as_ref())
    }
}

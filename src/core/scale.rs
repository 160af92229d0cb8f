//! The contract shared by every scale kind.
//!
//! Axis and geometry code only talks to [`Scale`]; [`AnyScale`] closes the set
//! of kinds so that code matching on it is checked exhaustively.

use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, LogScale, OrdinalScale, ScaleValue, TimeScale};
use crate::error::{ScaleError, ScaleResult};

/// Owned domain-to-range mapping detached from the scale that produced it.
///
/// The closure captures the range as it was when created; derive a new one
/// after `with_range`.
pub type DomainToRangeFn<V> = Box<dyn Fn(&V) -> Option<f64> + Send + Sync>;

pub const DEFAULT_RANGE: (f64, f64) = (0.0, 1.0);

pub trait Scale: Sized {
    type Value: 'static;

    /// Current pixel range `(r0, r1)`; `r0 > r1` for inverted axes.
    fn range(&self) -> (f64, f64);

    /// Returns a copy mapped onto a new pixel range. Domain and ticks are kept.
    fn with_range(self, start: f64, end: f64) -> ScaleResult<Self>;

    /// Maps a domain value to a pixel, `None` when the value cannot be placed.
    fn domain_to_range(&self, value: &Self::Value) -> Option<f64>;

    fn domain_to_range_fn(&self) -> DomainToRangeFn<Self::Value>
    where
        Self: Clone + Send + Sync + 'static,
    {
        let snapshot = self.clone();
        Box::new(move |value| snapshot.domain_to_range(value))
    }

    /// Tick positions in domain units, ascending.
    fn ticks_domain(&self) -> Vec<Self::Value>;

    /// Tick positions in pixels, in the same order as [`Scale::ticks_domain`].
    fn ticks_range(&self) -> Vec<f64> {
        self.ticks_domain()
            .iter()
            .filter_map(|tick| self.domain_to_range(tick))
            .collect()
    }

    fn formatted_tick(&self, value: &Self::Value) -> String;
}

pub(crate) fn validate_range(start: f64, end: f64) -> ScaleResult<(f64, f64)> {
    if !start.is_finite() || !end.is_finite() {
        return Err(ScaleError::InvalidRange { start, end });
    }
    Ok((start, end))
}

/// Affine map of `value` from `domain` onto `range`.
///
/// A zero-width domain lands on the middle of the range.
pub(crate) fn interpolate(domain: (f64, f64), range: (f64, f64), value: f64) -> f64 {
    let span = domain.1 - domain.0;
    if span == 0.0 {
        return (range.0 + range.1) / 2.0;
    }
    range.0 + (value - domain.0) / span * (range.1 - range.0)
}

/// Inverse of [`interpolate`].
pub(crate) fn deinterpolate(domain: (f64, f64), range: (f64, f64), pixel: f64) -> f64 {
    let span = range.1 - range.0;
    if span == 0.0 {
        return (domain.0 + domain.1) / 2.0;
    }
    domain.0 + (pixel - range.0) / span * (domain.1 - domain.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleKind {
    Linear,
    Log,
    Ordinal,
    Time,
}

/// Any of the four scale kinds behind one value type.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyScale {
    Linear(LinearScale),
    Log(LogScale),
    Ordinal(OrdinalScale),
    Time(TimeScale),
}

impl AnyScale {
    #[must_use]
    pub fn kind(&self) -> ScaleKind {
        match self {
            Self::Linear(_) => ScaleKind::Linear,
            Self::Log(_) => ScaleKind::Log,
            Self::Ordinal(_) => ScaleKind::Ordinal,
            Self::Time(_) => ScaleKind::Time,
        }
    }

    #[must_use]
    pub fn is_continuous(&self) -> bool {
        match self.kind() {
            ScaleKind::Linear | ScaleKind::Log | ScaleKind::Time => true,
            ScaleKind::Ordinal => false,
        }
    }
}

impl From<LinearScale> for AnyScale {
    fn from(value: LinearScale) -> Self {
        Self::Linear(value)
    }
}

impl From<LogScale> for AnyScale {
    fn from(value: LogScale) -> Self {
        Self::Log(value)
    }
}

impl From<OrdinalScale> for AnyScale {
    fn from(value: OrdinalScale) -> Self {
        Self::Ordinal(value)
    }
}

impl From<TimeScale> for AnyScale {
    fn from(value: TimeScale) -> Self {
        Self::Time(value)
    }
}

impl Scale for AnyScale {
    type Value = ScaleValue;

    fn range(&self) -> (f64, f64) {
        match self {
            Self::Linear(scale) => scale.range(),
            Self::Log(scale) => scale.range(),
            Self::Ordinal(scale) => scale.range(),
            Self::Time(scale) => scale.range(),
        }
    }

    fn with_range(self, start: f64, end: f64) -> ScaleResult<Self> {
        Ok(match self {
            Self::Linear(scale) => Self::Linear(scale.with_range(start, end)?),
            Self::Log(scale) => Self::Log(scale.with_range(start, end)?),
            Self::Ordinal(scale) => Self::Ordinal(scale.with_range(start, end)?),
            Self::Time(scale) => Self::Time(scale.with_range(start, end)?),
        })
    }

    fn domain_to_range(&self, value: &ScaleValue) -> Option<f64> {
        match (self, value) {
            (Self::Linear(scale), ScaleValue::Number(number)) => scale.domain_to_range(number),
            (Self::Log(scale), ScaleValue::Number(number)) => scale.domain_to_range(number),
            (Self::Ordinal(scale), ScaleValue::Category(category)) => {
                scale.domain_to_range(category)
            }
            (Self::Time(scale), ScaleValue::Time(time)) => scale.domain_to_range(time),
            _ => None,
        }
    }

    fn ticks_domain(&self) -> Vec<ScaleValue> {
        match self {
            Self::Linear(scale) => scale
                .ticks_domain()
                .into_iter()
                .map(ScaleValue::Number)
                .collect(),
            Self::Log(scale) => scale.ticks_domain().into_iter().map(ScaleValue::Number).collect(),
            Self::Ordinal(scale) => scale
                .ticks_domain()
                .into_iter()
                .map(ScaleValue::Category)
                .collect(),
            Self::Time(scale) => scale.ticks_domain().into_iter().map(ScaleValue::Time).collect(),
        }
    }

    fn ticks_range(&self) -> Vec<f64> {
        match self {
            Self::Linear(scale) => scale.ticks_range(),
            Self::Log(scale) => scale.ticks_range(),
            Self::Ordinal(scale) => scale.ticks_range(),
            Self::Time(scale) => scale.ticks_range(),
        }
    }

    fn formatted_tick(&self, value: &ScaleValue) -> String {
        match (self, value) {
            (Self::Linear(scale), ScaleValue::Number(number)) => scale.formatted_tick(number),
            (Self::Log(scale), ScaleValue::Number(number)) => scale.formatted_tick(number),
            (Self::Ordinal(scale), ScaleValue::Category(category)) => {
                scale.formatted_tick(category)
            }
            (Self::Time(scale), ScaleValue::Time(time)) => scale.formatted_tick(time),
            _ => String::new(),
        }
    }
}

//! Nice-number domain rounding and tick selection.
//!
//! Steps are drawn from the `{1, 2, 5} × 10^k` family. Tick values are computed
//! from integer tick indices (`index × multiplier / 10^-k`) so that a step of
//! `0.2` yields `1.2` rather than `1.2000000000000002`.

use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::error::{ScaleError, ScaleResult};

pub const DEFAULT_TICK_COUNT: usize = 10;

const MIN_TICK_COUNT: usize = 2;
const NICE_MULTIPLIERS: [i64; 3] = [1, 2, 5];
const MAX_DISPLAY_PRECISION: usize = 15;
// Absorbs representation noise in `value / step` before floor/ceil.
const TICK_INDEX_EPSILON: f64 = 1e-9;
const MAX_STEP_SEARCH: usize = 128;

pub type TickValues = SmallVec<[f64; 16]>;

/// Result of rounding a raw domain.
#[derive(Debug, Clone, PartialEq)]
pub struct NiceDomain {
    pub min: f64,
    pub max: f64,
    pub ticks: TickValues,
    /// Tick spacing for auto-generated ticks, `None` for caller-supplied ticks.
    pub step: Option<f64>,
    /// Decimal digits needed to tell adjacent ticks apart.
    pub precision: usize,
}

impl NiceDomain {
    /// Number of intervals between the first and last tick.
    #[must_use]
    pub fn interval_count(&self) -> usize {
        self.ticks.len().saturating_sub(1)
    }
}

/// A step of the form `multiplier × 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NiceStep {
    multiplier: i64,
    exponent: i32,
}

impl NiceStep {
    /// Largest nice step that does not exceed `raw`.
    fn at_or_below(raw: f64) -> Self {
        let exponent = raw.log10().floor() as i32;
        let mut step = Self {
            multiplier: 1,
            exponent,
        };
        for multiplier in NICE_MULTIPLIERS {
            let candidate = Self {
                multiplier,
                exponent,
            };
            if candidate.value(1) <= raw {
                step = candidate;
            }
        }
        step
    }

    fn next(self) -> Self {
        match self.multiplier {
            1 => Self {
                multiplier: 2,
                ..self
            },
            2 => Self {
                multiplier: 5,
                ..self
            },
            _ => Self {
                multiplier: 1,
                exponent: self.exponent + 1,
            },
        }
    }

    /// Value of the `index`-th multiple of this step.
    fn value(self, index: i64) -> f64 {
        let units = index.saturating_mul(self.multiplier) as f64;
        if self.exponent >= 0 {
            units * 10_f64.powi(self.exponent)
        } else {
            units / 10_f64.powi(-self.exponent)
        }
    }

    /// Inclusive tick index bounds covering `[min, max]`.
    fn index_bounds(self, min: f64, max: f64) -> (i64, i64) {
        let step = self.value(1);
        let mut lo = (min / step + TICK_INDEX_EPSILON).floor() as i64;
        let mut hi = (max / step - TICK_INDEX_EPSILON).ceil() as i64;
        if self.value(lo) > min {
            lo = lo.saturating_sub(1);
        } else if self.value(lo.saturating_add(1)) <= min {
            lo = lo.saturating_add(1);
        }
        if self.value(hi) < max {
            hi = hi.saturating_add(1);
        } else if self.value(hi.saturating_sub(1)) >= max {
            hi = hi.saturating_sub(1);
        }
        (lo, hi)
    }

    fn precision(self) -> usize {
        if self.exponent >= 0 {
            0
        } else {
            self.exponent.unsigned_abs() as usize
        }
    }
}

/// Rounds `(min, max)` into a nice domain with evenly spaced ticks.
///
/// With `fixed_ticks`, only the tick set is constrained: ticks outside
/// `[min, max]` are dropped and the domain is passed through. Reversed bounds
/// are swapped; a zero-width domain is widened towards zero.
pub fn nice_domain(
    min: f64,
    max: f64,
    fixed_ticks: Option<&[f64]>,
    tick_count: usize,
) -> ScaleResult<NiceDomain> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ScaleError::InvalidDomain(
            "domain bounds must be finite".to_owned(),
        ));
    }
    let (min, max) = if min > max { (max, min) } else { (min, max) };
    let (min, max) = widen_degenerate(min, max);
    if !(max - min).is_finite() {
        return Err(ScaleError::InvalidDomain(
            "domain span must be finite".to_owned(),
        ));
    }

    match fixed_ticks {
        Some(ticks) => fixed_tick_domain(min, max, ticks),
        None => auto_tick_domain(min, max, tick_count.max(MIN_TICK_COUNT)),
    }
}

/// Widens a zero-width domain so it always renders with a visible span.
#[must_use]
pub fn widen_degenerate(min: f64, max: f64) -> (f64, f64) {
    if min != max {
        return (min, max);
    }
    let widened = if max > 0.0 {
        (0.0, max)
    } else if max < 0.0 {
        (max, 0.0)
    } else {
        (0.0, 1.0)
    };
    debug!(
        value = max,
        widened_min = widened.0,
        widened_max = widened.1,
        "widened degenerate domain"
    );
    widened
}

fn auto_tick_domain(min: f64, max: f64, tick_count: usize) -> ScaleResult<NiceDomain> {
    let span = max - min;
    let mut step = checked_step(NiceStep::at_or_below(span / (tick_count - 1) as f64))?;
    let mut bounds = step.index_bounds(min, max);
    for _ in 0..MAX_STEP_SEARCH {
        let count = bounds.1.saturating_sub(bounds.0).saturating_add(1) as usize;
        // Past the span, a domain straddling zero keeps three ticks whatever the step.
        if count <= tick_count || step.value(1) >= span {
            break;
        }
        step = checked_step(step.next())?;
        bounds = step.index_bounds(min, max);
    }
    let (nice_min, nice_max) = (step.value(bounds.0), step.value(bounds.1));
    if !nice_min.is_finite() || !nice_max.is_finite() {
        return Err(ScaleError::InvalidDomain(format!(
            "nice domain of [{min}, {max}] overflows f64"
        )));
    }

    let ticks: TickValues = (bounds.0..=bounds.1).map(|index| step.value(index)).collect();
    let nice = NiceDomain {
        min: nice_min,
        max: nice_max,
        step: Some(step.value(1)),
        precision: step.precision(),
        ticks,
    };
    trace!(
        raw_min = min,
        raw_max = max,
        nice_min = nice.min,
        nice_max = nice.max,
        step = step.value(1),
        tick_count = nice.ticks.len(),
        "computed nice domain"
    );
    Ok(nice)
}

/// Rejects steps whose `10^k` factor leaves the normal `f64` range.
fn checked_step(step: NiceStep) -> ScaleResult<NiceStep> {
    let value = step.value(1);
    if value.is_normal() && value > 0.0 {
        Ok(step)
    } else {
        Err(ScaleError::InvalidDomain(format!(
            "tick step 10^{} is outside the f64 range",
            step.exponent
        )))
    }
}

fn fixed_tick_domain(min: f64, max: f64, fixed_ticks: &[f64]) -> ScaleResult<NiceDomain> {
    let candidates = sorted_unique_ticks(fixed_ticks)?;
    let ticks: TickValues = candidates
        .iter()
        .copied()
        .filter(|tick| *tick >= min && *tick <= max)
        .collect();

    let dropped = candidates.len() - ticks.len();
    if ticks.is_empty() {
        warn!(min, max, candidates = candidates.len(), "no fixed tick falls inside the domain");
    } else if dropped > 0 {
        trace!(dropped, "dropped fixed ticks outside the domain");
    }

    Ok(NiceDomain {
        min,
        max,
        precision: display_precision(&ticks),
        ticks,
        step: None,
    })
}

/// Sorts and de-duplicates caller-supplied ticks, rejecting non-finite entries.
pub fn sorted_unique_ticks(ticks: &[f64]) -> ScaleResult<Vec<f64>> {
    if ticks.iter().any(|tick| !tick.is_finite()) {
        return Err(ScaleError::InvalidTicks(
            "fixed ticks must be finite".to_owned(),
        ));
    }
    let mut sorted: Vec<OrderedFloat<f64>> = ticks.iter().copied().map(OrderedFloat).collect();
    sorted.sort_unstable();
    sorted.dedup();
    Ok(sorted.into_iter().map(OrderedFloat::into_inner).collect())
}

/// Smallest number of decimals for which no two adjacent ticks format identically.
#[must_use]
pub fn display_precision(ticks: &[f64]) -> usize {
    if ticks.len() < 2 {
        return 0;
    }
    (0..=MAX_DISPLAY_PRECISION)
        .find(|precision| {
            ticks.windows(2).all(|pair| {
                format!("{:.*}", precision, pair[0]) != format!("{:.*}", precision, pair[1])
            })
        })
        .unwrap_or(MAX_DISPLAY_PRECISION)
}

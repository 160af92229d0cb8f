use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{ScaleError, ScaleResult};

/// Finite `(min, max)` envelope of a value collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

impl Extent {
    /// Builds an extent from explicit bounds, swapping them when reversed.
    pub fn new(min: f64, max: f64) -> ScaleResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ScaleError::InvalidDomain(
                "extent bounds must be finite".to_owned(),
            ));
        }
        Ok(Self {
            min: min.min(max),
            max: min.max(max),
        })
    }

    /// Scans raw values, skipping missing and non-finite entries.
    ///
    /// Returns `None` when nothing numeric is left.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator,
        I::Item: Into<Option<f64>>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            let Some(value) = value.into() else {
                continue;
            };
            if !value.is_finite() {
                continue;
            }
            min = min.min(value);
            max = max.max(value);
        }

        if min.is_finite() && max.is_finite() {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Combined envelope of several columns, e.g. every series plotted on one log axis.
    pub fn from_columns<'a, I>(columns: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [Option<f64>]>,
    {
        columns
            .into_iter()
            .filter_map(|column| Self::from_values(column.iter().copied()))
            .reduce(Self::combine)
    }

    /// Envelope of a decimal column.
    pub fn from_decimals(values: &[Decimal]) -> ScaleResult<Option<Self>> {
        let mut converted = Vec::with_capacity(values.len());
        for value in values {
            converted.push(decimal_to_f64(*value, "column value")?);
        }
        Ok(Self::from_values(converted))
    }

    #[must_use]
    pub fn combine(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.max - self.min
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        self.min == self.max
    }
}

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ScaleResult<f64> {
    value.to_f64().ok_or_else(|| {
        ScaleError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_skips_missing_and_non_finite() {
        let extent = Extent::from_values([Some(3.0), None, Some(f64::NAN), Some(-1.5)])
            .expect("numeric values present");
        assert_eq!(extent, Extent { min: -1.5, max: 3.0 });
    }

    #[test]
    fn from_values_without_numbers_is_none() {
        assert!(Extent::from_values([None::<f64>, None]).is_none());
        assert!(Extent::from_values(Vec::<f64>::new()).is_none());
    }

    #[test]
    fn new_swaps_reversed_bounds() {
        let extent = Extent::new(5.0, -5.0).expect("finite");
        assert_eq!((extent.min, extent.max), (-5.0, 5.0));
        assert!(Extent::new(f64::INFINITY, 0.0).is_err());
    }
}

use indexmap::IndexSet;
use tracing::debug;

use crate::core::scale::{DEFAULT_RANGE, Scale, deinterpolate, validate_range};
use crate::core::types::Band;
use crate::error::{ScaleError, ScaleResult};

pub const DEFAULT_BAND_PADDING: f64 = 0.1;

/// Discrete scale that splits the range into one band per category.
///
/// Categories keep their first-appearance order; duplicates are dropped.
#[derive(Debug, Clone)]
pub struct OrdinalScale {
    categories: IndexSet<String>,
    padding: f64,
    range: (f64, f64),
}

impl PartialEq for OrdinalScale {
    fn eq(&self, other: &Self) -> bool {
        self.padding == other.padding
            && self.range == other.range
            && self.categories.iter().eq(other.categories.iter())
    }
}

impl OrdinalScale {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let categories: IndexSet<String> = categories.into_iter().map(Into::into).collect();
        debug!(categories = categories.len(), "ordinal scale domain");
        Self {
            categories,
            padding: DEFAULT_BAND_PADDING,
            range: DEFAULT_RANGE,
        }
    }

    /// Sets the gap between adjacent bands as a fraction of one slot.
    pub fn with_padding(mut self, padding: f64) -> ScaleResult<Self> {
        if !padding.is_finite() || !(0.0..1.0).contains(&padding) {
            return Err(ScaleError::InvalidData(
                "ordinal padding must be in [0, 1)".to_owned(),
            ));
        }
        self.padding = padding;
        Ok(self)
    }

    #[must_use]
    pub fn padding(&self) -> f64 {
        self.padding
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, category: &str) -> Option<usize> {
        self.categories.get_index_of(category)
    }

    /// Absolute width of every band; `0` without categories.
    #[must_use]
    pub fn band_width(&self) -> f64 {
        self.signed_band_width().abs()
    }

    #[must_use]
    pub fn band(&self, category: &str) -> Option<Band> {
        self.index_of(category).map(|index| self.band_at(index))
    }

    /// Band of the category at `index` in domain order.
    #[must_use]
    pub fn band_at(&self, index: usize) -> Band {
        let width = self.signed_band_width();
        let start = self.range.0 + index as f64 * (width + self.signed_gap());
        Band::new(start, start + width)
    }

    /// Category whose slot contains `pixel`, gaps included.
    #[must_use]
    pub fn category_at(&self, pixel: f64) -> Option<&str> {
        let count = self.categories.len();
        if count == 0 || !pixel.is_finite() {
            return None;
        }
        let position = deinterpolate((0.0, count as f64), self.range, pixel);
        if !(0.0..=count as f64).contains(&position) {
            return None;
        }
        let index = (position.floor() as usize).min(count - 1);
        self.categories.get_index(index).map(String::as_str)
    }

    fn slot(&self) -> f64 {
        let count = self.categories.len();
        if count == 0 {
            return 0.0;
        }
        (self.range.1 - self.range.0) / count as f64
    }

    fn signed_gap(&self) -> f64 {
        self.padding * self.slot()
    }

    // N bands plus N-1 gaps fill the range exactly.
    fn signed_band_width(&self) -> f64 {
        let count = self.categories.len();
        if count == 0 {
            return 0.0;
        }
        let gaps = (count - 1) as f64 * self.signed_gap();
        (self.range.1 - self.range.0 - gaps) / count as f64
    }
}

impl Scale for OrdinalScale {
    type Value = String;

    fn range(&self) -> (f64, f64) {
        self.range
    }

    fn with_range(mut self, start: f64, end: f64) -> ScaleResult<Self> {
        self.range = validate_range(start, end)?;
        Ok(self)
    }

    fn domain_to_range(&self, value: &String) -> Option<f64> {
        self.band(value).map(|band| band.center())
    }

    fn ticks_domain(&self) -> Vec<String> {
        self.categories.iter().cloned().collect()
    }

    fn formatted_tick(&self, value: &String) -> String {
        value.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_keep_first_appearance_order() {
        let scale = OrdinalScale::new(["b", "a", "b", "c", "a"]);
        assert_eq!(scale.categories(), vec!["b", "a", "c"]);
        assert_eq!(scale.index_of("c"), Some(2));
    }

    #[test]
    fn padding_outside_unit_interval_is_rejected() {
        assert!(OrdinalScale::new(["a"]).with_padding(1.0).is_err());
        assert!(OrdinalScale::new(["a"]).with_padding(-0.1).is_err());
        assert!(OrdinalScale::new(["a"]).with_padding(f64::NAN).is_err());
        assert!(OrdinalScale::new(["a"]).with_padding(0.0).is_ok());
    }

    #[test]
    fn single_category_fills_the_range() {
        let scale = OrdinalScale::new(["only"])
            .with_range(10.0, 110.0)
            .expect("finite range");
        let band = scale.band("only").expect("known category");
        assert_eq!(band, Band::new(10.0, 110.0));
    }

    #[test]
    fn category_at_resolves_pixels_to_slots() {
        let scale = OrdinalScale::new(["a", "b", "c", "d"])
            .with_range(0.0, 400.0)
            .expect("finite range");
        assert_eq!(scale.category_at(50.0), Some("a"));
        assert_eq!(scale.category_at(399.0), Some("d"));
        assert_eq!(scale.category_at(400.0), Some("d"));
        assert_eq!(scale.category_at(-1.0), None);
    }
}

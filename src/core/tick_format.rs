use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Decimal separator convention for numeric tick labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TickLabelLocale {
    #[default]
    EnUs,
    EsEs,
}

/// Caller-supplied numeric label formatter.
///
/// Cloning shares the underlying closure.
#[derive(Clone)]
pub struct TickFormatter(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl TickFormatter {
    pub fn new<F>(format: F) -> Self
    where
        F: Fn(f64) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(format))
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for TickFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TickFormatter(..)")
    }
}

impl PartialEq for TickFormatter {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Formats `value` with a fixed number of decimals.
///
/// Negative zero is printed as zero so a tick at `-0.0` never reads `-0`.
#[must_use]
pub fn format_tick_decimal(value: f64, precision: usize, locale: TickLabelLocale) -> String {
    if !value.is_finite() {
        return format!("{value}");
    }
    let mut text = format!("{value:.precision$}");
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text.remove(0);
    }
    match locale {
        TickLabelLocale::EnUs => text,
        TickLabelLocale::EsEs => text.replace('.', ","),
    }
}

/// Shared label path for numeric scales: custom formatter first, then decimals.
pub(crate) fn format_numeric_tick(
    value: f64,
    precision: usize,
    locale: TickLabelLocale,
    formatter: Option<&TickFormatter>,
) -> String {
    match formatter {
        Some(formatter) => formatter.format(value),
        None => format_tick_decimal(value, precision, locale),
    }
}

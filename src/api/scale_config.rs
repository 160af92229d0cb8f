use serde::{Deserialize, Serialize};

use crate::core::nice::DEFAULT_TICK_COUNT;
use crate::core::scale::DEFAULT_RANGE;
use crate::core::{DEFAULT_BAND_PADDING, LogBase, NegativeNumbers, ScaleKind, TickLabelLocale};
use crate::error::{ScaleError, ScaleResult};

/// Serializable description of one scale.
///
/// Host applications persist this next to their chart setup and rebuild the
/// scale from fresh data with [`ScaleConfig::build`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleConfig {
    pub kind: ScaleKind,
    #[serde(default = "default_range")]
    pub range: (f64, f64),
    #[serde(default = "default_interval_count")]
    pub interval_count: usize,
    #[serde(default)]
    pub fixed_ticks: Option<Vec<f64>>,
    #[serde(default)]
    pub locale: TickLabelLocale,
    #[serde(default)]
    pub log: LogScaleOptions,
    #[serde(default = "default_padding")]
    pub padding: f64,
    #[serde(default)]
    pub display_format: Option<String>,
}

/// Parameters only read by log scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LogScaleOptions {
    #[serde(default)]
    pub base: LogBase,
    #[serde(default)]
    pub negative_numbers: NegativeNumbers,
    #[serde(default)]
    pub linear_range: Option<f64>,
}

impl ScaleConfig {
    #[must_use]
    pub fn new(kind: ScaleKind) -> Self {
        Self {
            kind,
            range: default_range(),
            interval_count: default_interval_count(),
            fixed_ticks: None,
            locale: TickLabelLocale::default(),
            log: LogScaleOptions::default(),
            padding: default_padding(),
            display_format: None,
        }
    }

    #[must_use]
    pub fn with_range(mut self, start: f64, end: f64) -> Self {
        self.range = (start, end);
        self
    }

    #[must_use]
    pub fn with_interval_count(mut self, interval_count: usize) -> Self {
        self.interval_count = interval_count;
        self
    }

    #[must_use]
    pub fn with_fixed_ticks(mut self, ticks: Vec<f64>) -> Self {
        self.fixed_ticks = Some(ticks);
        self
    }

    #[must_use]
    pub fn with_locale(mut self, locale: TickLabelLocale) -> Self {
        self.locale = locale;
        self
    }

    #[must_use]
    pub fn with_log(mut self, log: LogScaleOptions) -> Self {
        self.log = log;
        self
    }

    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    #[must_use]
    pub fn with_display_format(mut self, format: impl Into<String>) -> Self {
        self.display_format = Some(format.into());
        self
    }

    /// Checks the fields that do not depend on data.
    pub fn validate(&self) -> ScaleResult<()> {
        let (start, end) = self.range;
        if !start.is_finite() || !end.is_finite() {
            return Err(ScaleError::InvalidRange { start, end });
        }
        if !self.padding.is_finite() || !(0.0..1.0).contains(&self.padding) {
            return Err(ScaleError::InvalidData(
                "ordinal padding must be in [0, 1)".to_owned(),
            ));
        }
        if let Some(ticks) = &self.fixed_ticks {
            if ticks.iter().any(|tick| !tick.is_finite()) {
                return Err(ScaleError::InvalidTicks(
                    "fixed ticks must be finite".to_owned(),
                ));
            }
        }
        if let Some(threshold) = self.log.linear_range {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(ScaleError::InvalidData(
                    "log scale linear range must be finite and >= 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}

fn default_range() -> (f64, f64) {
    DEFAULT_RANGE
}

fn default_interval_count() -> usize {
    DEFAULT_TICK_COUNT
}

fn default_padding() -> f64 {
    DEFAULT_BAND_PADDING
}

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::{
    AnyScale, Extent, LinearScale, LogScale, OrdinalScale, Scale, ScaleKind, TimeScale, TimeValue,
};
use crate::error::{ScaleError, ScaleResult};

use super::ScaleConfig;

/// Data a [`ScaleConfig`] is built against.
#[derive(Debug, Clone, Copy)]
pub enum ScaleInput<'a> {
    /// One numeric column; `None` marks a missing value.
    Numbers(&'a [Option<f64>]),
    /// Several numeric columns sharing one axis.
    Columns(&'a [&'a [Option<f64>]]),
    Decimals(&'a [Decimal]),
    Categories(&'a [String]),
    Times(&'a [TimeValue]),
}

impl ScaleInput<'_> {
    fn name(self) -> &'static str {
        match self {
            Self::Numbers(_) => "numbers",
            Self::Columns(_) => "columns",
            Self::Decimals(_) => "decimals",
            Self::Categories(_) => "categories",
            Self::Times(_) => "times",
        }
    }

    fn numeric_extent(self) -> ScaleResult<Option<Extent>> {
        match self {
            Self::Numbers(values) => Ok(Extent::from_values(values.iter().copied())),
            Self::Columns(columns) => Ok(Extent::from_columns(columns.iter().copied())),
            Self::Decimals(values) => Extent::from_decimals(values),
            Self::Categories(_) | Self::Times(_) => Err(ScaleError::UnsupportedMode(format!(
                "numeric scale cannot be built from {}",
                self.name()
            ))),
        }
    }
}

impl ScaleConfig {
    /// Builds the configured scale over the extent of `input`.
    pub fn build(&self, input: ScaleInput<'_>) -> ScaleResult<AnyScale> {
        self.validate()?;
        let (start, end) = self.range;
        let scale: AnyScale = match self.kind {
            ScaleKind::Linear => {
                let extent = require_extent(input)?;
                let mut scale = LinearScale::new()
                    .domain(extent.min, extent.max)?
                    .with_interval_count(self.interval_count)?
                    .with_locale(self.locale);
                if let Some(ticks) = &self.fixed_ticks {
                    scale = scale.with_fixed_ticks(ticks.clone())?;
                }
                scale.with_range(start, end)?.into()
            }
            ScaleKind::Log => {
                let extent = require_extent(input)?;
                let mut scale = LogScale::new(extent.min, extent.max)?
                    .with_base(self.log.base)?
                    .with_negative_numbers(self.log.negative_numbers)?
                    .with_linear_range(self.log.linear_range)?
                    .with_interval_count(self.interval_count)?
                    .with_locale(self.locale);
                if let Some(ticks) = &self.fixed_ticks {
                    scale = scale.with_tick_positions(ticks.clone())?;
                }
                scale.with_range(start, end)?.into()
            }
            ScaleKind::Ordinal => {
                let ScaleInput::Categories(categories) = input else {
                    return Err(ScaleError::UnsupportedMode(format!(
                        "ordinal scale cannot be built from {}",
                        input.name()
                    )));
                };
                OrdinalScale::new(categories.iter().cloned())
                    .with_padding(self.padding)?
                    .with_range(start, end)?
                    .into()
            }
            ScaleKind::Time => {
                let ScaleInput::Times(values) = input else {
                    return Err(ScaleError::UnsupportedMode(format!(
                        "time scale cannot be built from {}",
                        input.name()
                    )));
                };
                let Some(first) = values.first().copied() else {
                    return Err(ScaleError::InvalidDomain(
                        "time scale cannot be built from an empty value set".to_owned(),
                    ));
                };
                let mut scale = TimeScale::new(first, first)?
                    .with_interval_count(self.interval_count)?
                    .domain_from_values(values.iter().copied())?;
                if let Some(format) = &self.display_format {
                    scale = scale.with_display_format(format.clone())?;
                }
                scale.with_range(start, end)?.into()
            }
        };
        debug!(kind = ?self.kind, input = input.name(), "built scale from config");
        Ok(scale)
    }
}

fn require_extent(input: ScaleInput<'_>) -> ScaleResult<Extent> {
    input.numeric_extent()?.ok_or_else(|| {
        ScaleError::InvalidDomain("numeric scale needs at least one finite value".to_owned())
    })
}

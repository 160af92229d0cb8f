pub mod calendar;
pub mod extent;
pub mod linear_scale;
pub mod log_scale;
pub mod nice;
pub mod ordinal_scale;
pub mod projection;
pub mod scale;
pub mod tick_format;
pub mod time_scale;
pub mod types;

pub use extent::Extent;
pub use linear_scale::LinearScale;
pub use log_scale::{LogBase, LogScale, NegativeNumbers};
pub use nice::{DEFAULT_TICK_COUNT, NiceDomain, nice_domain};
pub use ordinal_scale::{DEFAULT_BAND_PADDING, OrdinalScale};
pub use projection::{project_points, project_values, try_project_values};
pub use scale::{AnyScale, DomainToRangeFn, Scale, ScaleKind};
pub use tick_format::{TickFormatter, TickLabelLocale, format_tick_decimal};
pub use time_scale::{TickInterval, TimeScale, TimeUnit};
pub use types::{Band, ScaleValue, TimeKind, TimeValue};

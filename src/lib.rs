//! chart-scales: domain-to-pixel scales and axis tick generation.
//!
//! Four scale kinds (linear, logarithmic, ordinal bands and calendar time)
//! share one [`Scale`] contract: a nice domain, a tick set, a monotonic
//! mapping onto a pixel range and tick label formatting.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{ScaleConfig, ScaleInput};
pub use core::{
    AnyScale, Band, LinearScale, LogBase, LogScale, NegativeNumbers, OrdinalScale, Scale,
    ScaleKind, ScaleValue, TimeKind, TimeScale, TimeValue,
};
pub use error::{ScaleError, ScaleResult};

//! Telemetry helpers for applications embedding `chart-scales`.
//!
//! Scale construction emits `tracing` events (nice-domain results, degenerate
//! domain recovery, dropped fixed ticks). Nothing is printed unless the host
//! installs a subscriber, either its own or one from this module.

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_TRACING_FILTER: &str = "warn,chart_scales=info";

/// Installs a compact subscriber filtered by `RUST_LOG`, or
/// [`DEFAULT_TRACING_FILTER`] when the variable is unset.
///
/// Returns `false` when the `telemetry` feature is disabled or a global
/// subscriber is already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter(DEFAULT_TRACING_FILTER)
}

/// Same as [`init_default_tracing`] with a caller-chosen fallback filter.
#[must_use]
pub fn init_tracing_with_filter(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialization_reports_false() {
        let _ = init_default_tracing();
        assert!(!init_tracing_with_filter("debug"));
    }
}

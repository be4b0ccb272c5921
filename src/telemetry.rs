//! Opt-in tracing bootstrap for hosts embedding the layout engine.
//!
//! The engine itself only emits `tracing` events; installing a subscriber is
//! left to the embedding widget. Hosts that do not bring their own can enable
//! the `telemetry` feature and call [`init_default_tracing`] once at startup.

/// Installs a compact `tracing` subscriber honoring `RUST_LOG`.
///
/// Without an environment filter the layout crate logs at `debug` and
/// everything else at `warn`, which surfaces config coercions and layout
/// passes without drowning the host's output.
///
/// Returns `false` when the `telemetry` feature is off or another global
/// subscriber won the race.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn,calgrid_rs=debug"));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

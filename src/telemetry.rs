//! Tracing setup helpers for hosts embedding `statchart-rs`.
//!
//! Nothing here runs implicitly. A host either calls
//! [`init_default_tracing`] once at startup or installs its own `tracing`
//! subscriber; the engine itself only emits events.

/// Installs a compact global `tracing` subscriber when the `telemetry`
/// feature is enabled, filtered by `RUST_LOG` with an `info` fallback.
///
/// Returns `true` when the subscriber was installed, `false` when the
/// feature is off or another subscriber already owns the global slot.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_target(false)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

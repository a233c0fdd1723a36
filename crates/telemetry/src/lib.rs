//! Tracing subscriber bootstrap driven by [`TelemetrySettings`].

use anyhow::{anyhow, Context};
use bookshelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Build the log filter. `RUST_LOG` takes precedence over the configured level.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.log_level)
            .with_context(|| format!("invalid log level '{}'", settings.log_level)),
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a global subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;

    let installed = match settings.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .try_init(),
    };
    installed.map_err(|err| anyhow!("failed to install tracing subscriber: {err}"))?;

    tracing::info!(
        target: "bookshelf-telemetry",
        format = ?settings.log_format,
        level = %settings.log_level,
        "telemetry initialized"
    );
    Ok(())
}

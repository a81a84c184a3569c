//! Logging bootstrap.

use std::io;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use formfill_core::config::{LogFormat, LoggingConfig};

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins over `config.level` when set. Calling this again after a
/// subscriber is installed is a no-op.
///
/// # Errors
///
/// Returns an error if the filter directive does not parse.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_filter(config)?;
    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_target(true).with_writer(io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(false).with_writer(io::stderr))
            .try_init(),
    };

    match installed {
        Ok(()) => tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized"),
        Err(e) => tracing::debug!(error = %e, "Subscriber already installed"),
    }
    Ok(())
}

fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.is_empty() => EnvFilter::try_new(&directive)
            .with_context(|| format!("Invalid RUST_LOG directive '{}'", directive)),
        _ => EnvFilter::try_new(&config.level)
            .with_context(|| format!("Invalid log level '{}'", config.level)),
    }
}

//! Logging bootstrap
//!
//! Installs a `tracing` subscriber writing to stderr. The library crates log
//! through the `log` facade; those records reach the subscriber through its
//! `tracing-log` bridge.

use anyhow::anyhow;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_DIRECTIVE: &str = "info";

/// Install the global subscriber. A second call returns an error instead of
/// replacing the first subscriber.
pub fn init_logging() -> anyhow::Result<()> {
    init_logging_with(DEFAULT_DIRECTIVE)
}

/// [`init_logging`] with another fallback filter, e.g. `"admin_console_core=debug"`.
pub fn init_logging_with(default_directive: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| anyhow!("invalid log filter '{default_directive}': {e}"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .map_err(|e| anyhow!("logging already initialised: {e}"))?;

    tracing::debug!("Logging initialised");
    Ok(())
}

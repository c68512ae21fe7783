/// Logging setup
///
/// Installs a global tracing subscriber. Logs go to stderr so command output
/// on stdout stays clean.

use crate::config::{Config, LogFormat};
use crate::error::{ExpenseError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the global subscriber described by `config`
///
/// Fails if the filter directive doesn't parse or a subscriber is already set.
pub fn init(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_filter).map_err(|e| {
        ExpenseError::Config(format!("invalid log filter '{}': {}", config.log_filter, e))
    })?;

    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| ExpenseError::Generic(format!("logging already initialized: {}", e)))
}

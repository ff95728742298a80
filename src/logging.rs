//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::cli::CliError;

/// Environment variable holding an `EnvFilter` directive, e.g. `debug` or
/// `pandoc_defaults=trace`. Takes precedence over `-v` flags.
pub const LOG_ENV: &str = "PANDOC_DEFAULTS_LOG";

/// Filter used when [`LOG_ENV`] is unset: `warn`, raised one level per `-v`.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install a stderr fmt subscriber. Stdout is reserved for the defaults file.
pub fn init(verbosity: u8) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

//! Logging subscriber initialisation.

use std::io;

use clap::{Args, ValueEnum};
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

/// Log output format.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub(crate) enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub(crate) struct LoggingArgs {
    /// Log level or filter directives (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "RUST_LOG", default_value = "warn")]
    pub(crate) log_level: String,

    /// Log format (compact, json)
    #[arg(long, global = true, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub(crate) log_format: LogFormat,
}

impl LoggingArgs {
    /// Install the global subscriber. Logs go to stderr so tables on stdout stay clean.
    pub(crate) fn init(&self) -> Result<(), TryInitError> {
        match self.log_format {
            LogFormat::Compact => self.init_with_layer(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_writer(io::stderr)
                    .with_target(true),
            ),
            LogFormat::Json => self.init_with_layer(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(io::stderr)
                    .with_current_span(true)
                    .with_target(true),
            ),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_new(&self.log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
    }

    fn init_with_layer<L>(&self, fmt_layer: L) -> Result<(), TryInitError>
    where
        L: Layer<Registry> + Send + Sync + 'static,
    {
        tracing_subscriber::registry()
            .with(fmt_layer)
            .with(self.env_filter())
            .try_init()
    }
}

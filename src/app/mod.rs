//! Command-line front end: resolve configuration, build a logger, emit one entry.

pub mod config;

pub use config::{Cli, ConfigError, LoggerConfig, OutputTarget, TextConfig};

use crate::Logger;
use crate::domain::Level;
use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the subscriber for the binary's own diagnostics.
///
/// `RUST_LOG` wins; otherwise the logger threshold is reused.
pub fn init_tracing(level: Level) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy();

    // A second call (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .compact(),
        )
        .try_init();
}

pub fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = cli.to_config()?;
    init_tracing(config.level);
    debug!(
        format = ?config.format,
        threshold = %config.level,
        output = ?config.output,
        fields = config.fields.len(),
        "resolved logger configuration"
    );

    let logger = config.build()?;
    let logger = match cli.attached_error() {
        Some(err) => logger.with_error(err),
        None => logger,
    };

    logger.print(cli.at, &cli.message())?;
    Ok(())
}

use anyhow::Result;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*};

use crate::config::{LogConfig, LogLevel};

pub const LOG_FILE: &str = "plugin_bridge.log";

/// Filter for `level`; `RUST_LOG` wins when it is set and valid.
pub fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_ref()))
}

/// Installs the global subscriber.
///
/// Logs never go to stdout, the stdio transport owns it. With a `log_dir`
/// they go to a daily rolling file and the returned guard must be kept alive
/// until shutdown so buffered lines are flushed; otherwise they go to stderr.
pub fn init_tracing(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let filter = env_filter(config.log_level);

    match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            Registry::default()
                .with(filter)
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(false)
                        .with_writer(writer),
                )
                .try_init()?;
            Ok(Some(guard))
        }
        None => {
            Registry::default()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .try_init()?;
            Ok(None)
        }
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod channels;
pub mod dispatch;
pub mod serve;

use channels::ChannelsArgs;
use dispatch::DispatchArgs;
use plugin_bridge::config::{BridgeConfig, LogLevel};
use serve::ServeArgs;

#[derive(Parser, Debug)]
#[command(
    name = "plugin_bridge",
    about = "Routes platform channel messages to in-process plugin handlers",
    version
)]
pub struct Cli {
    /// Log level override (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<LogLevel>,

    /// Write logs to a daily rolling file in this directory instead of stderr
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// Env file to load before reading configuration (default: ./.env if present)
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve platform messages as JSON lines over stdin/stdout
    Serve(ServeArgs),

    /// Dispatch a single platform message and print the reply
    Dispatch(DispatchArgs),

    /// List built-in plugins and their channels
    Channels(ChannelsArgs),
}

impl Cli {
    /// Environment config with the command-line overrides applied.
    pub fn config(&self) -> anyhow::Result<BridgeConfig> {
        let mut config = BridgeConfig::load(self.env_file.clone())?;
        if let Some(level) = self.log_level {
            config.log.log_level = level;
        }
        if let Some(dir) = &self.log_dir {
            config.log.log_dir = Some(dir.clone());
        }
        Ok(config)
    }
}

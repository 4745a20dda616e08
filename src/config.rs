use std::{env, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use tracing::{debug, info};

pub const ENV_LOG_LEVEL: &str = "PLUGIN_BRIDGE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PLUGIN_BRIDGE_LOG_DIR";

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
    EnumString, AsRefStr, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogConfig {
    pub log_level: LogLevel,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub log: LogConfig,
}

impl BridgeConfig {
    /// Loads `.env` (or `env_file` when given) into the process environment and
    /// reads the bridge settings from it.
    pub fn load(env_file: Option<PathBuf>) -> anyhow::Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(&path)
                    .map_err(|e| anyhow::anyhow!("could not load {}: {e}", path.display()))?;
                info!("Loaded env file {}", path.display());
            }
            None => {
                if let Ok(path) = dotenvy::dotenv() {
                    debug!("Loaded .env from {}", path.display());
                }
            }
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let log_level = match lookup(ENV_LOG_LEVEL) {
            Some(level) => LogLevel::from_str(level.trim())
                .map_err(|_| anyhow::anyhow!("invalid {ENV_LOG_LEVEL} `{level}`"))?,
            None => LogLevel::default(),
        };
        let log_dir = lookup(ENV_LOG_DIR)
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            log: LogConfig { log_level, log_dir },
        })
    }
}

//! Configuration management for OrderChain

use crate::blockchain::MAX_DIFFICULTY;
use crate::error::{ChainError, Result};
use crate::miner::DEFAULT_CANCEL_CHECK_INTERVAL;
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "orderchain.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Mining attempts between cancellation checks.
    #[serde(default = "default_cancel_check_interval")]
    pub cancel_check_interval: u64,
    /// How often a shared ledger re-mines after losing a race for the tip.
    #[serde(default = "default_max_stale_retries")]
    pub max_stale_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            cancel_check_interval: default_cancel_check_interval(),
            max_stale_retries: default_max_stale_retries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    pub fn tracing_level(&self) -> Result<tracing::Level> {
        self.level
            .parse()
            .map_err(|_| ChainError::Config(format!("unknown logging.level: {}", self.level)))
    }
}

fn default_difficulty() -> u32 {
    1
}

fn default_cancel_check_interval() -> u64 {
    DEFAULT_CANCEL_CHECK_INTERVAL
}

fn default_max_stale_retries() -> u32 {
    8
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Parse a TOML document; missing keys take their defaults.
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    match fs::read_to_string(path.as_ref()) {
        Ok(config_str) => parse_config(&config_str),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
        Err(e) => Err(e.into()),
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.ledger.difficulty > MAX_DIFFICULTY {
        return Err(ChainError::Config(format!(
            "ledger.difficulty must be at most {}, got {}",
            MAX_DIFFICULTY, config.ledger.difficulty
        )));
    }

    if config.ledger.cancel_check_interval == 0 {
        return Err(ChainError::Config(
            "ledger.cancel_check_interval must be greater than zero".to_string(),
        ));
    }

    config.logging.tracing_level()?;
    Ok(())
}

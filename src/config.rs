//! Runtime configuration read from the environment (and `.env` via dotenv).

use crate::processing::DEFAULT_EXPANSION_CAP;
use std::error::Error;

pub const DEFAULT_STORE_FILE: &str = "ip_registry.json";
pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

pub const ENV_STORE_FILE: &str = "IP_REGISTRY_STORE";
pub const ENV_EXPANSION_CAP: &str = "IP_REGISTRY_EXPANSION_CAP";
pub const ENV_LOG_CONFIG: &str = "IP_REGISTRY_LOG_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON file holding records and students.
    pub store_file: String,
    /// Maximum addresses produced when expanding one block for random assignment.
    pub expansion_cap: usize,
    pub log_config: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            store_file: DEFAULT_STORE_FILE.to_string(),
            expansion_cap: DEFAULT_EXPANSION_CAP,
            log_config: DEFAULT_LOG_CONFIG.to_string(),
        }
    }
}

impl Config {
    /// Build from process environment variables.
    pub fn from_env() -> Result<Config, Box<dyn Error>> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing keys use defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(store_file) = lookup(ENV_STORE_FILE) {
            config.store_file = store_file;
        }
        if let Some(cap) = lookup(ENV_EXPANSION_CAP) {
            config.expansion_cap = cap
                .trim()
                .parse()
                .map_err(|e| format!("Invalid {ENV_EXPANSION_CAP}={cap}: {e}"))?;
            if config.expansion_cap == 0 {
                return Err(format!("{ENV_EXPANSION_CAP} must be greater than 0").into());
            }
        }
        if let Some(log_config) = lookup(ENV_LOG_CONFIG) {
            config.log_config = log_config;
        }
        log::debug!("config={config:?}");
        Ok(config)
    }
}

use crate::{
    adapter::{AdapterOptions, DEFAULT_MAX_PARALLEL},
    ENV_AWS_ACCOUNT_ID, ENV_CONFIG_PATH, ENV_DYNAMODB_ENDPOINT_URL, ENV_LOG_LEVEL, ENV_PORT,
};

use std::{env, time::Duration};
use tracing::Level;

mod file;

use file::ConfigFile;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    endpoint_url: Option<String>,
    port: u16,
    account_id: Option<String>,
    log_level: Level,
    cache_duration: Option<Duration>,
    query_timeout: Option<Duration>,
    max_parallel: usize,
    adapters: Option<Vec<String>>,
}

impl Config {
    pub fn new() -> Self {
        let conf_path = env::var(ENV_CONFIG_PATH).ok();
        Self::from_sources(|key| env::var(key).ok(), ConfigFile::new(conf_path))
    }

    fn from_sources<F>(var: F, file: ConfigFile) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = var(ENV_PORT)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let log_level = var(ENV_LOG_LEVEL)
            .and_then(|level| level.parse::<Level>().ok())
            .unwrap_or(Level::INFO);

        Self {
            endpoint_url: var(ENV_DYNAMODB_ENDPOINT_URL).filter(|url| !url.is_empty()),
            port,
            account_id: var(ENV_AWS_ACCOUNT_ID).filter(|id| !id.is_empty()),
            log_level,
            cache_duration: file.cache_duration_secs().map(Duration::from_secs),
            query_timeout: file.query_timeout_secs().map(Duration::from_secs),
            max_parallel: file.max_parallel().unwrap_or(DEFAULT_MAX_PARALLEL),
            adapters: file.adapters(),
        }
    }

    pub fn endpoint_url(&self) -> Option<String> {
        self.endpoint_url.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn account_id(&self) -> Option<String> {
        self.account_id.clone()
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Whether an adapter of `item_type` should be registered. Without an
    /// `adapters` list every adapter is.
    pub fn allows(&self, item_type: &str) -> bool {
        match self.adapters.as_ref() {
            Some(adapters) => adapters.iter().any(|a| a == item_type),
            None => true,
        }
    }

    pub fn adapter_options(&self, account_id: &str, region: &str) -> AdapterOptions {
        AdapterOptions {
            cache_duration: self.cache_duration,
            timeout: self.query_timeout,
            max_parallel: self.max_parallel,
            ..AdapterOptions::new(account_id, region)
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

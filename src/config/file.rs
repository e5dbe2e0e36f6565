use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    cache_duration_secs: Option<u64>,
    query_timeout_secs: Option<u64>,
    max_parallel: Option<usize>,
    adapters: Option<Vec<String>>,
}

impl ConfigFile {
    pub fn new<P: AsRef<Path>>(path: Option<P>) -> Self {
        path.map(read_config).unwrap_or_default()
    }

    pub fn cache_duration_secs(&self) -> Option<u64> {
        self.cache_duration_secs
    }

    pub fn query_timeout_secs(&self) -> Option<u64> {
        self.query_timeout_secs
    }

    pub fn max_parallel(&self) -> Option<usize> {
        self.max_parallel
    }

    pub fn adapters(&self) -> Option<Vec<String>> {
        self.adapters.clone()
    }
}

fn read_config<P: AsRef<Path>>(path: P) -> ConfigFile {
    _read_config(path).unwrap_or_else(|err| {
        warn!("{err}");
        warn!("Skip reading config file.");
        ConfigFile::default()
    })
}

fn _read_config<P: AsRef<Path>>(path: P) -> Result<ConfigFile, String> {
    let content = fs::read_to_string(&path)
        .map_err(|err| format!("Failed to read: {}. {err}", path.as_ref().to_string_lossy()))?;
    serde_yaml::from_str(&content)
        .map_err(|err| format!("Failed to deserialize config file: {err}"))
}

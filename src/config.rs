use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sampler: SamplerConfig,
    pub sink: SinkConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub interval_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig { interval_ms: 500 }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Push every record to the OS as soon as it is appended.
    pub flush_each_record: bool,
    /// fsync the log file when the sink is closed.
    pub sync_on_close: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig {
            flush_each_record: true,
            sync_on_close: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level or `EnvFilter` directive string, e.g. `info` or `perfrig=debug`.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            json: false,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("perfrig").join("config.toml"))
}

pub fn load_config() -> Config {
    match config_path() {
        Some(path) if path.exists() => load_config_from_path(&path),
        _ => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    match std::fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
        Err(_) => Config::default(),
    }
}

use anyhow::Result;
use config::{Config as ConfigLoader, Environment, File};
use serde::Deserialize;
use solu_log::LoggerConfig;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Concurrent simulated callers
    pub workers: usize,
    /// Requests issued by each caller
    pub requests: usize,
    pub log: LoggerConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("SOLU_LAB").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.log.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: 4,
            requests: 3,
            log: LoggerConfig {
                level: "debug".to_string(),
                stdout: true,
                ..LoggerConfig::default()
            },
        }
    }
}

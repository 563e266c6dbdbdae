//! Logger configuration and construction.

use crate::console::ConsoleWriter;
use crate::encoder::{EncoderKeys, JsonEncoder};
use crate::error::{LogError, Result};
use crate::file::FileWriter;
use crate::level::Level;
use crate::logger::{LogCore, Logger};
use crate::rotation::RotationPolicy;
use crate::sampler::{Sampler, SamplingConfig};
use crate::sink::{FanOut, Sink};
use ::config::{Config as ConfigLoader, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Prefix of environment variables overriding the configuration, e.g.
/// `SOLU_LOG__LEVEL=warn` or `SOLU_LOG__FILE__MAX_SIZE=1048576`.
pub const ENV_PREFIX: &str = "SOLU_LOG";

/// File sink configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Directory of the log file; empty means the working directory
    pub dir: PathBuf,
    pub filename: String,
    /// Maximum file size in bytes before rotating, 0 for unbounded
    pub max_size: u64,
    pub rotate: RotationPolicy,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::new(),
            filename: String::new(),
            max_size: 0,
            rotate: RotationPolicy::None,
        }
    }
}

/// Main logger configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Minimum level: debug, info, warn, error or fatal
    pub level: String,
    /// Write records to stdout
    pub stdout: bool,
    pub file: Option<FileConfig>,
    pub sampling: Option<SamplingConfig>,
    /// Panic on `dpanic` records
    pub development: bool,
    /// Record the emitting source location
    pub caller: bool,
    pub keys: EncoderKeys,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            stdout: false,
            file: None,
            sampling: None,
            development: false,
            caller: true,
            keys: EncoderKeys::default(),
        }
    }
}

impl LoggerConfig {
    /// Load from an optional config file (any format the `config` crate
    /// recognizes by extension) overlaid with `SOLU_LOG__*` environment variables.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<()> {
        Level::from_config(&self.level)?;

        if let Some(sampling) = self.sampling {
            if sampling.first == 0 {
                return Err(LogError::InvalidSampling(sampling.first));
            }
        }

        let file_sink = self.file.as_ref().is_some_and(|f| !f.filename.is_empty());
        if !self.stdout && !file_sink {
            return Err(LogError::NoSink);
        }

        Ok(())
    }

    pub fn build(&self) -> Result<Logger> {
        LoggerBuilder::from_config(self.clone()).build()
    }
}

/// Builder for [`Logger`]
#[derive(Default)]
pub struct LoggerBuilder {
    config: LoggerConfig,
    sinks: Vec<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: LoggerConfig) -> Self {
        Self {
            config,
            sinks: Vec::new(),
        }
    }

    pub fn level(mut self, level: impl Into<String>) -> Self {
        self.config.level = level.into();
        self
    }

    pub fn stdout(mut self) -> Self {
        self.config.stdout = true;
        self
    }

    pub fn file(
        mut self,
        dir: impl Into<PathBuf>,
        filename: impl Into<String>,
        max_size: u64,
        rotate: RotationPolicy,
    ) -> Self {
        self.config.file = Some(FileConfig {
            dir: dir.into(),
            filename: filename.into(),
            max_size,
            rotate,
        });
        self
    }

    /// Sample records per message and level within each second.
    pub fn sample(mut self, first: u64, thereafter: u64) -> Self {
        self.config.sampling = Some(SamplingConfig { first, thereafter });
        self
    }

    pub fn development(mut self, development: bool) -> Self {
        self.config.development = development;
        self
    }

    pub fn caller(mut self, caller: bool) -> Self {
        self.config.caller = caller;
        self
    }

    pub fn keys(mut self, keys: EncoderKeys) -> Self {
        self.config.keys = keys;
        self
    }

    /// Add a sink after the configured file and stdout sinks.
    pub fn sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Result<Logger> {
        let config = self.config;
        let level = Level::from_config(&config.level)?;
        if let Some(sampling) = config.sampling {
            if sampling.first == 0 {
                return Err(LogError::InvalidSampling(sampling.first));
            }
        }

        let mut sinks = FanOut::default();
        if let Some(file) = config.file.as_ref().filter(|f| !f.filename.is_empty()) {
            let dir = if file.dir.as_os_str().is_empty() {
                std::env::current_dir()?
            } else {
                file.dir.clone()
            };
            let writer = FileWriter::new(dir, file.filename.clone(), file.max_size, file.rotate)?;
            sinks.push(Arc::new(writer));
        }
        if config.stdout {
            sinks.push(Arc::new(ConsoleWriter::stdout()));
        }
        for sink in self.sinks {
            sinks.push(sink);
        }
        if sinks.is_empty() {
            return Err(LogError::NoSink);
        }

        tracing::debug!(level = %level, sinks = ?sinks, "logger built");

        Ok(Logger::from_core(LogCore {
            sinks,
            level,
            sampler: config.sampling.map(Sampler::new),
            encoder: JsonEncoder::new(config.keys),
            development: config.development,
            caller: config.caller,
            stacktrace_level: Level::DPanic,
        }))
    }
}

use thiserror::Error;

/// Errors surfaced by logger construction and by the sinks themselves.
///
/// Emitting a record never returns an error; sink failures during delivery are
/// only visible through the write counters.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("invalid log level: {0:?}")]
    InvalidLevel(String),

    #[error("no output writer configured")]
    NoSink,

    #[error("invalid sample first: {0}")]
    InvalidSampling(u64),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("global logger already initialized")]
    AlreadyInitialized,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LogError {
    /// Whether this error was caused by the logger configuration rather than by
    /// the environment.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LogError::InvalidLevel(_) | LogError::NoSink | LogError::InvalidSampling(_) | LogError::Config(_)
        )
    }
}

impl From<::config::ConfigError> for LogError {
    fn from(err: ::config::ConfigError) -> Self {
        LogError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LogError>;

use std::io;
use thiserror::Error;

/// Error type for the monitoring engine
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Collector unavailable: {0}")]
    CollectorUnavailable(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Log watcher error: {0}")]
    Watcher(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

/// Result type alias for the monitoring engine
pub type Result<T> = std::result::Result<T, MonitorError>;

impl MonitorError {
    /// Create a collector-unavailable error
    pub fn collector_unavailable<S: Into<String>>(msg: S) -> Self {
        MonitorError::CollectorUnavailable(msg.into())
    }

    /// Create a parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        MonitorError::Parse(msg.into())
    }

    pub fn watcher<S: Into<String>>(msg: S) -> Self {
        MonitorError::Watcher(msg.into())
    }

    pub fn terminal<S: Into<String>>(msg: S) -> Self {
        MonitorError::Terminal(msg.into())
    }
}

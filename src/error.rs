use std::io;
use thiserror::Error;

/// Custom error type for the dashboard
#[derive(Error, Debug)]
pub enum DashError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Result type alias for the dashboard
pub type Result<T> = std::result::Result<T, DashError>;

impl DashError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        DashError::Config(msg.into())
    }

    /// Wrap an I/O error with a short description of what was being opened
    pub fn io_context<S: AsRef<str>>(what: S, err: io::Error) -> Self {
        DashError::Io(io::Error::new(
            err.kind(),
            format!("{}: {}", what.as_ref(), err),
        ))
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Message(String),
    #[error("invalid beam configuration: {0}")]
    InvalidConfiguration(String),
    #[error("beam file sink unavailable at {path:?}: {source}")]
    SinkUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("particle {particle} was still out of range after {attempts} attempts")]
    RetryLimitExceeded { particle: u64, attempts: u64 },
}

impl AppError {
    pub fn invalid(message: impl Into<String>) -> Self {
        AppError::InvalidConfiguration(message.into())
    }

    pub fn sink(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::SinkUnavailable {
            path: path.into(),
            source,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

//! Core error types

use tas_session::SessionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    BackendFailure,
    Timeout,
    Config,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Session(SessionError::NotFound(_)) => ErrorKind::NotFound,
            CoreError::Session(SessionError::Backend(_)) => ErrorKind::BackendFailure,
            CoreError::Session(SessionError::Timeout(_)) => ErrorKind::Timeout,
            CoreError::InvalidState(_) => ErrorKind::InvalidState,
            CoreError::Config(_) | CoreError::Serialization(_) | CoreError::Io(_) => {
                ErrorKind::Config
            }
        }
    }
}

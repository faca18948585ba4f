//! Session error types

use std::time::Duration;

use thiserror::Error;

use crate::backend::BackendError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Credential backend failure: {0}")]
    Backend(#[from] BackendError),

    #[error("Credential backend timed out after {0:?}")]
    Timeout(Duration),
}

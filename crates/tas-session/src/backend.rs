//! Credential backend seam
//!
//! Real deployments would exchange credentials with an identity service here.
//! The provider only depends on getting a [`Credential`] back or an error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Credential material returned by a backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub account_id: String,
    pub account_label: String,
}

/// The stub identity used when no backend is configured
impl Default for Credential {
    fn default() -> Self {
        Self {
            access_token: "static-stub-token".to_string(),
            account_id: "auth-api-sample".to_string(),
            account_label: "Auth API Sample".to_string(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct BackendError {
    pub message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
pub trait CredentialBackend: Send + Sync {
    /// Issue a credential for the requested scopes
    async fn issue(&self, scopes: &[String]) -> Result<Credential, BackendError>;
}

/// Hands out the same stub credential for every request
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialBackend {
    credential: Credential,
}

impl StaticCredentialBackend {
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }
}

#[async_trait]
impl CredentialBackend for StaticCredentialBackend {
    async fn issue(&self, _scopes: &[String]) -> Result<Credential, BackendError> {
        Ok(self.credential.clone())
    }
}

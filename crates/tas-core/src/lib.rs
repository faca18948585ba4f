//! TAS Core
//!
//! Coordination layer on top of the session provider: the cached "current
//! session", status synchronization, configuration and the application context
//! that wires them together.

mod config;
mod context;
mod controller;
mod error;
mod status;

pub use config::Config;
pub use context::AuthContext;
pub use controller::{ControllerState, SessionCacheController};
pub use error::{CoreError, ErrorKind};
pub use status::{StatusIndicator, StatusView};

// Re-export session components
pub use tas_session::{
    Account, BackendError, ChangeEvent, Credential, CredentialBackend, Session, SessionError,
    SessionProvider, StaticCredentialBackend, SubscriptionId,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

//! TAS Session Management
//!
//! Volatile, in-memory authentication sessions for a single-account provider:
//! - `SessionStore` owns the ordered list of sessions
//! - `SessionChangeNotifier` fans change events out to subscribers
//! - `SessionProvider` combines both behind the create/list/remove contract
//!
//! Nothing here survives a process restart.

mod backend;
mod error;
mod event;
mod notifier;
mod provider;
mod session;
mod store;

pub use backend::{BackendError, Credential, CredentialBackend, StaticCredentialBackend};
pub use error::SessionError;
pub use event::ChangeEvent;
pub use notifier::{SessionChangeNotifier, SubscriptionId};
pub use provider::SessionProvider;
pub use session::{Account, Session};
pub use store::{SessionStore, Upsert};

pub type Result<T> = std::result::Result<T, SessionError>;

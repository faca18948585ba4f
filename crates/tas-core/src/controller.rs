//! Session Cache Controller
//!
//! Tracks the "current session" as a cache over the provider:
//! ```text
//! LoggedOut --login--> LoggedIn(id)
//! LoggedIn(id) --logout--> LoggedOut
//! ```
//! The cached id can go stale when its session is removed elsewhere, so every
//! read goes back to the provider. Transitions are serialized per instance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tas_session::{Session, SessionProvider};
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerState {
    LoggedOut,
    LoggedIn(String),
}

impl ControllerState {
    fn of(current: &Option<String>) -> Self {
        match current {
            Some(id) => ControllerState::LoggedIn(id.clone()),
            None => ControllerState::LoggedOut,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, ControllerState::LoggedIn(_))
    }
}

pub struct SessionCacheController {
    provider: Arc<SessionProvider>,
    /// Cached current session id; the lock also serializes transitions
    current: Mutex<Option<String>>,
    /// Completed login/logout transitions
    transitions: AtomicU64,
}

impl SessionCacheController {
    pub fn new(provider: Arc<SessionProvider>) -> Self {
        Self {
            provider,
            current: Mutex::new(None),
            transitions: AtomicU64::new(0),
        }
    }

    pub fn provider(&self) -> &Arc<SessionProvider> {
        &self.provider
    }

    /// Cached state, without re-validation
    pub async fn state(&self) -> ControllerState {
        ControllerState::of(&*self.current.lock().await)
    }

    pub async fn login(&self) -> Result<Session> {
        let mut current = self.current.lock().await;
        self.login_locked(&mut current).await
    }

    pub async fn logout(&self) -> Result<Session> {
        let mut current = self.current.lock().await;
        self.logout_locked(&mut current).await
    }

    /// Log in when no session resolves, log out otherwise.
    ///
    /// A toggle that had to wait behind another transition is treated as
    /// already satisfied, so overlapping toggles flip the state once.
    pub async fn toggle(&self) -> Result<ControllerState> {
        let observed = self.transitions.load(Ordering::SeqCst);
        let mut current = self.current.lock().await;

        if self.transitions.load(Ordering::SeqCst) != observed {
            tracing::debug!("Toggle superseded by a concurrent transition");
            return Ok(ControllerState::of(&current));
        }

        if self.resolve_locked(&mut current).await.is_some() {
            self.logout_locked(&mut current).await?;
        } else {
            self.login_locked(&mut current).await?;
        }

        Ok(ControllerState::of(&current))
    }

    /// The effective current session.
    ///
    /// With nothing cached, the first existing session is adopted. A cached id
    /// whose session no longer exists is dropped and nothing is returned.
    pub async fn resolve_current(&self) -> Option<Session> {
        let mut current = self.current.lock().await;
        self.resolve_locked(&mut current).await
    }

    async fn resolve_locked(&self, current: &mut Option<String>) -> Option<Session> {
        match current.as_deref() {
            None => {
                let session = self.provider.all_sessions().await.into_iter().next()?;
                tracing::debug!(session_id = %session.id, "Adopted existing session");
                *current = Some(session.id.clone());
                Some(session)
            }
            Some(id) => {
                let session = self.provider.find_session(id).await;
                if session.is_none() {
                    tracing::info!(session_id = %id, "Cached session is gone, logging out");
                    *current = None;
                }
                session
            }
        }
    }

    async fn login_locked(&self, current: &mut Option<String>) -> Result<Session> {
        if let Some(id) = current.as_deref() {
            if self.provider.find_session(id).await.is_some() {
                return Err(CoreError::InvalidState("already logged in"));
            }
            tracing::info!(session_id = %id, "Cached session is gone, logging out");
            *current = None;
        }

        let session = self.provider.create_session::<&str>(&[]).await?;
        *current = Some(session.id.clone());
        self.transitions.fetch_add(1, Ordering::SeqCst);

        tracing::info!(session_id = %session.id, account = %session.account.label, "Logged in");

        Ok(session)
    }

    async fn logout_locked(&self, current: &mut Option<String>) -> Result<Session> {
        let Some(id) = current.clone() else {
            return Err(CoreError::InvalidState("not logged in"));
        };

        let session = self.provider.remove_session(&id).await?;
        *current = None;
        self.transitions.fetch_add(1, Ordering::SeqCst);

        tracing::info!(session_id = %id, "Logged out");

        Ok(session)
    }
}

impl std::fmt::Debug for SessionCacheController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCacheController")
            .field("provider", &self.provider)
            .field("transitions", &self.transitions.load(Ordering::Relaxed))
            .finish()
    }
}

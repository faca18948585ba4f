//! Session Provider
//!
//! Combines the store and the notifier behind the provider contract:
//! - every mutation publishes exactly one [`ChangeEvent`]
//! - mutations are applied in the order they are invoked
//! - failures are returned to the caller, never swallowed

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::backend::CredentialBackend;
use crate::error::SessionError;
use crate::event::ChangeEvent;
use crate::notifier::{SessionChangeNotifier, SubscriptionId};
use crate::session::Session;
use crate::store::{SessionStore, Upsert};
use crate::Result;

type IdGenerator = Box<dyn Fn() -> String + Send + Sync>;

pub struct SessionProvider {
    store: RwLock<SessionStore>,
    notifier: SessionChangeNotifier,
    backend: Arc<dyn CredentialBackend>,
    /// Held for the whole of a mutation, including the backend round-trip.
    /// Tokio's mutex is FIFO, which keeps mutations in invocation order.
    mutations: Mutex<()>,
    backend_timeout: Duration,
    id_generator: IdGenerator,
}

impl SessionProvider {
    pub fn new(backend: Arc<dyn CredentialBackend>, backend_timeout: Duration) -> Self {
        Self {
            store: RwLock::new(SessionStore::new()),
            notifier: SessionChangeNotifier::new(),
            backend,
            mutations: Mutex::new(()),
            backend_timeout,
            id_generator: Box::new(|| Uuid::new_v4().to_string()),
        }
    }

    /// Replace the session id source
    pub fn with_id_generator<F>(mut self, generator: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        self.id_generator = Box::new(generator);
        self
    }

    /// Sessions granted every requested scope, in insertion order.
    /// An empty request returns everything.
    pub async fn get_sessions<S>(&self, scopes: &[S]) -> Vec<Session>
    where
        S: AsRef<str> + Sync,
    {
        self.store
            .read()
            .list()
            .iter()
            .filter(|session| session.has_scopes(scopes))
            .cloned()
            .collect()
    }

    pub async fn all_sessions(&self) -> Vec<Session> {
        self.snapshot()
    }

    pub async fn find_session(&self, id: &str) -> Option<Session> {
        self.store.read().find_by_id(id).cloned()
    }

    /// Synchronous view of the store, usable from change handlers
    pub fn snapshot(&self) -> Vec<Session> {
        self.store.read().list().to_vec()
    }

    pub async fn create_session<S>(&self, scopes: &[S]) -> Result<Session>
    where
        S: AsRef<str> + Sync,
    {
        let _lane = self.mutations.lock().await;

        let requested: Vec<String> = scopes.iter().map(|s| s.as_ref().to_string()).collect();
        let credential = match tokio::time::timeout(
            self.backend_timeout,
            self.backend.issue(&requested),
        )
        .await
        {
            Ok(Ok(credential)) => credential,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Credential backend rejected session request");
                return Err(e.into());
            }
            Err(_) => {
                tracing::warn!(timeout = ?self.backend_timeout, "Credential backend timed out");
                return Err(SessionError::Timeout(self.backend_timeout));
            }
        };

        let session = Session::new((self.id_generator)(), credential, requested);
        let outcome = self.store.write().upsert(session.clone());

        let event = match outcome {
            Upsert::Inserted => ChangeEvent::added(session.clone()),
            Upsert::Replaced => ChangeEvent::changed(session.clone()),
        };
        self.notifier.publish(&event);

        tracing::info!(
            session_id = %session.id,
            account = %session.account.label,
            replaced = outcome == Upsert::Replaced,
            "Created session"
        );

        Ok(session)
    }

    pub async fn remove_session(&self, id: &str) -> Result<Session> {
        let _lane = self.mutations.lock().await;

        let removed = self.store.write().remove(id);
        let Some(session) = removed else {
            tracing::warn!(session_id = %id, "Could not remove unknown session");
            return Err(SessionError::NotFound(id.to_string()));
        };

        self.notifier.publish(&ChangeEvent::removed(session.clone()));

        tracing::info!(session_id = %id, "Removed session");

        Ok(session)
    }

    /// Subscribe to the provider's change stream
    pub fn on_did_change_sessions<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        self.notifier.subscribe(handler)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.notifier.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.notifier.subscriber_count()
    }

    /// Drop every change subscription
    pub fn clear_subscribers(&self) {
        self.notifier.clear();
    }
}

impl std::fmt::Debug for SessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionProvider")
            .field("sessions", &self.store.read().len())
            .field("notifier", &self.notifier)
            .field("backend_timeout", &self.backend_timeout)
            .finish()
    }
}

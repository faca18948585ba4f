//! Application context
//!
//! Owns the provider, the current-session controller and the status indicator
//! for one process. Built once, `init` wires change notifications to status
//! refreshes, `shutdown` tears the wiring down again.

use std::sync::Arc;

use parking_lot::Mutex;
use tas_session::{
    CredentialBackend, Session, SessionProvider, StaticCredentialBackend, SubscriptionId,
};
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::controller::{ControllerState, SessionCacheController};
use crate::error::CoreError;
use crate::status::{StatusIndicator, StatusView};
use crate::Result;

pub struct AuthContext {
    config: Config,
    provider: Arc<SessionProvider>,
    controller: Arc<SessionCacheController>,
    status: Arc<StatusIndicator>,
    /// Provider subscription feeding the refresh task
    subscription: Mutex<Option<SubscriptionId>>,
    refresh_task: Mutex<Option<JoinHandle<()>>>,
}

impl AuthContext {
    /// Build a context backed by the configured static credential
    pub fn new(config: Config) -> Result<Self> {
        let backend = StaticCredentialBackend::new(config.credential.clone());
        Self::with_backend(config, Arc::new(backend))
    }

    pub fn with_backend(config: Config, backend: Arc<dyn CredentialBackend>) -> Result<Self> {
        config.validate()?;

        let provider = Arc::new(SessionProvider::new(backend, config.backend_timeout()));
        let controller = Arc::new(SessionCacheController::new(Arc::clone(&provider)));
        let status = Arc::new(StatusIndicator::new(config.provider_label.clone()));

        Ok(Self {
            config,
            provider,
            controller,
            status,
            subscription: Mutex::new(None),
            refresh_task: Mutex::new(None),
        })
    }

    /// Start following provider changes. Must run inside a Tokio runtime.
    pub async fn init(&self) -> Result<StatusView> {
        if self.subscription.lock().is_some() {
            return Err(CoreError::InvalidState("context already initialized"));
        }

        let wake = Arc::new(Notify::new());

        let task = tokio::spawn({
            let wake = Arc::clone(&wake);
            let controller = Arc::clone(&self.controller);
            let status = Arc::clone(&self.status);
            async move {
                loop {
                    wake.notified().await;
                    status.refresh(&controller).await;
                }
            }
        });
        *self.refresh_task.lock() = Some(task);

        let id = self
            .provider
            .on_did_change_sessions(move |_| wake.notify_one());
        *self.subscription.lock() = Some(id);

        let mut view = self.status.refresh(&self.controller).await;
        if self.config.auto_login && view == StatusView::LoggedOut {
            tracing::info!("No session found, logging in");
            self.controller.login().await?;
            view = self.status.refresh(&self.controller).await;
        }

        tracing::info!(
            provider = %self.config.provider_id,
            status = %view.text(&self.config.provider_label),
            "Authentication provider started"
        );

        Ok(view)
    }

    /// Stop following provider changes and drop every subscriber
    pub fn shutdown(&self) {
        if let Some(id) = self.subscription.lock().take() {
            self.provider.unsubscribe(id);
        }
        if let Some(task) = self.refresh_task.lock().take() {
            task.abort();
        }
        self.provider.clear_subscribers();
    }

    pub async fn login(&self) -> Result<Session> {
        let result = self.controller.login().await;
        self.status.refresh(&self.controller).await;
        result
    }

    pub async fn logout(&self) -> Result<Session> {
        let result = self.controller.logout().await;
        self.status.refresh(&self.controller).await;
        result
    }

    pub async fn toggle(&self) -> Result<ControllerState> {
        let result = self.controller.toggle().await;
        self.status.refresh(&self.controller).await;
        result
    }

    pub async fn refresh_status(&self) -> StatusView {
        self.status.refresh(&self.controller).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn provider(&self) -> &Arc<SessionProvider> {
        &self.provider
    }

    pub fn controller(&self) -> &Arc<SessionCacheController> {
        &self.controller
    }

    pub fn status(&self) -> &Arc<StatusIndicator> {
        &self.status
    }
}

impl Drop for AuthContext {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.get_mut().take() {
            task.abort();
        }
    }
}

//! Status indicator model
//!
//! Two renderable states only: logged out (click to log in) and logged in as
//! an account label.

use tokio::sync::{watch, Mutex};

use crate::controller::SessionCacheController;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusView {
    LoggedOut,
    LoggedIn { label: String },
}

impl StatusView {
    pub fn text(&self, provider_label: &str) -> String {
        match self {
            StatusView::LoggedOut => format!("{provider_label}: Log in"),
            StatusView::LoggedIn { label } => format!("{provider_label}: {label}"),
        }
    }
}

pub struct StatusIndicator {
    provider_label: String,
    tx: watch::Sender<StatusView>,
    /// Keeps resolve-then-publish atomic across concurrent refreshes
    refreshing: Mutex<()>,
}

impl StatusIndicator {
    pub fn new(provider_label: impl Into<String>) -> Self {
        let (tx, _) = watch::channel(StatusView::LoggedOut);
        Self {
            provider_label: provider_label.into(),
            tx,
            refreshing: Mutex::new(()),
        }
    }

    pub fn text(&self) -> String {
        self.tx.borrow().text(&self.provider_label)
    }

    /// Watch status changes
    pub fn subscribe(&self) -> watch::Receiver<StatusView> {
        self.tx.subscribe()
    }

    /// Re-resolve the current session and publish the resulting view.
    /// This is also what repairs a stale current-session cache.
    pub async fn refresh(&self, controller: &SessionCacheController) -> StatusView {
        let _refreshing = self.refreshing.lock().await;

        let view = match controller.resolve_current().await {
            Some(session) => StatusView::LoggedIn {
                label: session.account.label,
            },
            None => StatusView::LoggedOut,
        };

        let changed = self.tx.send_if_modified(|shown| {
            if *shown == view {
                false
            } else {
                *shown = view.clone();
                true
            }
        });
        if changed {
            tracing::debug!(status = %view.text(&self.provider_label), "Status updated");
        }

        view
    }
}

impl std::fmt::Debug for StatusIndicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusIndicator")
            .field("provider_label", &self.provider_label)
            .field("current", &*self.tx.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use tas_session::{
        BackendError, Credential, CredentialBackend, SessionProvider, StaticCredentialBackend,
    };

    struct SlowBackend;

    #[async_trait]
    impl CredentialBackend for SlowBackend {
        async fn issue(&self, _scopes: &[String]) -> std::result::Result<Credential, BackendError> {
            tokio::time::sleep(Duration::from_millis(30)).await;
            Ok(Credential::default())
        }
    }

    fn controller() -> SessionCacheController {
        let provider = SessionProvider::new(
            Arc::new(StaticCredentialBackend::default()),
            Duration::from_secs(5),
        );
        SessionCacheController::new(Arc::new(provider))
    }

    #[test]
    fn test_status_text() {
        assert_eq!(StatusView::LoggedOut.text("TAS"), "TAS: Log in");
        let view = StatusView::LoggedIn {
            label: "Auth API Sample".to_string(),
        };
        assert_eq!(view.text("TAS"), "TAS: Auth API Sample");
    }

    #[tokio::test]
    async fn test_refresh_follows_controller() {
        let controller = controller();
        let status = StatusIndicator::new("TAS");
        let mut rx = status.subscribe();

        assert_eq!(status.refresh(&controller).await, StatusView::LoggedOut);
        assert!(!rx.has_changed().unwrap());

        controller.login().await.unwrap();
        status.refresh(&controller).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            *rx.borrow_and_update(),
            StatusView::LoggedIn {
                label: "Auth API Sample".to_string()
            }
        );
        assert_eq!(status.text(), "TAS: Auth API Sample");
    }

    #[tokio::test]
    async fn test_overlapping_refreshes_publish_latest_view() {
        let provider = SessionProvider::new(Arc::new(SlowBackend), Duration::from_secs(5));
        let controller = SessionCacheController::new(Arc::new(provider));
        let status = StatusIndicator::new("TAS");
        let rx = status.subscribe();

        // The login holds the controller while the plain refresh queues behind it
        let (_, queued) = tokio::join!(
            async {
                controller.login().await.unwrap();
                status.refresh(&controller).await
            },
            status.refresh(&controller),
        );

        let expected = StatusView::LoggedIn {
            label: "Auth API Sample".to_string(),
        };
        assert_eq!(queued, expected);
        assert_eq!(*rx.borrow(), expected);
        assert_eq!(status.text(), "TAS: Auth API Sample");
    }

    #[tokio::test]
    async fn test_refresh_repairs_stale_cache() {
        let controller = controller();
        let status = StatusIndicator::new("TAS");

        let session = controller.login().await.unwrap();
        status.refresh(&controller).await;
        controller.provider().remove_session(&session.id).await.unwrap();

        assert_eq!(status.refresh(&controller).await, StatusView::LoggedOut);
        assert_eq!(status.text(), "TAS: Log in");
        assert!(!controller.state().await.is_logged_in());
    }
}

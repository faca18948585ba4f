//! Session change notifier
//!
//! Synchronous, in-process fan-out. Subscribers registered after an event miss
//! it; nothing is buffered or replayed.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::event::ChangeEvent;

type Handler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Handle returned by [`SessionChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct SessionChangeNotifier {
    /// Handlers in subscription order
    handlers: RwLock<Vec<(SubscriptionId, Handler)>>,
    next_id: AtomicU64,
}

impl SessionChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.write().push((id, Arc::new(handler)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.write();
        let before = handlers.len();
        handlers.retain(|(sub, _)| *sub != id);
        handlers.len() != before
    }

    /// Deliver `event` to every subscriber in order and return how many handled
    /// it without panicking. A panicking handler is logged and skipped.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        // Snapshot so handlers can (un)subscribe while being called
        let handlers: Vec<(SubscriptionId, Handler)> = self.handlers.read().clone();

        let mut delivered = 0;
        for (id, handler) in handlers {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(event))) {
                Ok(()) => delivered += 1,
                Err(payload) => {
                    tracing::error!(
                        subscription = id.0,
                        reason = %panic_message(payload.as_ref()),
                        "Session change handler panicked"
                    );
                }
            }
        }

        tracing::trace!(
            added = event.added.len(),
            changed = event.changed.len(),
            removed = event.removed.len(),
            delivered,
            "Published session change"
        );

        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Drop every subscription
    pub fn clear(&self) {
        self.handlers.write().clear();
    }
}

impl std::fmt::Debug for SessionChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionChangeNotifier")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

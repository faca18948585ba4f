//! Session change notifications

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Sessions touched by one mutating operation.
///
/// Exactly one event is published per mutation, even when some buckets are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub added: Vec<Session>,
    pub changed: Vec<Session>,
    pub removed: Vec<Session>,
}

impl ChangeEvent {
    pub fn added(session: Session) -> Self {
        Self {
            added: vec![session],
            ..Self::default()
        }
    }

    pub fn changed(session: Session) -> Self {
        Self {
            changed: vec![session],
            ..Self::default()
        }
    }

    pub fn removed(session: Session) -> Self {
        Self {
            removed: vec![session],
            ..Self::default()
        }
    }
}

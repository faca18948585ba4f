//! Session data structure

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::backend::Credential;

/// Display identity attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier, stable for the session's lifetime
    pub id: String,
    /// Opaque credential, only ever replaced wholesale
    pub access_token: String,
    pub account: Account,
    /// Granted permissions
    pub scopes: BTreeSet<String>,
    /// When the session was issued
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new<I, S>(id: String, credential: Credential, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id,
            access_token: credential.access_token,
            account: Account {
                id: credential.account_id,
                label: credential.account_label,
            },
            scopes: scopes.into_iter().map(Into::into).collect(),
            created_at: Utc::now(),
        }
    }

    /// True when every requested scope is granted to this session.
    /// An empty request is satisfied by any session.
    pub fn has_scopes<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        requested
            .iter()
            .all(|scope| self.scopes.contains(scope.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credential() -> Credential {
        Credential {
            access_token: "token".to_string(),
            account_id: "acct".to_string(),
            account_label: "Account".to_string(),
        }
    }

    #[test]
    fn test_new_session() {
        let session = Session::new("s1".to_string(), credential(), ["user", "admin", "user"]);
        assert_eq!(session.id, "s1");
        assert_eq!(session.access_token, "token");
        assert_eq!(session.account.label, "Account");
        assert_eq!(session.scopes.len(), 2);
    }

    #[test]
    fn test_has_scopes() {
        let session = Session::new("s1".to_string(), credential(), ["admin", "user"]);

        assert!(session.has_scopes(&["admin"]));
        assert!(session.has_scopes(&["user", "admin"]));
        assert!(!session.has_scopes(&["admin", "billing"]));
        assert!(session.has_scopes::<&str>(&[]));
    }
}

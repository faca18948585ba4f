//! Session Store
//!
//! Authoritative, insertion-ordered list of sessions. Reporting absence is left
//! to the caller.

use crate::session::Session;

/// Outcome of [`SessionStore::upsert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Inserted,
    Replaced,
}

#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All sessions in insertion order
    pub fn list(&self) -> &[Session] {
        &self.sessions
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Replace the session with the same id in place, or append it.
    pub fn upsert(&mut self, session: Session) -> Upsert {
        match self.sessions.iter().position(|s| s.id == session.id) {
            Some(index) => {
                self.sessions[index] = session;
                Upsert::Replaced
            }
            None => {
                self.sessions.push(session);
                Upsert::Inserted
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<Session> {
        let index = self.sessions.iter().position(|s| s.id == id)?;
        Some(self.sessions.remove(index))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Credential;

    fn session(id: &str, token: &str) -> Session {
        let credential = Credential {
            access_token: token.to_string(),
            account_id: "acct".to_string(),
            account_label: "Account".to_string(),
        };
        Session::new(id.to_string(), credential, ["user"])
    }

    #[test]
    fn test_upsert_preserves_order() {
        let mut store = SessionStore::new();

        assert_eq!(store.upsert(session("a", "t1")), Upsert::Inserted);
        assert_eq!(store.upsert(session("b", "t1")), Upsert::Inserted);
        assert_eq!(store.upsert(session("c", "t1")), Upsert::Inserted);

        // Replacing "b" keeps it in the middle
        assert_eq!(store.upsert(session("b", "t2")), Upsert::Replaced);

        let ids: Vec<&str> = store.list().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(store.find_by_id("b").unwrap().access_token, "t2");
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remove() {
        let mut store = SessionStore::new();
        store.upsert(session("a", "t"));
        store.upsert(session("b", "t"));

        let removed = store.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(store.find_by_id("a").is_none());

        assert!(store.remove("missing").is_none());
        assert_eq!(store.len(), 1);

        store.remove("b");
        assert!(store.is_empty());
    }
}

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ports::SessionStore, DomainError, Session};

fn poisoned<T>(e: std::sync::PoisonError<T>) -> DomainError {
    DomainError::internal(e.to_string())
}

/// Process-local session store, used by tests and single-node runs.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().map_err(poisoned)?;
        Ok(sessions.get(&id).cloned())
    }

    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        self.sessions
            .write()
            .map_err(poisoned)?
            .insert(session.id, session.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        Ok(sessions.remove(&id).is_some())
    }
}

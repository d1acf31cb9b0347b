use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Session};

/// Best-effort chat history storage. Concurrent runs on one session may
/// overwrite each other; the last save wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, DomainError>;
    async fn save(&self, session: &Session) -> Result<(), DomainError>;
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
}

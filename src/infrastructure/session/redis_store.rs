use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use uuid::Uuid;

use crate::domain::{ports::SessionStore, DomainError, Session};
use crate::infrastructure::queue::{connection, keys, RedisPool};

fn external(e: impl std::fmt::Display) -> DomainError {
    DomainError::external(format!("session store: {e}"))
}

/// Session history as JSON under `session:<id>`, refreshed on every save.
#[derive(Clone)]
pub struct RedisSessionStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisSessionStore {
    pub fn new(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, DomainError> {
        let mut conn = connection(&self.pool).await.map_err(external)?;
        let json: Option<String> = conn.get(keys::session(&id)).await.map_err(external)?;

        json.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| DomainError::internal(format!("corrupt session {id}: {e}")))
        })
        .transpose()
    }

    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let json = serde_json::to_string(session)
            .map_err(|e| DomainError::internal(format!("failed to encode session: {e}")))?;

        let mut conn = connection(&self.pool).await.map_err(external)?;
        conn.set_ex::<_, _, ()>(keys::session(&session.id), json, self.ttl_seconds)
            .await
            .map_err(external)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = connection(&self.pool).await.map_err(external)?;
        let removed: i64 = conn.del(keys::session(&id)).await.map_err(external)?;
        Ok(removed > 0)
    }
}

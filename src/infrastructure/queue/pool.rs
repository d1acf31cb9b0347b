use deadpool_redis::{redis::AsyncCommands, Config, Connection, Pool, Runtime};

use super::jobs::{keys, JobResult};

pub type RedisPool = Pool;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Redis pool error: {0}")]
    Pool(String),
    #[error("Redis error: {0}")]
    Redis(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QueueError>;

pub fn create_pool(redis_url: &str) -> Result<RedisPool> {
    let cfg = Config::from_url(redis_url);
    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| QueueError::Pool(e.to_string()))
}

pub async fn connection(pool: &RedisPool) -> Result<Connection> {
    pool.get().await.map_err(|e| QueueError::Pool(e.to_string()))
}

/// Writes a job status record that expires after `ttl_seconds`.
pub async fn store_job_status(
    conn: &mut Connection,
    status: &JobResult,
    ttl_seconds: u64,
) -> Result<()> {
    let json = serde_json::to_string(status)?;
    conn.set_ex::<_, _, ()>(keys::job_status(&status.job_id), &json, ttl_seconds)
        .await
        .map_err(|e| QueueError::Redis(e.to_string()))
}

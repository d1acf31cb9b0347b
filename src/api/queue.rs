use deadpool_redis::redis::AsyncCommands;
use uuid::Uuid;

use crate::infrastructure::queue::{connection, store_job_status, Result};
use crate::infrastructure::{
    keys, queues, IngestKnowledgeJob, JobResult, ProcessChatJob, QueueError, RedisPool,
};

/// Pushes jobs onto the Redis lists the worker consumes and records their
/// initial `pending` status.
#[derive(Clone)]
pub struct JobProducer {
    pool: RedisPool,
    result_ttl_seconds: u64,
}

impl JobProducer {
    pub fn new(pool: RedisPool, result_ttl_seconds: u64) -> Self {
        Self {
            pool,
            result_ttl_seconds,
        }
    }

    async fn push_job(&self, queue: &str, job_id: Uuid, payload: &str) -> Result<Uuid> {
        let mut conn = connection(&self.pool).await?;

        store_job_status(&mut conn, &JobResult::pending(job_id), self.result_ttl_seconds).await?;
        conn.lpush::<_, _, ()>(queue, payload)
            .await
            .map_err(|e| QueueError::Redis(e.to_string()))?;

        tracing::info!(job_id = %job_id, queue, "job queued");
        Ok(job_id)
    }

    pub async fn push_chat_job(&self, job: &ProcessChatJob) -> Result<Uuid> {
        self.push_job(queues::CHAT_QUEUE, job.job_id, &serde_json::to_string(job)?)
            .await
    }

    pub async fn push_ingest_job(&self, job: &IngestKnowledgeJob) -> Result<Uuid> {
        self.push_job(
            queues::INGEST_QUEUE,
            job.job_id,
            &serde_json::to_string(job)?,
        )
        .await
    }

    pub async fn get_job_status(&self, job_id: &Uuid) -> Result<Option<JobResult>> {
        let mut conn = connection(&self.pool).await?;
        let result: Option<String> = conn
            .get(keys::job_status(job_id))
            .await
            .map_err(|e| QueueError::Redis(e.to_string()))?;

        result
            .map(|json| serde_json::from_str(&json).map_err(Into::into))
            .transpose()
    }
}

mod jobs;
mod pool;

pub use jobs::{keys, queues, IngestKnowledgeJob, JobResult, ProcessChatJob, QueueJobStatus};
pub use pool::{connection, create_pool, store_job_status, QueueError, RedisPool, Result};

use deadpool_redis::redis::AsyncCommands;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{info, Instrument};

use helpdesk_agent::application::{ChatService, KnowledgeService};
use helpdesk_agent::infrastructure::queue::{connection, store_job_status};
use helpdesk_agent::infrastructure::{
    create_pool, knowledge, load_quotation_engine, queues, telemetry, AppConfig, HelpdeskAgent,
    IngestKnowledgeJob, JobResult, ProcessChatJob, QueueError, RedisPool, RedisSessionStore,
};

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorkerError>;

pub struct WorkerState {
    pub redis_pool: RedisPool,
    pub chat: ChatService,
    pub knowledge: Arc<KnowledgeService>,
    pub result_ttl_seconds: u64,
}

impl WorkerState {
    pub async fn new(redis_pool: RedisPool, config: &AppConfig) -> anyhow::Result<Self> {
        let settings = &config.config;
        let quotation = Arc::new(load_quotation_engine(settings.pricing_file.as_deref())?);
        let knowledge = Arc::new(knowledge::connect(settings).await?);
        info!("Qdrant connected");

        let agent = Arc::new(HelpdeskAgent::new(quotation, knowledge.clone(), config));
        let sessions = Arc::new(RedisSessionStore::new(
            redis_pool.clone(),
            settings.history.ttl_seconds,
        ));

        Ok(Self {
            redis_pool,
            chat: ChatService::new(agent, sessions, settings.history.runs),
            knowledge,
            result_ttl_seconds: settings.worker.result_ttl_seconds,
        })
    }

    async fn set_status(&self, status: &JobResult) -> Result<()> {
        let mut conn = connection(&self.redis_pool).await?;
        store_job_status(&mut conn, status, self.result_ttl_seconds).await?;
        Ok(())
    }
}

pub struct JobConsumer {
    state: Arc<WorkerState>,
    concurrency: usize,
}

impl JobConsumer {
    pub fn new(state: WorkerState, concurrency: usize) -> Self {
        Self {
            state: Arc::new(state),
            concurrency: concurrency.max(1),
        }
    }

    pub async fn start(&self) -> anyhow::Result<()> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        info!(concurrency = self.concurrency, "consumer started");

        loop {
            let permit = semaphore.clone().acquire_owned().await?;

            let job = match next_job(&self.state).await {
                Ok(Some(job)) => job,
                Ok(None) => continue,
                Err(e) => {
                    tracing::error!(error = %e, "failed to pop job");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            let state = self.state.clone();
            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = process_job(&state, job).await {
                    tracing::error!(error = %e, "job failed");
                }
            });
        }
    }
}

enum Job {
    Chat(ProcessChatJob),
    Ingest(IngestKnowledgeJob),
}

async fn next_job(state: &WorkerState) -> Result<Option<Job>> {
    let mut conn = connection(&state.redis_pool).await?;

    let popped: Option<(String, String)> = conn
        .brpop(&[queues::CHAT_QUEUE, queues::INGEST_QUEUE], 1.0)
        .await
        .map_err(|e| QueueError::Redis(e.to_string()))?;

    let Some((queue, payload)) = popped else {
        return Ok(None);
    };

    let job = match queue.as_str() {
        queues::CHAT_QUEUE => Job::Chat(serde_json::from_str(&payload)?),
        queues::INGEST_QUEUE => Job::Ingest(serde_json::from_str(&payload)?),
        _ => {
            tracing::warn!(queue, "unknown queue");
            return Ok(None);
        }
    };
    Ok(Some(job))
}

async fn process_job(state: &WorkerState, job: Job) -> Result<()> {
    match job {
        Job::Chat(job) => {
            let span = tracing::info_span!("chat_job", job_id = %job.job_id);
            process_chat_job(state, job).instrument(span).await
        }
        Job::Ingest(job) => {
            let span = tracing::info_span!("ingest_job", job_id = %job.job_id);
            process_ingest_job(state, job).instrument(span).await
        }
    }
}

async fn process_chat_job(state: &WorkerState, job: ProcessChatJob) -> Result<()> {
    info!(session_id = %job.session_id, agent = job.agent_id.id(), "processing chat");
    state.set_status(&JobResult::processing(job.job_id)).await?;

    let reply = state
        .chat
        .respond(
            job.session_id,
            job.user_id.as_deref(),
            job.agent_id,
            &job.message,
        )
        .await;

    let status = match reply {
        Ok(reply) => JobResult::completed(job.job_id, serde_json::to_value(&reply)?),
        Err(e) => {
            tracing::warn!(error = %e, "chat run failed");
            JobResult::failed(job.job_id, e.to_string())
        }
    };
    state.set_status(&status).await?;

    info!(status = status.status.as_str(), "chat finished");
    Ok(())
}

async fn process_ingest_job(state: &WorkerState, job: IngestKnowledgeJob) -> Result<()> {
    info!(document_id = %job.document_id, document = %job.document_name, "processing ingest");
    state.set_status(&JobResult::processing(job.job_id)).await?;

    let ingested = state
        .knowledge
        .ingest(job.document_id, &job.document_name, &job.content)
        .await;

    let status = match ingested {
        Ok(doc) => JobResult::completed(
            job.job_id,
            json!({
                "document_id": doc.document_id,
                "document_name": doc.document_name,
                "chunks_count": doc.chunks_count,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "ingestion failed");
            JobResult::failed(job.job_id, e.to_string())
        }
    };
    state.set_status(&status).await?;

    info!(status = status.status.as_str(), "ingest finished");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    telemetry::init(&config.config.logging);

    let redis_pool = create_pool(&config.config.redis_url)?;
    info!("Redis connected");

    let concurrency = config.config.worker.concurrency;
    let state = WorkerState::new(redis_pool, &config).await?;
    let consumer = JobConsumer::new(state, concurrency);

    info!(concurrency, "worker started");
    consumer.start().await
}

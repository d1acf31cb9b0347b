pub mod agent;
pub mod config;
pub mod embedding;
pub mod knowledge;
pub mod pricing;
pub mod queue;
pub mod session;
pub mod telemetry;
pub mod tools;

pub use agent::HelpdeskAgent;
pub use config::{AppConfig, Config, ConfigError, PromptsConfig};
pub use embedding::OpenAiEmbedding;
pub use knowledge::{InMemoryKnowledgeIndex, QdrantKnowledgeIndex};
pub use pricing::{load_quotation_engine, PricingLoadError};
pub use queue::{
    create_pool, keys, queues, IngestKnowledgeJob, JobResult, ProcessChatJob, QueueError,
    QueueJobStatus, RedisPool,
};
pub use session::{InMemorySessionStore, RedisSessionStore};
pub use tools::{KnowledgeBaseTool, PriceLookupTool};

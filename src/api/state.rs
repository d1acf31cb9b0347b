use std::sync::Arc;

use crate::api::queue::JobProducer;
use crate::application::{KnowledgeService, QuotationEngine};
use crate::domain::ports::SessionStore;
use crate::infrastructure::{AppConfig, RedisPool, RedisSessionStore};

#[derive(Clone)]
pub struct AppState {
    pub redis_pool: RedisPool,
    pub job_producer: JobProducer,
    pub quotation: Arc<QuotationEngine>,
    pub sessions: Arc<dyn SessionStore>,
    pub knowledge: Option<Arc<KnowledgeService>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(redis_pool: RedisPool, quotation: QuotationEngine, config: AppConfig) -> Self {
        let config = Arc::new(config);
        let job_producer =
            JobProducer::new(redis_pool.clone(), config.config.worker.result_ttl_seconds);
        let sessions = Arc::new(RedisSessionStore::new(
            redis_pool.clone(),
            config.config.history.ttl_seconds,
        ));

        Self {
            redis_pool,
            job_producer,
            quotation: Arc::new(quotation),
            sessions,
            knowledge: None,
            config,
        }
    }

    pub fn with_knowledge_service(mut self, service: Arc<KnowledgeService>) -> Self {
        self.knowledge = Some(service);
        self
    }

    pub fn with_session_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.sessions = store;
        self
    }
}

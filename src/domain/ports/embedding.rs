use async_trait::async_trait;

use crate::domain::{errors::DomainError, Embedding};

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError>;

    /// Embeds several texts in one provider call, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError>;
}

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, Embedding, KnowledgeChunk, KnowledgeHit};

/// Similarity index over embedded knowledge chunks.
#[async_trait]
pub trait KnowledgeIndex: Send + Sync {
    async fn upsert(&self, chunks: &[(KnowledgeChunk, Embedding)]) -> Result<(), DomainError>;

    async fn search(&self, query: &Embedding, top_k: usize)
        -> Result<Vec<KnowledgeHit>, DomainError>;

    async fn delete_document(&self, document_id: Uuid) -> Result<(), DomainError>;

    async fn ping(&self) -> Result<(), DomainError>;
}

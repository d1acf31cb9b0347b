use async_trait::async_trait;
use std::sync::RwLock;
use uuid::Uuid;

use crate::domain::{ports::KnowledgeIndex, DomainError, Embedding, KnowledgeChunk, KnowledgeHit};

/// Brute-force cosine index for tests and local runs without Qdrant.
pub struct InMemoryKnowledgeIndex {
    entries: RwLock<Vec<(KnowledgeChunk, Embedding)>>,
}

impl InMemoryKnowledgeIndex {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryKnowledgeIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KnowledgeIndex for InMemoryKnowledgeIndex {
    async fn upsert(&self, chunks: &[(KnowledgeChunk, Embedding)]) -> Result<(), DomainError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        for (chunk, embedding) in chunks {
            entries.retain(|(c, _)| c.id != chunk.id);
            entries.push((chunk.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<KnowledgeHit>, DomainError> {
        let entries = self
            .entries
            .read()
            .map_err(|e| DomainError::internal(e.to_string()))?;

        let mut hits: Vec<KnowledgeHit> = entries
            .iter()
            .map(|(chunk, embedding)| KnowledgeHit {
                chunk: chunk.clone(),
                score: query.cosine_similarity(embedding),
            })
            .collect();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(top_k);
        Ok(hits)
    }

    async fn delete_document(&self, document_id: Uuid) -> Result<(), DomainError> {
        self.entries
            .write()
            .map_err(|e| DomainError::internal(e.to_string()))?
            .retain(|(chunk, _)| chunk.document_id != document_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}

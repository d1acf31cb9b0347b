use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::domain::{
    chunk_text,
    ports::{EmbeddingService, KnowledgeIndex},
    Citation, DomainError, IngestedDocument, KnowledgeHit,
};

/// Chunking parameters for ingested documents.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

/// Knowledge base: ingestion into the similarity index and retrieval of
/// cited passages.
pub struct KnowledgeService {
    embedding: Arc<dyn EmbeddingService>,
    index: Arc<dyn KnowledgeIndex>,
    chunking: ChunkingOptions,
    default_top_k: usize,
}

impl KnowledgeService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        index: Arc<dyn KnowledgeIndex>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            index,
            chunking: ChunkingOptions::default(),
            default_top_k,
        }
    }

    pub fn with_chunking(mut self, chunking: ChunkingOptions) -> Self {
        self.chunking = chunking;
        self
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    #[instrument(skip(self, content), fields(document_id = %document_id, name))]
    pub async fn ingest(
        &self,
        document_id: Uuid,
        name: &str,
        content: &str,
    ) -> Result<IngestedDocument, DomainError> {
        let chunks = chunk_text(
            document_id,
            name,
            content,
            self.chunking.chunk_size,
            self.chunking.chunk_overlap,
        );
        if chunks.is_empty() {
            return Err(DomainError::validation(format!(
                "document '{name}' has no text to index"
            )));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedding.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(DomainError::internal(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let chunks_count = chunks.len();
        let pairs: Vec<_> = chunks.into_iter().zip(embeddings).collect();
        self.index.upsert(&pairs).await?;

        tracing::info!(chunks_count, "document indexed");
        Ok(IngestedDocument {
            document_id,
            document_name: name.to_string(),
            chunks_count,
        })
    }

    #[instrument(skip(self))]
    pub async fn search(&self, query: &str, top_k: usize) -> Result<Vec<KnowledgeHit>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        self.index.search(&embedding, top_k).await
    }

    pub async fn cite(&self, query: &str, top_k: usize) -> Result<Vec<Citation>, DomainError> {
        Ok(self
            .search(query, top_k)
            .await?
            .into_iter()
            .map(Citation::from)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn delete_document(&self, document_id: Uuid) -> Result<(), DomainError> {
        self.index.delete_document(document_id).await
    }

    pub async fn ping(&self) -> Result<(), DomainError> {
        self.index.ping().await
    }
}

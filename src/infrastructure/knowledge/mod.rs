mod in_memory;
mod qdrant;

pub use in_memory::InMemoryKnowledgeIndex;
pub use qdrant::QdrantKnowledgeIndex;

use std::sync::Arc;

use crate::application::{ChunkingOptions, KnowledgeService};
use crate::domain::DomainError;
use crate::infrastructure::config::Config;
use crate::infrastructure::embedding::OpenAiEmbedding;

/// Knowledge service over Qdrant and OpenAI embeddings, as configured.
pub async fn connect(config: &Config) -> Result<KnowledgeService, DomainError> {
    if std::env::var("OPENAI_API_KEY").is_err() {
        return Err(DomainError::validation(
            "OPENAI_API_KEY is not set; embeddings are unavailable",
        ));
    }

    let index = QdrantKnowledgeIndex::connect(
        &config.knowledge.qdrant_url,
        &config.knowledge.collection,
        config.embedding.dimension,
    )
    .await?;
    let embedding = OpenAiEmbedding::from_config(&config.embedding);

    Ok(KnowledgeService::new(
        Arc::new(embedding),
        Arc::new(index),
        config.knowledge.top_k,
    )
    .with_chunking(ChunkingOptions {
        chunk_size: config.knowledge.chunk_size,
        chunk_overlap: config.knowledge.chunk_overlap,
    }))
}

use async_trait::async_trait;
use rig::client::{EmbeddingsClient, ProviderClient};
use rig::embeddings::EmbeddingModel;
use rig::providers::openai;

use crate::domain::{ports::EmbeddingService, DomainError, Embedding};
use crate::infrastructure::config::EmbeddingConfig;

/// OpenAI embeddings through rig. Reads `OPENAI_API_KEY`.
pub struct OpenAiEmbedding {
    client: openai::Client,
    model: String,
}

impl OpenAiEmbedding {
    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self {
            client: openai::Client::from_env(),
            model: config.model.clone(),
        }
    }
}

#[async_trait]
impl EmbeddingService for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
        let embedding = self
            .client
            .embedding_model(&self.model)
            .embed_text(text)
            .await
            .map_err(|e| DomainError::external(format!("embedding failed: {e}")))?;

        Ok(Embedding::from(embedding.vec))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>, DomainError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let embeddings = self
            .client
            .embedding_model(&self.model)
            .embed_texts(texts.to_vec())
            .await
            .map_err(|e| DomainError::external(format!("embedding failed: {e}")))?;

        Ok(embeddings
            .into_iter()
            .map(|e| Embedding::from(e.vec))
            .collect())
    }
}

use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    ScoredPoint, SearchPointsBuilder, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use uuid::Uuid;

use crate::domain::{ports::KnowledgeIndex, DomainError, Embedding, KnowledgeChunk, KnowledgeHit};

fn external(e: impl std::fmt::Display) -> DomainError {
    DomainError::external(format!("qdrant: {e}"))
}

pub struct QdrantKnowledgeIndex {
    client: Qdrant,
    collection: String,
    dimension: usize,
}

impl QdrantKnowledgeIndex {
    /// Connects and creates the collection on first use.
    pub async fn connect(url: &str, collection: &str, dimension: usize) -> Result<Self, DomainError> {
        let client = Qdrant::from_url(url).build().map_err(external)?;

        let index = Self {
            client,
            collection: collection.to_string(),
            dimension,
        };
        index.ensure_collection().await?;

        Ok(index)
    }

    async fn ensure_collection(&self) -> Result<(), DomainError> {
        let collections = self.client.list_collections().await.map_err(external)?;
        if collections
            .collections
            .iter()
            .any(|c| c.name == self.collection)
        {
            return Ok(());
        }

        tracing::info!(collection = %self.collection, dimension = self.dimension, "creating collection");
        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(self.dimension as u64, Distance::Cosine),
                ),
            )
            .await
            .map_err(external)?;

        Ok(())
    }

    fn payload(chunk: &KnowledgeChunk) -> Result<Payload, DomainError> {
        serde_json::json!({
            "chunk_id": chunk.id.to_string(),
            "document_id": chunk.document_id.to_string(),
            "document_name": chunk.document_name,
            "content": chunk.content,
            "chunk_index": chunk.chunk_index,
        })
        .try_into()
        .map_err(|_| DomainError::internal("failed to build point payload"))
    }

    fn hit(point: ScoredPoint) -> Option<KnowledgeHit> {
        let payload = point.payload;
        let text = |key: &str| payload.get(key).and_then(|v| v.as_str()).map(|s| s.to_string());

        let chunk = KnowledgeChunk {
            id: text("chunk_id")?.parse().ok()?,
            document_id: text("document_id")?.parse().ok()?,
            document_name: text("document_name").unwrap_or_default(),
            content: text("content")?,
            chunk_index: payload.get("chunk_index")?.as_integer()? as usize,
        };

        Some(KnowledgeHit {
            chunk,
            score: point.score,
        })
    }
}

#[async_trait]
impl KnowledgeIndex for QdrantKnowledgeIndex {
    async fn upsert(&self, chunks: &[(KnowledgeChunk, Embedding)]) -> Result<(), DomainError> {
        if chunks.is_empty() {
            return Ok(());
        }

        let points = chunks
            .iter()
            .map(|(chunk, embedding)| {
                Ok(PointStruct::new(
                    chunk.id.to_string(),
                    embedding.as_slice().to_vec(),
                    Self::payload(chunk)?,
                ))
            })
            .collect::<Result<Vec<_>, DomainError>>()?;

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points).wait(true))
            .await
            .map_err(external)?;

        Ok(())
    }

    async fn search(
        &self,
        query: &Embedding,
        top_k: usize,
    ) -> Result<Vec<KnowledgeHit>, DomainError> {
        let response = self
            .client
            .search_points(
                SearchPointsBuilder::new(&self.collection, query.as_slice().to_vec(), top_k as u64)
                    .with_payload(true),
            )
            .await
            .map_err(external)?;

        Ok(response.result.into_iter().filter_map(Self::hit).collect())
    }

    async fn delete_document(&self, document_id: Uuid) -> Result<(), DomainError> {
        let filter = Filter::must([Condition::matches(
            "document_id",
            document_id.to_string(),
        )]);

        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection).points(filter))
            .await
            .map_err(external)?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        self.client.health_check().await.map_err(external)?;
        Ok(())
    }
}

use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::application::KnowledgeService;
use crate::domain::KnowledgeHit;
use crate::infrastructure::config::KnowledgeBaseToolConfig;

#[derive(Debug, thiserror::Error)]
#[error("Knowledge base error: {0}")]
pub struct KnowledgeBaseError(pub String);

#[derive(Debug, Deserialize, Serialize)]
pub struct KnowledgeBaseArgs {
    pub query: String,
}

pub struct KnowledgeBaseTool {
    knowledge: Arc<KnowledgeService>,
    top_k: usize,
    config: KnowledgeBaseToolConfig,
}

impl KnowledgeBaseTool {
    pub fn new(knowledge: Arc<KnowledgeService>, config: KnowledgeBaseToolConfig) -> Self {
        let top_k = knowledge.default_top_k();
        Self {
            knowledge,
            top_k,
            config,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    fn format_hits(&self, hits: &[KnowledgeHit]) -> String {
        if hits.is_empty() {
            return self.config.no_results_message.clone();
        }

        hits.iter()
            .enumerate()
            .map(|(i, hit)| {
                format!(
                    "[{}] ({}) {}",
                    i + 1,
                    hit.chunk.document_name,
                    hit.chunk.content
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Tool for KnowledgeBaseTool {
    const NAME: &'static str = "knowledge_base";

    type Error = KnowledgeBaseError;
    type Args = KnowledgeBaseArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: self.config.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "What to look up, phrased as a question or keywords"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        tracing::debug!(query = %args.query, "knowledge_base called");
        let hits = self
            .knowledge
            .search(&args.query, self.top_k)
            .await
            .map_err(|e| KnowledgeBaseError(e.to_string()))?;

        Ok(self.format_hits(&hits))
    }
}

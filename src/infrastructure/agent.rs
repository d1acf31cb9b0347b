use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openrouter;
use std::sync::Arc;
use std::time::Duration;

use crate::application::{KnowledgeService, QuotationEngine};
use crate::domain::{ports::AgentRunner, AgentProfile, DomainError, Message};
use crate::infrastructure::config::{AppConfig, PromptsConfig, ToolsConfig};
use crate::infrastructure::tools::{KnowledgeBaseTool, PriceLookupTool};

/// Agent runner backed by OpenRouter. Reads `OPENROUTER_API_KEY`.
///
/// A fresh rig agent is built per run so each persona gets its own
/// preamble and tool set.
pub struct HelpdeskAgent {
    client: openrouter::Client,
    model: String,
    prompts: PromptsConfig,
    tools: ToolsConfig,
    quotation: Arc<QuotationEngine>,
    knowledge: Arc<KnowledgeService>,
    max_turns: usize,
    timeout: Duration,
}

impl HelpdeskAgent {
    pub fn new(
        quotation: Arc<QuotationEngine>,
        knowledge: Arc<KnowledgeService>,
        config: &AppConfig,
    ) -> Self {
        Self {
            client: openrouter::Client::from_env(),
            model: config.config.llm.model.clone(),
            prompts: config.prompts.clone(),
            tools: config.config.tools.clone(),
            quotation,
            knowledge,
            max_turns: config.config.llm.max_turns,
            timeout: Duration::from_secs(config.config.llm.timeout_seconds),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn knowledge_tool(&self) -> KnowledgeBaseTool {
        KnowledgeBaseTool::new(self.knowledge.clone(), self.tools.knowledge_base.clone())
    }
}

#[async_trait]
impl AgentRunner for HelpdeskAgent {
    async fn run(
        &self,
        profile: AgentProfile,
        message: &str,
        history: &[Message],
    ) -> Result<String, DomainError> {
        let preamble = self.prompts.for_profile(profile).system();
        let builder = self
            .client
            .agent(&self.model)
            .preamble(&preamble)
            .tool(self.knowledge_tool());

        let agent = match profile {
            AgentProfile::Helpdesk => builder
                .tool(PriceLookupTool::new(
                    self.quotation.clone(),
                    self.tools.price_lookup.clone(),
                ))
                .build(),
            AgentProfile::Assistant => builder.build(),
        };

        let prompt = build_prompt(message, history);
        tracing::debug!(agent = profile.id(), history = history.len(), "running agent");

        tokio::time::timeout(self.timeout, agent.prompt(&prompt).multi_turn(self.max_turns))
            .await
            .map_err(|_| DomainError::timeout("Agent execution timed out"))?
            .map_err(|e| DomainError::external(format!("Agent failed: {e}")))
    }
}

fn build_prompt(message: &str, history: &[Message]) -> String {
    if history.is_empty() {
        return message.to_string();
    }

    let context = history
        .iter()
        .map(|m| format!("{}: {}", m.role.as_str(), m.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Previous conversation:\n{}\n\nCurrent message from user: {}",
        context, message
    )
}

use async_trait::async_trait;

use crate::domain::{errors::DomainError, AgentProfile, Message};

/// Runs one agent turn, tools included, and returns the final answer text.
#[async_trait]
pub trait AgentRunner: Send + Sync {
    async fn run(
        &self,
        profile: AgentProfile,
        message: &str,
        history: &[Message],
    ) -> Result<String, DomainError>;
}

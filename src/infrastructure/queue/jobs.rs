use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::AgentProfile;

pub mod queues {
    pub const CHAT_QUEUE: &str = "jobs:chat";
    pub const INGEST_QUEUE: &str = "jobs:ingest";
}

pub mod keys {
    use uuid::Uuid;

    pub fn job_status(job_id: &Uuid) -> String {
        format!("job:status:{}", job_id)
    }

    pub fn session(session_id: &Uuid) -> String {
        format!("session:{}", session_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl QueueJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobResult {
    pub job_id: Uuid,
    pub status: QueueJobStatus,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobResult {
    fn with_status(job_id: Uuid, status: QueueJobStatus) -> Self {
        Self {
            job_id,
            status,
            result: None,
            error: None,
            completed_at: None,
        }
    }

    pub fn pending(job_id: Uuid) -> Self {
        Self::with_status(job_id, QueueJobStatus::Pending)
    }

    pub fn processing(job_id: Uuid) -> Self {
        Self::with_status(job_id, QueueJobStatus::Processing)
    }

    pub fn completed(job_id: Uuid, result: serde_json::Value) -> Self {
        Self {
            result: Some(result),
            completed_at: Some(Utc::now()),
            ..Self::with_status(job_id, QueueJobStatus::Completed)
        }
    }

    pub fn failed(job_id: Uuid, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            completed_at: Some(Utc::now()),
            ..Self::with_status(job_id, QueueJobStatus::Failed)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessChatJob {
    pub job_id: Uuid,
    pub message: String,
    pub session_id: Uuid,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub agent_id: AgentProfile,
}

impl ProcessChatJob {
    /// A chat job on a fresh session.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            message: message.into(),
            session_id: Uuid::new_v4(),
            user_id: None,
            agent_id: AgentProfile::default(),
        }
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = session_id;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_agent(mut self, agent: AgentProfile) -> Self {
        self.agent_id = agent;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestKnowledgeJob {
    pub job_id: Uuid,
    pub document_id: Uuid,
    pub document_name: String,
    pub content: String,
}

impl IngestKnowledgeJob {
    pub fn new(document_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            document_name: document_name.into(),
            content: content.into(),
        }
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Chat session history shared between runs of the same agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Option<String>,
    pub agent_id: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: Uuid, agent_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: None,
            agent_id: agent_id.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Records one completed run: the user's message and the agent's reply.
    pub fn record_run(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        let now = Utc::now();
        self.messages.push(Message::new(MessageRole::User, user));
        self.messages.push(Message::new(MessageRole::Assistant, assistant));
        self.updated_at = now;
    }

    /// Messages from the last `runs` user turns, oldest first.
    pub fn recent_runs(&self, runs: usize) -> &[Message] {
        if runs == 0 {
            return &[];
        }

        let start = self
            .messages
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, m)| m.role == MessageRole::User)
            .nth(runs - 1)
            .map(|(i, _)| i)
            .unwrap_or(0);

        &self.messages[start..]
    }

    pub fn run_count(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == MessageRole::User)
            .count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// Agent personas served by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentProfile {
    #[default]
    #[serde(rename = "helpdesk-assistant")]
    Helpdesk,
    #[serde(rename = "general-assistant")]
    Assistant,
}

impl AgentProfile {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Helpdesk => "helpdesk-assistant",
            Self::Assistant => "general-assistant",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "helpdesk-assistant" => Some(Self::Helpdesk),
            "general-assistant" => Some(Self::Assistant),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_runs(n: usize) -> Session {
        let mut session = Session::new(Uuid::new_v4(), "helpdesk-assistant");
        for i in 0..n {
            session.record_run(format!("question {i}"), format!("answer {i}"));
        }
        session
    }

    #[test]
    fn test_recent_runs_window() {
        let session = session_with_runs(7);
        let recent = session.recent_runs(5);

        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].content, "question 2");
        assert_eq!(recent[9].content, "answer 6");
    }

    #[test]
    fn test_agent_profile_ids() {
        assert_eq!(AgentProfile::from_id("general-assistant"), Some(AgentProfile::Assistant));
        assert_eq!(AgentProfile::from_id(AgentProfile::Helpdesk.id()), Some(AgentProfile::Helpdesk));
        assert_eq!(AgentProfile::from_id("sales-bot"), None);
    }

    #[test]
    fn test_recent_runs_shorter_history() {
        let session = session_with_runs(2);

        assert_eq!(session.recent_runs(5).len(), 4);
        assert!(session.recent_runs(0).is_empty());
        assert_eq!(session.run_count(), 2);
    }
}

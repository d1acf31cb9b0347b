use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::domain::{
    ports::{AgentRunner, SessionStore},
    AgentProfile, DomainError, Session,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    pub session_id: Uuid,
    pub agent_id: String,
    pub response: String,
    pub run_count: usize,
}

/// One conversational run: load history, ask the agent, persist the exchange.
///
/// History is best effort. A store that cannot be read starts a fresh
/// session, and a failed save is logged without failing the run.
pub struct ChatService {
    agent: Arc<dyn AgentRunner>,
    sessions: Arc<dyn SessionStore>,
    history_runs: usize,
}

impl ChatService {
    pub fn new(
        agent: Arc<dyn AgentRunner>,
        sessions: Arc<dyn SessionStore>,
        history_runs: usize,
    ) -> Self {
        Self {
            agent,
            sessions,
            history_runs,
        }
    }

    #[instrument(skip(self, message, user_id), fields(session_id = %session_id, agent = profile.id()))]
    pub async fn respond(
        &self,
        session_id: Uuid,
        user_id: Option<&str>,
        profile: AgentProfile,
        message: &str,
    ) -> Result<ChatReply, DomainError> {
        let mut session = match self.sessions.load(session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => new_session(session_id, user_id, profile),
            Err(e) => {
                warn!(error = %e, "session history unavailable, starting fresh");
                new_session(session_id, user_id, profile)
            }
        };

        let response = self
            .agent
            .run(profile, message, session.recent_runs(self.history_runs))
            .await?;

        session.record_run(message, response.as_str());
        if let Err(e) = self.sessions.save(&session).await {
            warn!(error = %e, "failed to persist session history");
        }

        Ok(ChatReply {
            session_id,
            agent_id: profile.id().to_string(),
            response,
            run_count: session.run_count(),
        })
    }
}

fn new_session(id: Uuid, user_id: Option<&str>, profile: AgentProfile) -> Session {
    let session = Session::new(id, profile.id());
    match user_id {
        Some(user) => session.with_user(user),
        None => session,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;
    use crate::infrastructure::InMemorySessionStore;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoAgent {
        seen_history: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl AgentRunner for EchoAgent {
        async fn run(
            &self,
            profile: AgentProfile,
            message: &str,
            history: &[Message],
        ) -> Result<String, DomainError> {
            self.seen_history.lock().unwrap().push(history.len());
            Ok(format!("{}: {message}", profile.id()))
        }
    }

    struct FailingAgent;

    #[async_trait]
    impl AgentRunner for FailingAgent {
        async fn run(&self, _: AgentProfile, _: &str, _: &[Message]) -> Result<String, DomainError> {
            Err(DomainError::timeout("Agent execution timed out"))
        }
    }

    #[tokio::test]
    async fn test_history_window_is_passed_to_agent() {
        let agent = Arc::new(EchoAgent::default());
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = ChatService::new(agent.clone(), sessions.clone(), 2);
        let session_id = Uuid::new_v4();

        for i in 0..4 {
            let reply = service
                .respond(session_id, Some("user-1"), AgentProfile::Helpdesk, &format!("q{i}"))
                .await
                .unwrap();
            assert_eq!(reply.run_count, i + 1);
            assert_eq!(reply.response, format!("helpdesk-assistant: q{i}"));
        }

        assert_eq!(*agent.seen_history.lock().unwrap(), vec![0, 2, 4, 4]);

        let stored = sessions.load(session_id).await.unwrap().unwrap();
        assert_eq!(stored.messages.len(), 8);
        assert_eq!(stored.user_id.as_deref(), Some("user-1"));
    }

    #[tokio::test]
    async fn test_agent_failure_leaves_history_untouched() {
        let sessions = Arc::new(InMemorySessionStore::new());
        let service = ChatService::new(Arc::new(FailingAgent), sessions.clone(), 5);
        let session_id = Uuid::new_v4();

        let err = service
            .respond(session_id, None, AgentProfile::Assistant, "hello")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Timeout(_)));
        assert!(sessions.load(session_id).await.unwrap().is_none());
    }
}

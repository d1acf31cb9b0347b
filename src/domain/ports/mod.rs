mod agent;
mod embedding;
mod knowledge_index;
mod session_store;

pub use agent::AgentRunner;
pub use embedding::EmbeddingService;
pub use knowledge_index::KnowledgeIndex;
pub use session_store::SessionStore;

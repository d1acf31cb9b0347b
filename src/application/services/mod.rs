mod chat;
mod knowledge;
mod quotation;

pub use chat::{ChatReply, ChatService};
pub use knowledge::{ChunkingOptions, KnowledgeService};
pub use quotation::QuotationEngine;

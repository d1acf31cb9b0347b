//! Application layer - Use cases and orchestration.
//!
//! Services here combine domain logic with ports (traits) implemented in the
//! infrastructure layer: quotation over the pricing tables, knowledge
//! ingestion and retrieval, and chat runs with session history.

pub mod services;

pub use services::{ChatReply, ChatService, ChunkingOptions, KnowledgeService, QuotationEngine};

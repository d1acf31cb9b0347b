mod knowledge_base;
mod price_lookup;

pub use knowledge_base::{KnowledgeBaseArgs, KnowledgeBaseError, KnowledgeBaseTool};
pub use price_lookup::{PriceLookupArgs, PriceLookupError, PriceLookupTool};

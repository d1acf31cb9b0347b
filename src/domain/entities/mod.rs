mod catalog;
mod embedding;
mod knowledge;
mod quote;
mod region;
mod session;

pub use catalog::{
    normalize_service_type, RegionAvailability, ServiceCatalog, ServiceCatalogEntry,
    VariableCostBasis,
};
pub use embedding::Embedding;
pub use knowledge::{chunk_text, Citation, IngestedDocument, KnowledgeChunk, KnowledgeHit};
pub use quote::{Quote, QuoteError, QuoteRequest, QuoteResult, CURRENCY};
pub use region::{PostcodeRange, PostcodeRegionTable, Region};
pub use session::{AgentProfile, Message, MessageRole, Session};

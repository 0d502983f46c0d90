//! Infrastructure services

mod assistant_service;
mod semantic_answer_cache_service;

pub use assistant_service::AssistantService;
pub use semantic_answer_cache_service::SemanticAnswerCache;

//! Infrastructure layer - External service implementations

pub mod answer_store;
pub mod embedding;
pub mod llm;
pub mod logging;
pub mod observability;
pub mod project;
pub mod semantic_cache;
pub mod services;

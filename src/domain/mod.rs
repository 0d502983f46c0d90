//! Domain layer - Core business logic and entities

pub mod answer_store;
pub mod assistant;
pub mod embedding;
pub mod error;
pub mod project;
pub mod semantic_cache;

pub use answer_store::AnswerStore;
pub use assistant::{Answer, AnswerProducer, AssistantAnswer, Audience};
pub use embedding::{Embedder, EmbeddingProvider, PromptVector};
pub use error::DomainError;
pub use project::{Project, ProjectRepository};
pub use semantic_cache::{
    CacheSnapshot, LookupOutcome, MissReason, SemanticCacheConfig, SemanticCacheStats,
    SemanticIndex, SnapshotMetadata, SnapshotStore,
};

//! Semantic cache domain models and traits
//!
//! Matches incoming prompts against previously answered ones by embedding
//! similarity instead of exact text.

mod config;
mod index;
mod snapshot;
mod types;

pub use config::SemanticCacheConfig;
pub use index::{IndexMatch, SemanticIndex};
pub use snapshot::{CacheSnapshot, SnapshotMetadata, SnapshotStore};
pub use types::{
    AnswerKey, CachedAnswer, EntryCounts, LookupOutcome, MissReason, SemanticCacheStats,
    ANSWER_KEY_PREFIX,
};

//! Semantic cache result and statistics types

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of every answer key
pub const ANSWER_KEY_PREFIX: &str = "answer";

/// Key under which an answer body lives in the answer store.
///
/// Keys are allocated as `answer:<n>` where `n` is the entry's index position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnswerKey(String);

impl AnswerKey {
    /// Key for the entry at `position`
    pub fn for_position(position: usize) -> Self {
        Self(format!("{}:{}", ANSWER_KEY_PREFIX, position))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnswerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Answer served from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct CachedAnswer {
    pub text: String,
    pub key: String,
    pub similarity: f32,
    pub position: usize,
}

/// Why a lookup did not produce an answer
#[derive(Debug, Clone, PartialEq)]
pub enum MissReason {
    /// Caching is switched off
    Disabled,
    /// Nothing stored yet
    EmptyIndex,
    /// Embedder failed; treated as a miss
    EmbeddingUnavailable,
    /// Best match did not exceed the threshold
    BelowThreshold { similarity: f32 },
    /// Key present in metadata but absent from the answer store
    AnswerStoreMiss { key: String },
    /// Answer store could not be read
    AnswerStoreUnavailable { key: String },
}

impl MissReason {
    /// Short label for metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::EmptyIndex => "empty_index",
            Self::EmbeddingUnavailable => "embedding_unavailable",
            Self::BelowThreshold { .. } => "below_threshold",
            Self::AnswerStoreMiss { .. } => "answer_store_miss",
            Self::AnswerStoreUnavailable { .. } => "answer_store_unavailable",
        }
    }
}

/// Result of a semantic cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    Hit(CachedAnswer),
    Miss(MissReason),
}

impl LookupOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    pub fn into_answer(self) -> Option<CachedAnswer> {
        match self {
            Self::Hit(answer) => Some(answer),
            Self::Miss(_) => None,
        }
    }
}

/// Cardinalities of the three parallel collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryCounts {
    pub vectors: usize,
    pub prompts: usize,
    pub keys: usize,
}

impl EntryCounts {
    pub fn is_consistent(&self) -> bool {
        self.vectors == self.prompts && self.prompts == self.keys
    }
}

/// Statistics for the semantic cache
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SemanticCacheStats {
    pub total_entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub answer_store_misses: u64,
    pub persistence_failures: u64,
    pub similarity_threshold: f32,
    /// In-memory state is ahead of the durable snapshot
    pub dirty: bool,
}

impl SemanticCacheStats {
    /// Calculate hit rate
    pub fn hit_rate(&self) -> f32 {
        let total = self.hits + self.misses;

        if total == 0 {
            return 0.0;
        }

        self.hits as f32 / total as f32
    }
}

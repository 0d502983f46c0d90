//! Durable snapshot of the semantic index and its parallel metadata

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::SemanticIndex;
use crate::domain::DomainError;

/// Metadata document persisted next to the index snapshot.
///
/// `prompts[i]` and `keys[i]` describe the vector at index position `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub prompts: Vec<String>,
    pub keys: Vec<String>,
}

/// Index snapshot plus metadata, always read and written together
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub index: SemanticIndex,
    pub metadata: SnapshotMetadata,
}

impl CacheSnapshot {
    pub fn new(index: SemanticIndex, metadata: SnapshotMetadata) -> Self {
        Self { index, metadata }
    }

    /// Empty snapshot for the given dimension
    pub fn empty(dimensions: usize) -> Self {
        Self::new(SemanticIndex::new(dimensions), SnapshotMetadata::default())
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Check positional correspondence and the expected vector dimension
    pub fn validate(&self, dimensions: usize) -> Result<(), DomainError> {
        let (prompts, keys, vectors) = (
            self.metadata.prompts.len(),
            self.metadata.keys.len(),
            self.index.len(),
        );

        if prompts != keys || keys != vectors {
            return Err(DomainError::index_corrupt(format!(
                "Snapshot pair out of step: {} prompts, {} keys, {} vectors",
                prompts, keys, vectors
            )));
        }

        if self.index.dimensions() != dimensions {
            return Err(DomainError::index_corrupt(format!(
                "Snapshot holds {}-dimensional vectors, cache is configured for {}",
                self.index.dimensions(),
                dimensions
            )));
        }

        Ok(())
    }

    /// Drop trailing entries that are not present in all three sequences.
    ///
    /// Returns the number of vectors, prompts and keys removed in total.
    pub fn truncate_to_common_prefix(&mut self) -> usize {
        let before = self.index.len() + self.metadata.prompts.len() + self.metadata.keys.len();
        let common = self
            .index
            .len()
            .min(self.metadata.prompts.len())
            .min(self.metadata.keys.len());

        self.index.truncate(common);
        self.metadata.prompts.truncate(common);
        self.metadata.keys.truncate(common);

        before - common * 3
    }
}

/// Durable storage for the snapshot pair
#[async_trait]
pub trait SnapshotStore: Send + Sync + Debug {
    /// Load the snapshot pair; `None` when no index snapshot exists yet
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError>;

    /// Overwrite the stored snapshot pair
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError>;

    /// Remove both artifacts, returning whether anything existed
    async fn reset(&self) -> Result<bool, DomainError>;

    /// Human-readable location for logs
    fn describe(&self) -> String;
}

//! Semantic answer cache service
//!
//! Serves answers for prompts that are semantically close to prompts answered
//! before. The vector index, prompt texts and answer keys live together behind
//! one async read-write lock; answer bodies live in the [`AnswerStore`].
//!
//! Writers are serialized by a separate mutex held across the whole store. The
//! read-write lock is only taken for writing around the in-memory append, so
//! lookups never wait on the answer store or on snapshot I/O.
//!
//! Writes follow a fixed order: answer store entry, in-memory append, then a
//! full snapshot persist. A crash between the first and last step can orphan an
//! answer but never leaves a key pointing at a missing answer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{debug, error, info, warn};

use crate::domain::answer_store::AnswerStore;
use crate::domain::embedding::{Embedder, PromptVector};
use crate::domain::semantic_cache::{
    AnswerKey, CacheSnapshot, CachedAnswer, EntryCounts, LookupOutcome, MissReason,
    SemanticCacheConfig, SemanticCacheStats, SemanticIndex, SnapshotMetadata, SnapshotStore,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{
    record_cache_entries, record_cache_lookup, record_cache_store,
};

/// Index, prompts and keys, always the same length
#[derive(Debug)]
struct CacheState {
    index: SemanticIndex,
    prompts: Vec<String>,
    keys: Vec<String>,
    /// In-memory state is ahead of the last successful persist
    dirty: bool,
}

impl CacheState {
    fn empty(dimensions: usize) -> Self {
        Self {
            index: SemanticIndex::new(dimensions),
            prompts: Vec::new(),
            keys: Vec::new(),
            dirty: false,
        }
    }

    fn from_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            index: snapshot.index,
            prompts: snapshot.metadata.prompts,
            keys: snapshot.metadata.keys,
            dirty: false,
        }
    }

    fn len(&self) -> usize {
        self.keys.len()
    }

    fn append(
        &mut self,
        vector: &PromptVector,
        prompt: &str,
        key: &AnswerKey,
    ) -> Result<usize, DomainError> {
        let position = self.index.add(vector.as_slice())?;
        self.prompts.push(prompt.to_string());
        self.keys.push(key.as_str().to_string());

        Ok(position)
    }

    fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot::new(
            self.index.clone(),
            SnapshotMetadata {
                prompts: self.prompts.clone(),
                keys: self.keys.clone(),
            },
        )
    }

    fn counts(&self) -> EntryCounts {
        EntryCounts {
            vectors: self.index.len(),
            prompts: self.prompts.len(),
            keys: self.keys.len(),
        }
    }
}

/// Lookup and store counters
#[derive(Debug, Default)]
struct CacheCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    answer_store_misses: AtomicU64,
    persistence_failures: AtomicU64,
}

/// Semantic cache over previously answered prompts
#[derive(Debug)]
pub struct SemanticAnswerCache {
    embedder: Embedder,
    answer_store: Arc<dyn AnswerStore>,
    snapshots: Arc<dyn SnapshotStore>,
    config: SemanticCacheConfig,
    threshold: f32,
    state: RwLock<CacheState>,
    writer: Mutex<()>,
    counters: CacheCounters,
}

impl SemanticAnswerCache {
    /// Load the cache from its snapshot store, or start empty when none exists.
    ///
    /// Fails with [`DomainError::IndexCorrupt`] when the stored pair is
    /// inconsistent or was written for a different vector dimension.
    pub async fn load(
        embedder: Embedder,
        answer_store: Arc<dyn AnswerStore>,
        snapshots: Arc<dyn SnapshotStore>,
        config: SemanticCacheConfig,
    ) -> Result<Self, DomainError> {
        if embedder.dimensions() != config.dimensions {
            return Err(DomainError::configuration(format!(
                "Embedder produces {} dimensions but the semantic cache expects {}",
                embedder.dimensions(),
                config.dimensions
            )));
        }

        let state = match snapshots.load().await? {
            Some(snapshot) => {
                snapshot.validate(config.dimensions)?;
                CacheState::from_snapshot(snapshot)
            }
            None => CacheState::empty(config.dimensions),
        };

        let threshold = config.effective_threshold();
        info!(
            entries = state.len(),
            threshold = threshold,
            snapshot = %snapshots.describe(),
            "Semantic cache loaded"
        );
        record_cache_entries(state.len());

        Ok(Self {
            embedder,
            answer_store,
            snapshots,
            config,
            threshold,
            state: RwLock::new(state),
            writer: Mutex::new(()),
            counters: CacheCounters::default(),
        })
    }

    /// Check if semantic caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Similarity a match must strictly exceed
    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    pub fn answer_store(&self) -> &Arc<dyn AnswerStore> {
        &self.answer_store
    }

    /// Stored answer for a sufficiently similar prior prompt
    pub async fn lookup(&self, prompt: &str) -> Option<CachedAnswer> {
        self.lookup_outcome(prompt).await.into_answer()
    }

    /// Like [`lookup`](Self::lookup) but reports why a miss happened
    pub async fn lookup_outcome(&self, prompt: &str) -> LookupOutcome {
        let outcome = self.resolve(prompt).await;

        match &outcome {
            LookupOutcome::Hit(answer) => {
                self.counters.hits.fetch_add(1, Ordering::Relaxed);
                record_cache_lookup("hit");
                debug!(
                    similarity = answer.similarity,
                    position = answer.position,
                    key = %answer.key,
                    "Semantic cache hit"
                );
            }
            LookupOutcome::Miss(reason) => {
                if *reason != MissReason::Disabled {
                    self.counters.misses.fetch_add(1, Ordering::Relaxed);
                }
                record_cache_lookup(reason.label());
                debug!(reason = reason.label(), "Semantic cache miss");
            }
        }

        outcome
    }

    async fn resolve(&self, prompt: &str) -> LookupOutcome {
        if !self.config.enabled {
            return LookupOutcome::Miss(MissReason::Disabled);
        }

        if self.state.read().await.index.is_empty() {
            return LookupOutcome::Miss(MissReason::EmptyIndex);
        }

        let vector = match self.embedder.embed(prompt).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!(error = %e, "Embedding failed during cache lookup, treating as miss");
                return LookupOutcome::Miss(MissReason::EmbeddingUnavailable);
            }
        };

        let (key, best) = {
            let state = self.state.read().await;

            let Some(best) = state.index.search(vector.as_slice()) else {
                return LookupOutcome::Miss(MissReason::EmptyIndex);
            };

            debug!(
                similarity = best.score,
                position = best.position,
                entries = state.len(),
                "Nearest cached prompt"
            );

            if best.score <= self.threshold {
                return LookupOutcome::Miss(MissReason::BelowThreshold {
                    similarity: best.score,
                });
            }

            (state.keys[best.position].clone(), best)
        };

        match self.answer_store.get(&key).await {
            Ok(Some(text)) => LookupOutcome::Hit(CachedAnswer {
                text,
                key,
                similarity: best.score,
                position: best.position,
            }),
            Ok(None) => {
                self.counters
                    .answer_store_misses
                    .fetch_add(1, Ordering::Relaxed);
                warn!(
                    key = %key,
                    position = best.position,
                    "Answer key indexed but missing from answer store"
                );
                LookupOutcome::Miss(MissReason::AnswerStoreMiss { key })
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Answer store read failed, treating as miss");
                LookupOutcome::Miss(MissReason::AnswerStoreUnavailable { key })
            }
        }
    }

    /// Record `answer` for `prompt`.
    ///
    /// Returns the allocated key, or `None` when caching is disabled. On a
    /// persistence failure the entry stays in memory, the cache is marked dirty
    /// and the error is returned.
    pub async fn store(
        &self,
        prompt: &str,
        answer: &str,
    ) -> Result<Option<AnswerKey>, DomainError> {
        if !self.config.enabled {
            return Ok(None);
        }

        let result = self.append_and_persist(prompt, answer).await;
        record_cache_store(result.is_ok());

        result.map(Some)
    }

    async fn append_and_persist(&self, prompt: &str, answer: &str) -> Result<AnswerKey, DomainError> {
        let vector = self.embedder.embed(prompt).await?;

        let writer = self.writer.lock().await;
        let key = AnswerKey::for_position(self.state.read().await.len());

        self.answer_store.set(key.as_str(), answer).await?;

        {
            let mut state = self.state.write().await;
            let position = state.append(&vector, prompt, &key)?;
            state.dirty = true;
            record_cache_entries(state.len());

            info!(key = %key, position = position, entries = state.len(), "Stored answer in semantic cache");
        }

        self.persist(&writer).await?;

        Ok(key)
    }

    /// Write the current state. Only called by the holder of the writer lock,
    /// so the state cannot change between the copy and the dirty reset.
    async fn persist(&self, _writer: &MutexGuard<'_, ()>) -> Result<(), DomainError> {
        let snapshot = self.state.read().await.snapshot();

        match self.snapshots.save(&snapshot).await {
            Ok(()) => {
                self.state.write().await.dirty = false;
                Ok(())
            }
            Err(e) => {
                self.counters
                    .persistence_failures
                    .fetch_add(1, Ordering::Relaxed);
                error!(
                    error = %e,
                    entries = snapshot.len(),
                    snapshot = %self.snapshots.describe(),
                    "Failed to persist semantic cache snapshot"
                );
                Err(DomainError::persistence(e.to_string()))
            }
        }
    }

    /// Persist pending in-memory state. Returns whether a write happened.
    pub async fn flush(&self) -> Result<bool, DomainError> {
        let writer = self.writer.lock().await;

        if !self.state.read().await.dirty {
            return Ok(false);
        }

        self.persist(&writer).await?;
        info!(entries = self.len().await, "Flushed semantic cache snapshot");

        Ok(true)
    }

    /// Number of cached entries
    pub async fn len(&self) -> usize {
        self.state.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Answer keys in index order
    pub async fn keys(&self) -> Vec<String> {
        self.state.read().await.keys.clone()
    }

    /// Cardinalities of vectors, prompts and keys
    pub async fn entry_counts(&self) -> EntryCounts {
        self.state.read().await.counts()
    }

    /// Whether unpersisted changes exist
    pub async fn is_dirty(&self) -> bool {
        self.state.read().await.dirty
    }

    pub async fn stats(&self) -> SemanticCacheStats {
        let state = self.state.read().await;

        SemanticCacheStats {
            total_entries: state.len(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            answer_store_misses: self.counters.answer_store_misses.load(Ordering::Relaxed),
            persistence_failures: self.counters.persistence_failures.load(Ordering::Relaxed),
            similarity_threshold: self.threshold,
            dirty: state.dirty,
        }
    }
}

//! In-memory answer store using moka

use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::domain::answer_store::AnswerStore;
use crate::domain::DomainError;

/// Thread-safe in-memory answer store.
///
/// Unbounded and without expiry, matching the durability contract of the
/// Redis backend for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct InMemoryAnswerStore {
    answers: MokaCache<String, String>,
}

impl InMemoryAnswerStore {
    pub fn new() -> Self {
        Self {
            answers: MokaCache::builder().build(),
        }
    }

    /// Number of stored answers
    pub fn len(&self) -> u64 {
        self.answers.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryAnswerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerStore for InMemoryAnswerStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.answers.get(key).await)
    }

    async fn set(&self, key: &str, answer: &str) -> Result<(), DomainError> {
        self.answers.insert(key.to_string(), answer.to_string()).await;
        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.answers.contains_key(key))
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.answers.remove(key).await.is_some())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_and_get() {
        let store = InMemoryAnswerStore::new();

        store.set("answer:0", "respuesta").await.unwrap();

        assert_eq!(
            store.get("answer:0").await.unwrap().as_deref(),
            Some("respuesta")
        );
        assert!(store.get("answer:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overwrite() {
        let store = InMemoryAnswerStore::new();

        store.set("answer:0", "v1").await.unwrap();
        store.set("answer:0", "v2").await.unwrap();

        assert_eq!(store.get("answer:0").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_delete_and_exists() {
        let store = InMemoryAnswerStore::new();
        store.set("answer:0", "respuesta").await.unwrap();

        assert!(store.exists("answer:0").await.unwrap());
        assert!(store.delete("answer:0").await.unwrap());
        assert!(!store.exists("answer:0").await.unwrap());
        assert!(!store.delete("answer:0").await.unwrap());
    }

    #[tokio::test]
    async fn test_ping_and_backend() {
        let store = InMemoryAnswerStore::default();

        store.ping().await.unwrap();
        assert_eq!(store.backend(), "in_memory");
    }
}

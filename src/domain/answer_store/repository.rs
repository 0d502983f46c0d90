//! Answer store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Key-value store mapping answer keys to answer text.
///
/// Entries never expire. Implementations must be safe for concurrent use.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnswerStore: Send + Sync + Debug {
    /// Gets the answer stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `answer` under `key`, overwriting any previous value
    async fn set(&self, key: &str, answer: &str) -> Result<(), DomainError>;

    /// Checks if a key exists
    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Deletes a key, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Liveness check
    async fn ping(&self) -> Result<(), DomainError>;

    /// Backend name for logs and health output
    fn backend(&self) -> &'static str;
}

//! Redis answer store implementation

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::domain::answer_store::AnswerStore;
use crate::domain::DomainError;

/// Configuration for the Redis answer store
#[derive(Debug, Clone)]
pub struct RedisAnswerStoreConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Upper bound for one connection attempt, retries included
    pub connection_timeout: Duration,
    /// Reconnect retries inside one connection attempt
    pub connection_retries: usize,
}

impl Default for RedisAnswerStoreConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connection_timeout: Duration::from_secs(2),
            connection_retries: 1,
        }
    }
}

impl RedisAnswerStoreConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }
}

/// Redis-backed answer store.
///
/// Answers are written with plain `SET` and never expire. The managed
/// connection is opened on demand: a Redis that is down at startup only makes
/// calls fail until it comes back, each call making one bounded attempt.
#[derive(Clone)]
pub struct RedisAnswerStore {
    client: Client,
    connection: Arc<Mutex<Option<ConnectionManager>>>,
    config: RedisAnswerStoreConfig,
}

impl fmt::Debug for RedisAnswerStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisAnswerStore")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisAnswerStore {
    /// Creates the store and makes a first connection attempt.
    ///
    /// Only an invalid URL is an error; an unreachable server is logged and
    /// retried on later calls.
    pub async fn new(config: RedisAnswerStoreConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str()).map_err(|e| {
            DomainError::configuration(format!("Invalid Redis URL '{}': {}", config.url, e))
        })?;

        let store = Self {
            client,
            connection: Arc::new(Mutex::new(None)),
            config,
        };

        if let Err(e) = store.connection().await {
            error!(
                url = %store.config.url,
                error = %e,
                "Redis unreachable at startup, answer store calls will fail until it recovers"
            );
        }

        Ok(store)
    }

    /// Shared managed connection, connecting first if needed
    async fn connection(&self) -> Result<ConnectionManager, DomainError> {
        let mut slot = self.connection.lock().await;

        if let Some(connection) = slot.as_ref() {
            return Ok(connection.clone());
        }

        let manager_config = ConnectionManagerConfig::new()
            .set_number_of_retries(self.config.connection_retries)
            .set_connection_timeout(self.config.connection_timeout);

        let connection = tokio::time::timeout(
            self.config.connection_timeout,
            ConnectionManager::new_with_config(self.client.clone(), manager_config),
        )
        .await
        .map_err(|_| {
            DomainError::answer_store(format!(
                "Timed out connecting to Redis after {:?}",
                self.config.connection_timeout
            ))
        })?
        .map_err(|e| DomainError::answer_store(format!("Failed to connect to Redis: {}", e)))?;

        info!(url = %self.config.url, "Connected to Redis");
        *slot = Some(connection.clone());

        Ok(connection)
    }

    /// Whether a managed connection has been established
    pub async fn is_connected(&self) -> bool {
        self.connection.lock().await.is_some()
    }

    fn prefix_key(&self, key: &str) -> String {
        match &self.config.key_prefix {
            Some(prefix) => format!("{}:{}", prefix, key),
            None => key.to_string(),
        }
    }
}

#[async_trait]
impl AnswerStore for RedisAnswerStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        let result: Option<String> = conn.get(&prefixed_key).await.map_err(|e| {
            DomainError::answer_store(format!("Failed to get key '{}': {}", key, e))
        })?;

        Ok(result)
    }

    async fn set(&self, key: &str, answer: &str) -> Result<(), DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        let _: () = conn.set(&prefixed_key, answer).await.map_err(|e| {
            DomainError::answer_store(format!("Failed to set key '{}': {}", key, e))
        })?;

        Ok(())
    }

    async fn exists(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        let exists: bool = conn.exists(&prefixed_key).await.map_err(|e| {
            DomainError::answer_store(format!("Failed to check existence of key '{}': {}", key, e))
        })?;

        Ok(exists)
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let prefixed_key = self.prefix_key(key);
        let mut conn = self.connection().await?;

        let deleted: i32 = conn.del(&prefixed_key).await.map_err(|e| {
            DomainError::answer_store(format!("Failed to delete key '{}': {}", key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        let mut conn = self.connection().await?;

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::answer_store(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These tests require a running Redis instance

    fn get_test_config() -> RedisAnswerStoreConfig {
        RedisAnswerStoreConfig::new("redis://127.0.0.1:6379").with_key_prefix("ley-rag-test")
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_and_get() {
        let store = RedisAnswerStore::new(get_test_config()).await.unwrap();

        store.set("answer:0", "El artículo 1 define...").await.unwrap();

        let result = store.get("answer:0").await.unwrap();
        assert_eq!(result.as_deref(), Some("El artículo 1 define..."));

        store.delete("answer:0").await.unwrap();
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_delete_and_exists() {
        let store = RedisAnswerStore::new(get_test_config()).await.unwrap();

        store.set("answer:1", "respuesta").await.unwrap();
        assert!(store.exists("answer:1").await.unwrap());

        assert!(store.delete("answer:1").await.unwrap());
        assert!(!store.exists("answer:1").await.unwrap());
        assert!(store.get("answer:1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unreachable_redis_still_creates_store() {
        let config = RedisAnswerStoreConfig::new("redis://127.0.0.1:1")
            .with_connection_timeout(Duration::from_millis(500));

        let started = std::time::Instant::now();
        let store = RedisAnswerStore::new(config).await.unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!store.is_connected().await);
        assert!(matches!(
            store.get("answer:0").await,
            Err(DomainError::AnswerStore { .. })
        ));
        assert!(store.set("answer:0", "respuesta").await.is_err());
        assert!(store.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_url_is_configuration_error() {
        let result = RedisAnswerStore::new(RedisAnswerStoreConfig::new("not a url")).await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_ping() {
        let store = RedisAnswerStore::new(get_test_config()).await.unwrap();

        store.ping().await.unwrap();
    }
}

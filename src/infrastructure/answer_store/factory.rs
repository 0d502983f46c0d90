//! Answer store factory for runtime selection

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::answer_store::AnswerStore;
use crate::domain::DomainError;

use super::in_memory::InMemoryAnswerStore;
use super::redis::{RedisAnswerStore, RedisAnswerStoreConfig};

/// Supported answer store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStoreBackend {
    /// In-memory store using moka
    InMemory,
    /// Redis store
    #[default]
    Redis,
}

impl std::fmt::Display for AnswerStoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerStoreBackend::InMemory => write!(f, "in_memory"),
            AnswerStoreBackend::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for AnswerStoreBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(AnswerStoreBackend::InMemory),
            "redis" => Ok(AnswerStoreBackend::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown answer store backend: {}. Valid backends: in_memory, redis",
                s
            ))),
        }
    }
}

/// `[answer_store]` configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnswerStoreConfig {
    pub backend: AnswerStoreBackend,
    /// Redis URL (used by the Redis backend)
    pub redis_url: String,
    /// Key prefix for namespacing
    pub key_prefix: Option<String>,
    /// Bound on each Redis connection attempt
    pub connect_timeout_ms: u64,
}

impl Default for AnswerStoreConfig {
    fn default() -> Self {
        Self {
            backend: AnswerStoreBackend::default(),
            redis_url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
            connect_timeout_ms: 2000,
        }
    }
}

impl AnswerStoreConfig {
    /// Configuration for the in-memory backend
    pub fn in_memory() -> Self {
        Self {
            backend: AnswerStoreBackend::InMemory,
            ..Default::default()
        }
    }

    /// Configuration for the Redis backend
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: AnswerStoreBackend::Redis,
            redis_url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }
}

/// Factory for creating answer stores
#[derive(Debug, Default)]
pub struct AnswerStoreFactory;

impl AnswerStoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates an answer store based on configuration
    pub async fn create(
        &self,
        config: &AnswerStoreConfig,
    ) -> Result<Arc<dyn AnswerStore>, DomainError> {
        match config.backend {
            AnswerStoreBackend::InMemory => Ok(Arc::new(InMemoryAnswerStore::new())),
            AnswerStoreBackend::Redis => {
                if config.redis_url.trim().is_empty() {
                    return Err(DomainError::configuration(
                        "Redis URL is required for the redis answer store backend",
                    ));
                }

                let mut redis_config = RedisAnswerStoreConfig::new(config.redis_url.clone())
                    .with_connection_timeout(Duration::from_millis(config.connect_timeout_ms));

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                let store = RedisAnswerStore::new(redis_config).await?;
                Ok(Arc::new(store))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!(
            "in_memory".parse::<AnswerStoreBackend>().unwrap(),
            AnswerStoreBackend::InMemory
        );
        assert_eq!(
            "REDIS".parse::<AnswerStoreBackend>().unwrap(),
            AnswerStoreBackend::Redis
        );
        assert!("memcached".parse::<AnswerStoreBackend>().is_err());
    }

    #[test]
    fn test_backend_display() {
        assert_eq!(AnswerStoreBackend::InMemory.to_string(), "in_memory");
        assert_eq!(AnswerStoreBackend::Redis.to_string(), "redis");
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: AnswerStoreConfig =
            serde_json::from_value(serde_json::json!({"backend": "in_memory"})).unwrap();

        assert_eq!(config.backend, AnswerStoreBackend::InMemory);
        assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
        assert!(config.key_prefix.is_none());
        assert_eq!(config.connect_timeout_ms, 2000);
    }

    #[tokio::test]
    async fn test_create_in_memory() {
        let store = AnswerStoreFactory::new()
            .create(&AnswerStoreConfig::in_memory())
            .await
            .unwrap();

        store.set("answer:0", "respuesta").await.unwrap();
        assert_eq!(store.backend(), "in_memory");
        assert_eq!(
            store.get("answer:0").await.unwrap().as_deref(),
            Some("respuesta")
        );
    }

    #[tokio::test]
    async fn test_create_redis_requires_url() {
        let result = AnswerStoreFactory::new()
            .create(&AnswerStoreConfig::redis("  "))
            .await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_create_redis_with_server_down() {
        let config = AnswerStoreConfig {
            connect_timeout_ms: 500,
            ..AnswerStoreConfig::redis("redis://127.0.0.1:1")
        };

        let store = AnswerStoreFactory::new().create(&config).await.unwrap();

        assert_eq!(store.backend(), "redis");
        assert!(store.ping().await.is_err());
        assert!(matches!(
            store.set("answer:0", "respuesta").await,
            Err(DomainError::AnswerStore { .. })
        ));
    }
}

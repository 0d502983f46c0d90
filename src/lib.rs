//! Ley 21.719 RAG Gateway
//!
//! HTTP assistant for Chile's personal data protection law with:
//! - A semantic answer cache keyed by prompt embeddings
//! - Ollama-served embedding and answer models
//! - Redis or in-memory answer storage
//! - File snapshots of the cache index

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use domain::Embedder;
use infrastructure::{
    answer_store::AnswerStoreFactory,
    embedding::OllamaEmbeddingProvider,
    llm::{HttpClient, OllamaAnswerProducer},
    project::InMemoryProjectRepository,
    semantic_cache::FileSnapshotStore,
    services::{AssistantService, SemanticAnswerCache},
};
use tracing::info;

/// Create the embedder described by configuration.
///
/// With the semantic cache enabled, the model must answer with the configured
/// dimension before the service starts.
pub async fn create_embedder(config: &AppConfig) -> anyhow::Result<Embedder> {
    let client = HttpClient::with_timeout(config.embedding.timeout())?;
    let provider = OllamaEmbeddingProvider::with_base_url(client, &config.embedding.base_url);
    let embedder = Embedder::new(
        Arc::new(provider),
        config.embedding.model.clone(),
        config.semantic_cache.dimensions,
    );

    if !config.semantic_cache.enabled {
        info!("Semantic cache disabled, skipping embedding model check");
        return Ok(embedder);
    }

    embedder.ensure_ready().await?;
    info!(
        model = %embedder.model(),
        dimensions = embedder.dimensions(),
        "Embedding model ready"
    );

    Ok(embedder)
}

/// Load the semantic cache from its file snapshot
pub async fn create_semantic_cache(config: &AppConfig) -> anyhow::Result<SemanticAnswerCache> {
    let embedder = create_embedder(config).await?;
    let answer_store = AnswerStoreFactory::new()
        .create(&config.answer_store)
        .await?;
    info!(backend = answer_store.backend(), "Answer store connected");

    let snapshots = Arc::new(FileSnapshotStore::from_config(&config.semantic_cache));
    let cache = SemanticAnswerCache::load(
        embedder,
        answer_store,
        snapshots,
        config.semantic_cache.clone(),
    )
    .await?;

    Ok(cache)
}

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache = Arc::new(create_semantic_cache(config).await?);

    let client = HttpClient::with_timeout(config.producer.timeout())?;
    let producer = OllamaAnswerProducer::with_base_url(
        client,
        config.producer.model.clone(),
        &config.producer.base_url,
    );
    info!(model = %config.producer.model, "Answer producer configured");

    let assistant = AssistantService::new(
        cache,
        Arc::new(producer),
        Arc::new(InMemoryProjectRepository::new()),
    );

    Ok(AppState::new(Arc::new(assistant)))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::domain::DomainError;
    use crate::infrastructure::answer_store::AnswerStoreConfig;

    const DIMS: usize = 4;

    async fn ollama_embedding_server() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/embed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "test-embed",
                "embeddings": [[0.5, 0.5, 0.5, 0.5]]
            })))
            .mount(&server)
            .await;
        server
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ley-rag-{}-{}", name, uuid::Uuid::new_v4()))
    }

    fn config(embedding_url: &str, dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.embedding.base_url = embedding_url.to_string();
        config.embedding.model = "test-embed".to_string();
        config.semantic_cache = config
            .semantic_cache
            .with_dimensions(DIMS)
            .with_paths(dir.join("cache.idx"), dir.join("cache_meta.json"));
        config.answer_store = AnswerStoreConfig {
            connect_timeout_ms: 500,
            ..AnswerStoreConfig::redis("redis://127.0.0.1:1")
        };
        config
    }

    #[tokio::test]
    async fn test_starts_with_redis_down() {
        let server = ollama_embedding_server().await;
        let dir = temp_dir("redis-down");
        let config = config(&server.uri(), &dir);

        let cache = create_semantic_cache(&config).await.unwrap();

        assert!(cache.lookup("¿Qué es un dato personal?").await.is_none());
        assert!(matches!(
            cache.store("¿Qué es un dato personal?", "respuesta").await,
            Err(DomainError::AnswerStore { .. })
        ));
        assert!(cache.is_empty().await);
        assert!(cache.lookup("¿Qué es un dato personal?").await.is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_app_state_with_redis_down() {
        let server = ollama_embedding_server().await;
        let dir = temp_dir("state-redis-down");

        let state = create_app_state_with_config(&config(&server.uri(), &dir))
            .await
            .unwrap();

        assert!(state.cache().answer_store().ping().await.is_err());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_embedding_model_down_is_fatal() {
        let dir = temp_dir("embedder-down");
        let config = config("http://127.0.0.1:1", &dir);

        assert!(create_semantic_cache(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_disabled_cache_skips_embedding_check() {
        let dir = temp_dir("disabled");
        let mut config = config("http://127.0.0.1:1", &dir);
        config.semantic_cache = config.semantic_cache.with_enabled(false);

        let cache = create_semantic_cache(&config).await.unwrap();

        assert!(!cache.is_enabled());
        assert!(cache.lookup("hola").await.is_none());
    }
}

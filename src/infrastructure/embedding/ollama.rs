//! Ollama embedding provider implementation

use async_trait::async_trait;
use serde::Deserialize;

use super::HttpClientTrait;
use crate::domain::embedding::{
    Embedding, EmbeddingInput, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse,
};
use crate::domain::DomainError;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Known Ollama embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("nomic-embed-text", 768),
    ("mxbai-embed-large", 1024),
    ("all-minilm", 384),
];

/// Ollama embedding provider
#[derive(Debug)]
pub struct OllamaEmbeddingProvider<C: HttpClientTrait> {
    client: C,
    base_url: String,
}

impl<C: HttpClientTrait> OllamaEmbeddingProvider<C> {
    /// Create a provider against the local Ollama daemon
    pub fn new(client: C) -> Self {
        Self::with_base_url(client, DEFAULT_OLLAMA_BASE_URL)
    }

    /// Create a new provider with custom base URL
    pub fn with_base_url(client: C, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self { client, base_url }
    }

    fn embed_url(&self) -> String {
        format!("{}/api/embed", self.base_url)
    }

    fn build_request(&self, request: &EmbeddingRequest) -> serde_json::Value {
        let input = match request.input() {
            EmbeddingInput::Single(s) => serde_json::json!(s),
            EmbeddingInput::Batch(v) => serde_json::json!(v),
        };

        serde_json::json!({
            "model": request.model(),
            "input": input,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<EmbeddingResponse, DomainError> {
        let response: OllamaEmbedResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("ollama", format!("Failed to parse embedding response: {}", e))
        })?;

        if response.embeddings.is_empty() {
            return Err(DomainError::provider("ollama", "Empty embeddings in response"));
        }

        let embeddings = response
            .embeddings
            .into_iter()
            .enumerate()
            .map(|(index, vector)| Embedding::new(index, vector))
            .collect();

        Ok(EmbeddingResponse::new(response.model, embeddings))
    }
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingProvider for OllamaEmbeddingProvider<C> {
    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, DomainError> {
        let url = self.embed_url();
        let body = self.build_request(&request);

        let response = self
            .client
            .post_json(&url, vec![("Content-Type", "application/json")], &body)
            .await?;

        self.parse_response(response)
    }

    fn provider_name(&self) -> &'static str {
        "ollama"
    }

    fn dimensions(&self, model: &str) -> Option<usize> {
        let name = model.split(':').next().unwrap_or(model);

        EMBEDDING_MODELS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, dims)| *dims)
    }
}

// Ollama API types for embeddings

#[derive(Debug, Deserialize)]
struct OllamaEmbedResponse {
    #[serde(default)]
    model: String,
    embeddings: Vec<Vec<f32>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;

    const URL: &str = "http://ollama:11434/api/embed";

    #[tokio::test]
    async fn test_embed_single() {
        let client = MockHttpClient::new().with_response(
            URL,
            serde_json::json!({
                "model": "nomic-embed-text",
                "embeddings": [[0.1, 0.2, 0.3]]
            }),
        );
        let provider = OllamaEmbeddingProvider::with_base_url(client, "http://ollama:11434/");

        let response = provider
            .embed(EmbeddingRequest::single("nomic-embed-text", "hola"))
            .await
            .unwrap();

        assert_eq!(response.model(), "nomic-embed-text");
        assert_eq!(response.embeddings().len(), 1);
        assert_eq!(response.embeddings()[0].vector(), &[0.1, 0.2, 0.3]);

        let requests = provider.client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(
            requests[0].1,
            serde_json::json!({"model": "nomic-embed-text", "input": "hola"})
        );
    }

    #[tokio::test]
    async fn test_embed_batch_indices() {
        let client = MockHttpClient::new().with_response(
            URL,
            serde_json::json!({"model": "m", "embeddings": [[1.0], [2.0]]}),
        );
        let provider = OllamaEmbeddingProvider::with_base_url(client, "http://ollama:11434");

        let response = provider
            .embed(EmbeddingRequest::batch("m", vec!["a".into(), "b".into()]))
            .await
            .unwrap();

        assert_eq!(response.embeddings()[1].index(), 1);
        assert_eq!(response.embeddings()[1].vector(), &[2.0]);
    }

    #[tokio::test]
    async fn test_empty_embeddings_is_error() {
        let client = MockHttpClient::new()
            .with_response(URL, serde_json::json!({"model": "m", "embeddings": []}));
        let provider = OllamaEmbeddingProvider::with_base_url(client, "http://ollama:11434");

        let result = provider.embed(EmbeddingRequest::single("m", "x")).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[tokio::test]
    async fn test_http_error_propagates() {
        let client = MockHttpClient::new().with_error(URL, "connection refused");
        let provider = OllamaEmbeddingProvider::with_base_url(client, "http://ollama:11434");

        let result = provider.embed(EmbeddingRequest::single("m", "x")).await;

        assert!(matches!(result, Err(DomainError::Provider { .. })));
    }

    #[test]
    fn test_known_dimensions() {
        let provider = OllamaEmbeddingProvider::new(MockHttpClient::new());

        assert_eq!(provider.dimensions("nomic-embed-text"), Some(768));
        assert_eq!(provider.dimensions("nomic-embed-text:latest"), Some(768));
        assert_eq!(provider.dimensions("custom-model"), None);
    }
}

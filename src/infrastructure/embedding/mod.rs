//! Embedding provider implementations

mod ollama;

pub use ollama::{OllamaEmbeddingProvider, DEFAULT_EMBEDDING_MODEL, DEFAULT_OLLAMA_BASE_URL};

// Re-export HTTP client for use by embedding providers
pub use super::llm::{HttpClient, HttpClientTrait};

//! Language model clients

pub mod http_client;
mod ollama;

pub use http_client::{HttpClient, HttpClientTrait};
pub use ollama::{OllamaAnswerProducer, DEFAULT_PRODUCER_MODEL};

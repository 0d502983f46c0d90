//! Embedding domain models and traits

mod embedder;
mod provider;
mod request;
mod response;

pub use embedder::{Embedder, PromptVector};
pub use provider::EmbeddingProvider;
pub use request::{EmbeddingInput, EmbeddingRequest};
pub use response::{inner_product, l2_normalize, Embedding, EmbeddingResponse};

#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;

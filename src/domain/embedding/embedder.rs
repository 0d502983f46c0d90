//! Deterministic prompt embedder producing unit-norm vectors

use std::sync::Arc;

use tracing::debug;

use super::{l2_normalize, EmbeddingProvider, EmbeddingRequest};
use crate::domain::DomainError;

/// Text used by the startup readiness check
const READINESS_TEXT: &str = "ley 21.719 protección de datos personales";

/// An L2-normalized prompt embedding of fixed dimension
#[derive(Debug, Clone, PartialEq)]
pub struct PromptVector(Vec<f32>);

impl PromptVector {
    /// Normalize a raw vector; fails for zero or non-finite norms
    pub fn from_raw(mut raw: Vec<f32>) -> Result<Self, DomainError> {
        if !l2_normalize(&mut raw) {
            return Err(DomainError::model_unavailable(
                "Embedding model returned a vector that cannot be normalized",
            ));
        }

        Ok(Self(raw))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.0
    }
}

/// Maps prompt text to a [`PromptVector`] through an embedding provider.
///
/// Every failure of the underlying model surfaces as
/// [`DomainError::ModelUnavailable`].
#[derive(Debug, Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    model: String,
    dimensions: usize,
}

impl Embedder {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            dimensions,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Embed a single text
    pub async fn embed(&self, text: &str) -> Result<PromptVector, DomainError> {
        let request = EmbeddingRequest::single(&self.model, text);
        let response = self.provider.embed(request).await.map_err(|e| {
            DomainError::model_unavailable(format!(
                "{} embedding failed: {}",
                self.provider.provider_name(),
                e
            ))
        })?;

        let embedding = response
            .into_first()
            .ok_or_else(|| DomainError::model_unavailable("No embedding returned"))?;

        if embedding.dimensions() != self.dimensions {
            return Err(DomainError::model_unavailable(format!(
                "Model '{}' returned {} dimensions, expected {}",
                self.model,
                embedding.dimensions(),
                self.dimensions
            )));
        }

        PromptVector::from_raw(embedding.into_vector())
    }

    /// Verify the model answers before serving requests
    pub async fn ensure_ready(&self) -> Result<(), DomainError> {
        if let Some(known) = self.provider.dimensions(&self.model) {
            if known != self.dimensions {
                return Err(DomainError::model_unavailable(format!(
                    "Model '{}' produces {} dimensions, configured for {}",
                    self.model, known, self.dimensions
                )));
            }
        }

        self.embed(READINESS_TEXT).await?;
        debug!(model = %self.model, dimensions = self.dimensions, "Embedder ready");

        Ok(())
    }
}

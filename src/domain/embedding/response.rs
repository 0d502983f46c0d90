//! Embedding response types and vector math

use serde::{Deserialize, Serialize};

/// A single embedding vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Embedding {
    /// Index of this embedding in the batch
    index: usize,
    /// The embedding vector
    embedding: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding
    pub fn new(index: usize, embedding: Vec<f32>) -> Self {
        Self { index, embedding }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Get the embedding vector
    pub fn vector(&self) -> &[f32] {
        &self.embedding
    }

    pub fn dimensions(&self) -> usize {
        self.embedding.len()
    }

    /// Consume and return the vector
    pub fn into_vector(self) -> Vec<f32> {
        self.embedding
    }
}

/// Inner product of two equal-length vectors.
///
/// For unit-norm inputs this equals cosine similarity. Mismatched or empty
/// inputs score 0.0.
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Scale a vector to unit Euclidean norm in place.
///
/// Returns `false` (leaving the vector untouched) when the norm is zero or not
/// finite.
pub fn l2_normalize(vector: &mut [f32]) -> bool {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm == 0.0 || !norm.is_finite() {
        return false;
    }

    for x in vector.iter_mut() {
        *x /= norm;
    }

    true
}

/// Response from an embedding request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingResponse {
    /// Model used
    model: String,
    /// Generated embeddings
    data: Vec<Embedding>,
}

impl EmbeddingResponse {
    pub fn new(model: String, data: Vec<Embedding>) -> Self {
        Self { model, data }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.data
    }

    /// Consume and return the first embedding (for single input requests)
    pub fn into_first(self) -> Option<Embedding> {
        self.data.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedding_creation() {
        let emb = Embedding::new(0, vec![0.1, 0.2, 0.3]);

        assert_eq!(emb.index(), 0);
        assert_eq!(emb.dimensions(), 3);
        assert_eq!(emb.vector(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_inner_product_identical_unit() {
        let a = vec![0.6, 0.8, 0.0];

        assert!((inner_product(&a, &a) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_inner_product_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];

        assert!(inner_product(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_inner_product_mismatched_lengths() {
        assert_eq!(inner_product(&[1.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(inner_product(&[], &[]), 0.0);
    }

    #[test]
    fn test_l2_normalize() {
        let mut v = vec![3.0, 4.0];

        assert!(l2_normalize(&mut v));
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let mut v = vec![0.0, 0.0, 0.0];

        assert!(!l2_normalize(&mut v));
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_into_first() {
        let response = EmbeddingResponse::new(
            "nomic-embed-text".into(),
            vec![Embedding::new(0, vec![1.0]), Embedding::new(1, vec![2.0])],
        );

        assert_eq!(response.model(), "nomic-embed-text");
        assert_eq!(response.embeddings().len(), 2);
        assert_eq!(response.into_first().unwrap().vector(), &[1.0]);
    }
}

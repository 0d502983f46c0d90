//! Semantic cache configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the semantic answer cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Whether semantic caching is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Similarity a stored prompt must strictly exceed to count as a hit
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Dimension of prompt vectors
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,

    /// Binary index snapshot location
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Metadata document location
    #[serde(default = "default_metadata_path")]
    pub metadata_path: PathBuf,
}

fn default_enabled() -> bool {
    true
}

fn default_similarity_threshold() -> f32 {
    0.85
}

fn default_dimensions() -> usize {
    768
}

fn default_index_path() -> PathBuf {
    PathBuf::from("semantic_cache.idx")
}

fn default_metadata_path() -> PathBuf {
    PathBuf::from("semantic_cache_meta.json")
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            similarity_threshold: default_similarity_threshold(),
            dimensions: default_dimensions(),
            index_path: default_index_path(),
            metadata_path: default_metadata_path(),
        }
    }
}

impl SemanticCacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Set both snapshot artifact paths
    pub fn with_paths(mut self, index: impl Into<PathBuf>, metadata: impl Into<PathBuf>) -> Self {
        self.index_path = index.into();
        self.metadata_path = metadata.into();
        self
    }

    /// Threshold actually applied, clamped into `[0.0, 1.0]`
    pub fn effective_threshold(&self) -> f32 {
        if self.similarity_threshold.is_nan() {
            return default_similarity_threshold();
        }

        self.similarity_threshold.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SemanticCacheConfig::default();

        assert!(config.enabled);
        assert!((config.similarity_threshold - 0.85).abs() < f32::EPSILON);
        assert_eq!(config.dimensions, 768);
        assert_eq!(config.index_path, PathBuf::from("semantic_cache.idx"));
        assert_eq!(config.metadata_path, PathBuf::from("semantic_cache_meta.json"));
    }

    #[test]
    fn test_config_builder() {
        let config = SemanticCacheConfig::new()
            .with_enabled(false)
            .with_similarity_threshold(0.9)
            .with_dimensions(384)
            .with_paths("/tmp/a.idx", "/tmp/a.json");

        assert!(!config.enabled);
        assert!((config.similarity_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.dimensions, 384);
        assert_eq!(config.index_path, PathBuf::from("/tmp/a.idx"));
        assert_eq!(config.metadata_path, PathBuf::from("/tmp/a.json"));
    }

    #[test]
    fn test_similarity_threshold_clamped() {
        let config = SemanticCacheConfig::new().with_similarity_threshold(1.5);
        assert!((config.similarity_threshold - 1.0).abs() < f32::EPSILON);

        let config = SemanticCacheConfig::new().with_similarity_threshold(-0.5);
        assert!(config.similarity_threshold.abs() < f32::EPSILON);
    }

    #[test]
    fn test_effective_threshold_from_deserialized_value() {
        let config: SemanticCacheConfig =
            serde_json::from_str(r#"{"similarity_threshold": 3.0}"#).unwrap();

        assert_eq!(config.effective_threshold(), 1.0);
        assert_eq!(config.dimensions, 768);
    }
}

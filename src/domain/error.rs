use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Embedding model unavailable: {message}")]
    ModelUnavailable { message: String },

    #[error("Semantic index corrupt: {message}")]
    IndexCorrupt { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("Answer store error: {message}")]
    AnswerStore { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn model_unavailable(message: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            message: message.into(),
        }
    }

    pub fn index_corrupt(message: impl Into<String>) -> Self {
        Self::IndexCorrupt {
            message: message.into(),
        }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn answer_store(message: impl Into<String>) -> Self {
        Self::AnswerStore {
            message: message.into(),
        }
    }

    /// Errors that must stop the process at startup
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            Self::ModelUnavailable { .. } | Self::IndexCorrupt { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Project 'p-1' not found");
        assert_eq!(error.to_string(), "Not found: Project 'p-1' not found");
    }

    #[test]
    fn test_index_corrupt_error() {
        let error = DomainError::index_corrupt("3 prompts, 2 keys, 3 vectors");
        assert_eq!(
            error.to_string(),
            "Semantic index corrupt: 3 prompts, 2 keys, 3 vectors"
        );
    }

    #[test]
    fn test_fatal_at_startup() {
        assert!(DomainError::model_unavailable("connection refused").is_fatal_at_startup());
        assert!(DomainError::index_corrupt("mismatch").is_fatal_at_startup());
        assert!(!DomainError::persistence("disk full").is_fatal_at_startup());
        assert!(!DomainError::answer_store("timeout").is_fatal_at_startup());
    }
}

//! Answer producer trait

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// Text produced by the language model for a prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
}

impl Answer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Produces answers for prompts the cache could not serve
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AnswerProducer: Send + Sync + Debug {
    /// Generates an answer for the given prompt
    async fn invoke(&self, prompt: &str) -> Result<Answer, DomainError>;

    /// Model identifier used for logs
    fn model(&self) -> String;
}

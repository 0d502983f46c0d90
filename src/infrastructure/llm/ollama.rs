//! Ollama answer producer

use std::time::Instant;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::assistant::{Answer, AnswerProducer};
use crate::domain::DomainError;

const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434";

/// Default generation model
pub const DEFAULT_PRODUCER_MODEL: &str = "mistral:7b";

/// Answer producer backed by Ollama's generate endpoint
#[derive(Debug)]
pub struct OllamaAnswerProducer<C: HttpClientTrait> {
    client: C,
    model: String,
    base_url: String,
}

impl<C: HttpClientTrait> OllamaAnswerProducer<C> {
    pub fn new(client: C, model: impl Into<String>) -> Self {
        Self::with_base_url(client, model, DEFAULT_OLLAMA_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client,
            model: model.into(),
            base_url,
        }
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    fn build_request(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
        })
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<Answer, DomainError> {
        let response: OllamaGenerateResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("ollama", format!("Failed to parse generate response: {}", e))
        })?;

        let text = response.response.trim();
        if text.is_empty() {
            return Err(DomainError::provider(
                "ollama",
                format!("Model '{}' returned an empty answer", self.model),
            ));
        }

        Ok(Answer::new(text))
    }
}

#[async_trait]
impl<C: HttpClientTrait> AnswerProducer for OllamaAnswerProducer<C> {
    async fn invoke(&self, prompt: &str) -> Result<Answer, DomainError> {
        let started = Instant::now();
        let body = self.build_request(prompt);

        let response = self
            .client
            .post_json(
                &self.generate_url(),
                vec![("Content-Type", "application/json")],
                &body,
            )
            .await?;

        let answer = self.parse_response(response)?;
        debug!(
            model = %self.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            answer_chars = answer.text.chars().count(),
            "Answer produced"
        );

        Ok(answer)
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

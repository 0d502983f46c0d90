//! Request and response bodies for the assistant endpoints

use serde::{Deserialize, Serialize};

use crate::domain::{AssistantAnswer, SemanticCacheStats};

/// `POST /chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    /// `dev` or `general`
    #[serde(default = "default_user_type")]
    pub user_type: String,
}

fn default_user_type() -> String {
    "general".to_string()
}

/// `POST /evaluate`
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluateRequest {
    pub id: String,
    pub description: String,
}

/// `POST /project_chat`
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectChatRequest {
    pub project_id: String,
    pub message: String,
}

/// Answer body shared by all assistant endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub cached: bool,
}

impl From<AssistantAnswer> for AnswerResponse {
    fn from(answer: AssistantAnswer) -> Self {
        Self {
            answer: answer.answer,
            cached: answer.cached,
        }
    }
}

/// `GET /cache/stats`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStatsResponse {
    pub enabled: bool,
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f32,
    pub answer_store_misses: u64,
    pub persistence_failures: u64,
    pub similarity_threshold: f32,
    pub dirty: bool,
}

impl CacheStatsResponse {
    pub fn new(enabled: bool, stats: SemanticCacheStats) -> Self {
        Self {
            enabled,
            entries: stats.total_entries,
            hits: stats.hits,
            misses: stats.misses,
            hit_rate: stats.hit_rate(),
            answer_store_misses: stats.answer_store_misses,
            persistence_failures: stats.persistence_failures,
            similarity_threshold: stats.similarity_threshold,
            dirty: stats.dirty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_defaults_to_general() {
        let request: ChatRequest =
            serde_json::from_value(serde_json::json!({"message": "hola"})).unwrap();

        assert_eq!(request.user_type, "general");
    }

    #[test]
    fn test_answer_response_shape() {
        let response = AnswerResponse::from(AssistantAnswer::cached("respuesta", 0.93));

        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({"answer": "respuesta", "cached": true})
        );
    }
}

//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::{AssistantService, SemanticAnswerCache};

/// Application state shared by all handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub assistant: Arc<AssistantService>,
}

impl AppState {
    pub fn new(assistant: Arc<AssistantService>) -> Self {
        Self { assistant }
    }

    pub fn cache(&self) -> &Arc<SemanticAnswerCache> {
        self.assistant.cache()
    }
}

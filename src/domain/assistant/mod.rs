//! Legal assistant domain - prompts and answer production

mod producer;
mod prompt;

pub use producer::{Answer, AnswerProducer};
#[cfg(test)]
pub use producer::MockAnswerProducer;
pub use prompt::{build_chat_prompt, build_evaluation_prompt, build_project_chat_prompt, Audience};

/// Answer returned to a caller, with its cache provenance
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantAnswer {
    pub answer: String,
    pub cached: bool,
    /// Similarity of the matched prompt on a cache hit
    pub similarity: Option<f32>,
}

impl AssistantAnswer {
    pub fn produced(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            cached: false,
            similarity: None,
        }
    }

    pub fn cached(answer: impl Into<String>, similarity: f32) -> Self {
        Self {
            answer: answer.into(),
            cached: true,
            similarity: Some(similarity),
        }
    }
}

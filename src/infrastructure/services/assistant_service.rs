//! Legal assistant service
//!
//! Builds prompts for chat, evaluation and project follow-up requests and
//! answers them through the semantic cache, falling back to the answer
//! producer on a miss.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::SemanticAnswerCache;
use crate::domain::assistant::{
    build_chat_prompt, build_evaluation_prompt, build_project_chat_prompt, AnswerProducer,
    AssistantAnswer, Audience,
};
use crate::domain::{DomainError, ProjectRepository};
use crate::infrastructure::observability::record_answer_produced;

/// Answers legal questions about Ley 21.719
#[derive(Debug)]
pub struct AssistantService {
    cache: Arc<SemanticAnswerCache>,
    producer: Arc<dyn AnswerProducer>,
    projects: Arc<dyn ProjectRepository>,
}

impl AssistantService {
    pub fn new(
        cache: Arc<SemanticAnswerCache>,
        producer: Arc<dyn AnswerProducer>,
        projects: Arc<dyn ProjectRepository>,
    ) -> Self {
        Self {
            cache,
            producer,
            projects,
        }
    }

    pub fn cache(&self) -> &Arc<SemanticAnswerCache> {
        &self.cache
    }

    pub fn projects(&self) -> &Arc<dyn ProjectRepository> {
        &self.projects
    }

    /// Answer `prompt`, using `cache_text` as the similarity key.
    ///
    /// Producer failures propagate. Failures to cache the produced answer are
    /// logged and do not affect the response.
    pub async fn answer(
        &self,
        cache_text: &str,
        prompt: &str,
    ) -> Result<AssistantAnswer, DomainError> {
        if let Some(hit) = self.cache.lookup(cache_text).await {
            info!(similarity = hit.similarity, key = %hit.key, "Cache hit");
            return Ok(AssistantAnswer::cached(hit.text, hit.similarity));
        }

        debug!("Cache miss, invoking answer producer");
        let started = Instant::now();
        let result = self.producer.invoke(prompt).await;
        record_answer_produced(&self.producer.model(), result.is_ok(), started.elapsed());

        let answer = result?.into_text();

        if let Err(e) = self.cache.store(cache_text, &answer).await {
            warn!(error = %e, "Failed to cache produced answer");
        }

        Ok(AssistantAnswer::produced(answer))
    }

    /// Free-form question framed for the given audience.
    ///
    /// The raw message is the cache key, so the same question asked by a
    /// developer and by a general user shares one cache entry.
    pub async fn chat(
        &self,
        message: &str,
        audience: Audience,
    ) -> Result<AssistantAnswer, DomainError> {
        require_non_empty("message", message)?;

        let prompt = build_chat_prompt(audience, message);
        self.answer(message, &prompt).await
    }

    /// Compliance evaluation of a project, saved as the project's evaluation
    pub async fn evaluate(
        &self,
        project_id: &str,
        description: &str,
    ) -> Result<AssistantAnswer, DomainError> {
        require_non_empty("id", project_id)?;
        require_non_empty("description", description)?;

        let prompt = build_evaluation_prompt(description);
        let answer = self.answer(&prompt, &prompt).await?;

        self.projects
            .upsert(project_id, description, &answer.answer)
            .await?;
        info!(project_id = %project_id, cached = answer.cached, "Project evaluated");

        Ok(answer)
    }

    /// Follow-up question about a previously evaluated project
    pub async fn project_chat(
        &self,
        project_id: &str,
        message: &str,
    ) -> Result<AssistantAnswer, DomainError> {
        require_non_empty("project_id", project_id)?;
        require_non_empty("message", message)?;

        let project = self
            .projects
            .get(project_id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Project '{}' not found", project_id)))?;

        let prompt = build_project_chat_prompt(
            project.description(),
            project.evaluation().unwrap_or_default(),
            message,
        );

        self.answer(&prompt, &prompt).await
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!(
            "Field '{}' must not be empty",
            field
        )));
    }

    Ok(())
}

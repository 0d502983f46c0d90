//! Project entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// A project submitted for compliance evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    id: String,
    description: String,
    evaluation: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a project without an evaluation yet
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let description = description.into();

        if id.trim().is_empty() {
            return Err(DomainError::validation("Project id must not be empty"));
        }
        if description.trim().is_empty() {
            return Err(DomainError::validation(
                "Project description must not be empty",
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            description,
            evaluation: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_evaluation(mut self, evaluation: impl Into<String>) -> Self {
        self.evaluation = Some(evaluation.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn evaluation(&self) -> Option<&str> {
        self.evaluation.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace description and evaluation, keeping the creation time
    pub fn revise(&mut self, description: impl Into<String>, evaluation: impl Into<String>) {
        self.description = description.into();
        self.evaluation = Some(evaluation.into());
        self.updated_at = Utc::now();
    }
}

//! In-memory project repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::{DomainError, Project, ProjectRepository};

/// In-memory implementation of ProjectRepository.
///
/// Projects live for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryProjectRepository {
    projects: RwLock<HashMap<String, Project>>,
}

impl InMemoryProjectRepository {
    /// Creates a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn get(&self, id: &str) -> Result<Option<Project>, DomainError> {
        let projects = self
            .projects
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(projects.get(id).cloned())
    }

    async fn upsert(
        &self,
        id: &str,
        description: &str,
        evaluation: &str,
    ) -> Result<Project, DomainError> {
        let mut projects = self
            .projects
            .write()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        let project = match projects.get_mut(id) {
            Some(existing) => {
                existing.revise(description, evaluation);
                existing.clone()
            }
            None => {
                let project = Project::new(id, description)?.with_evaluation(evaluation);
                projects.insert(id.to_string(), project.clone());
                project
            }
        };

        Ok(project)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let projects = self
            .projects
            .read()
            .map_err(|_| DomainError::internal("Failed to acquire lock"))?;

        Ok(projects.len())
    }
}

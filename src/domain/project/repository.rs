//! Project repository trait

use async_trait::async_trait;

use super::Project;
use crate::domain::DomainError;

/// Repository trait for project persistence
#[async_trait]
pub trait ProjectRepository: Send + Sync + std::fmt::Debug {
    /// Get a project by ID
    async fn get(&self, id: &str) -> Result<Option<Project>, DomainError>;

    /// Insert or replace a project's description and evaluation
    async fn upsert(
        &self,
        id: &str,
        description: &str,
        evaluation: &str,
    ) -> Result<Project, DomainError>;

    /// Number of stored projects
    async fn count(&self) -> Result<usize, DomainError>;
}

//! Project items service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::project_item::{ProjectItemsResponse, ReplaceProjectItems},
    repository::Repository,
};

#[derive(Clone)]
pub struct ProjectItemsService {
    repository: Repository,
}

impl ProjectItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get(&self, project_id: i32) -> AppResult<ProjectItemsResponse> {
        self.repository.projects.get_by_id(project_id).await?;
        let items = self.repository.project_items.list_for_project(project_id).await?;
        Ok(ProjectItemsResponse { project_id, items })
    }

    /// Replace the full item list, then return the summed view
    pub async fn replace(
        &self,
        project_id: i32,
        data: &ReplaceProjectItems,
    ) -> AppResult<ProjectItemsResponse> {
        data.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.repository.projects.get_by_id(project_id).await?;
        self.repository
            .project_items
            .replace(project_id, &data.items)
            .await?;
        tracing::info!(project_id, lines = data.items.len(), "project items replaced");
        self.get(project_id).await
    }
}

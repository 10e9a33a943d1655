//! Projects service

use crate::{
    error::AppResult,
    models::project::{Project, SaveProject},
    repository::Repository,
};

#[derive(Clone)]
pub struct ProjectsService {
    repository: Repository,
}

impl ProjectsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Project>> {
        self.repository.projects.list().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Project> {
        self.repository.projects.get_by_id(id).await
    }

    pub async fn create(&self, data: SaveProject) -> AppResult<Project> {
        let fields = data.into_fields()?;
        let project = self.repository.projects.create(&fields).await?;
        tracing::info!(project_id = project.id, status = %project.status, "project created");
        Ok(project)
    }

    /// Full replace of the project's editable fields
    pub async fn update(&self, id: i32, data: SaveProject) -> AppResult<Project> {
        let fields = data.into_fields()?;
        self.repository.projects.update(id, &fields).await
    }
}

//! Business logic services

pub mod calendar;
pub mod equipment;
pub mod project_items;
pub mod projects;
pub mod remote;
pub mod shortages;

use std::sync::Arc;

use crate::{config::AppConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub projects: projects::ProjectsService,
    pub equipment: equipment::EquipmentService,
    pub project_items: project_items::ProjectItemsService,
    pub shortages: shortages::ShortagesService,
    pub calendar: calendar::CalendarService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let shortages =
            shortages::ShortagesService::new(repository.clone(), config.shortages.policy());

        let source: Arc<dyn calendar::CalendarSource> = match &config.calendar.remote_base_url {
            Some(base_url) => {
                tracing::info!(%base_url, "calendar reads from remote warehouse server");
                Arc::new(remote::RemoteCalendarSource::new(
                    base_url,
                    config.calendar.remote_token.clone(),
                )?)
            }
            None => Arc::new(calendar::LocalCalendarSource::new(
                repository.clone(),
                shortages.clone(),
            )),
        };

        Ok(Self {
            projects: projects::ProjectsService::new(repository.clone()),
            equipment: equipment::EquipmentService::new(repository.clone()),
            project_items: project_items::ProjectItemsService::new(repository.clone()),
            shortages,
            calendar: calendar::CalendarService::new(source, &config.calendar)?,
            repository,
        })
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}

//! Repository layer for database operations

pub mod equipment;
pub mod project_items;
pub mod projects;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub projects: projects::ProjectsRepository,
    pub equipment: equipment::EquipmentRepository,
    pub project_items: project_items::ProjectItemsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            projects: projects::ProjectsRepository::new(pool.clone()),
            equipment: equipment::EquipmentRepository::new(pool.clone()),
            project_items: project_items::ProjectItemsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Cheap round-trip used by the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

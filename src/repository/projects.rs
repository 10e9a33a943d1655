//! Projects repository

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::project::{Project, ProjectFields},
};

const COLUMNS: &str = "id, title, client_name, venue, person_in_charge, status, shipping_type, \
                       shipping_date, usage_start, usage_end, arrival_date, color_key, created_at";

#[derive(Clone)]
pub struct ProjectsRepository {
    pool: Pool<Postgres>,
}

impl ProjectsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List every project by usage start
    pub async fn list(&self) -> AppResult<Vec<Project>> {
        self.list_overlapping(None, None).await
    }

    /// Projects whose usage window overlaps `[from, to)`; an open bound is unbounded
    pub async fn list_overlapping(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<Vec<Project>> {
        let mut conditions = Vec::new();
        let mut idx = 1;

        if from.is_some() {
            conditions.push(format!("usage_end > ${}", idx));
            idx += 1;
        }
        if to.is_some() {
            conditions.push(format!("usage_start < ${}", idx));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {} FROM projects {} ORDER BY usage_start, id",
            COLUMNS, where_clause
        );
        let mut builder = sqlx::query_as::<_, Project>(&query);
        if let Some(from) = from {
            builder = builder.bind(from);
        }
        if let Some(to) = to {
            builder = builder.bind(to);
        }

        let rows = builder.fetch_all(&self.pool).await?;
        Ok(rows)
    }

    /// Get project by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Project> {
        let query = format!("SELECT {} FROM projects WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
    }

    /// Create a project
    pub async fn create(&self, data: &ProjectFields) -> AppResult<Project> {
        let query = format!(
            r#"
            INSERT INTO projects (
                title, client_name, venue, person_in_charge, status,
                shipping_type, shipping_date, usage_start, usage_end, color_key
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {}
            "#,
            COLUMNS
        );
        let row = sqlx::query_as::<_, Project>(&query)
            .bind(&data.title)
            .bind(&data.client_name)
            .bind(&data.venue)
            .bind(&data.person_in_charge)
            .bind(data.status)
            .bind(data.shipping_type)
            .bind(data.shipping_date)
            .bind(data.usage_start)
            .bind(data.usage_end)
            .bind(data.color_key)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Replace every editable field of a project
    pub async fn update(&self, id: i32, data: &ProjectFields) -> AppResult<Project> {
        let query = format!(
            r#"
            UPDATE projects SET
                title = $1, client_name = $2, venue = $3, person_in_charge = $4, status = $5,
                shipping_type = $6, shipping_date = $7, usage_start = $8, usage_end = $9,
                color_key = $10
            WHERE id = $11
            RETURNING {}
            "#,
            COLUMNS
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&data.title)
            .bind(&data.client_name)
            .bind(&data.venue)
            .bind(&data.person_in_charge)
            .bind(data.status)
            .bind(data.shipping_type)
            .bind(data.shipping_date)
            .bind(data.usage_start)
            .bind(data.usage_end)
            .bind(data.color_key)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project {} not found", id)))
    }
}

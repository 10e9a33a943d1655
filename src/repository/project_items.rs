//! Project items (demand lines) repository

use std::collections::{BTreeMap, HashMap};

use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::project_item::{ProjectItem, ProjectItemLine},
};

#[derive(Debug, FromRow)]
struct DemandRow {
    project_id: i32,
    equipment_id: i32,
    quantity: i32,
}

#[derive(Clone)]
pub struct ProjectItemsRepository {
    pool: Pool<Postgres>,
}

impl ProjectItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Items of one project, duplicate equipment lines summed
    pub async fn list_for_project(&self, project_id: i32) -> AppResult<Vec<ProjectItem>> {
        let rows = sqlx::query_as::<_, ProjectItem>(
            r#"
            SELECT equipment_id, SUM(quantity)::int4 AS quantity
            FROM project_items
            WHERE project_id = $1
            GROUP BY equipment_id
            ORDER BY equipment_id
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Replace the whole item list of a project atomically
    pub async fn replace(&self, project_id: i32, lines: &[ProjectItemLine]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_items WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO project_items (project_id, equipment_id, quantity) VALUES ($1, $2, $3)",
            )
            .bind(project_id)
            .bind(line.equipment_id)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                if matches!(&e, sqlx::Error::Database(db) if db.is_foreign_key_violation()) {
                    AppError::Reference(format!("Equipment {} does not exist", line.equipment_id))
                } else {
                    AppError::Database(e)
                }
            })?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Summed demand per equipment for each of the given projects.
    /// Projects without items get an empty map.
    pub async fn demand_for_projects(
        &self,
        project_ids: &[i32],
    ) -> AppResult<HashMap<i32, BTreeMap<i32, i32>>> {
        let mut demand: HashMap<i32, BTreeMap<i32, i32>> = project_ids
            .iter()
            .map(|id| (*id, BTreeMap::new()))
            .collect();
        if project_ids.is_empty() {
            return Ok(demand);
        }

        let rows = sqlx::query_as::<_, DemandRow>(
            r#"
            SELECT project_id, equipment_id, SUM(quantity)::int4 AS quantity
            FROM project_items
            WHERE project_id = ANY($1)
            GROUP BY project_id, equipment_id
            "#,
        )
        .bind(project_ids)
        .fetch_all(&self.pool)
        .await?;

        for row in rows {
            demand
                .entry(row.project_id)
                .or_default()
                .insert(row.equipment_id, row.quantity);
        }
        Ok(demand)
    }
}

//! Equipment repository

use std::collections::BTreeMap;

use sqlx::{Pool, Postgres};

use crate::{
    engine::EquipmentStock,
    error::{AppError, AppResult},
    models::equipment::{CreateEquipment, Equipment},
};

const COLUMNS: &str = "id, name, total_quantity, current_quantity, created_at";

#[derive(Clone)]
pub struct EquipmentRepository {
    pool: Pool<Postgres>,
}

impl EquipmentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all equipment
    pub async fn list(&self) -> AppResult<Vec<Equipment>> {
        let query = format!("SELECT {} FROM equipment ORDER BY name, id", COLUMNS);
        let rows = sqlx::query_as::<_, Equipment>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Get equipment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Equipment> {
        let query = format!("SELECT {} FROM equipment WHERE id = $1", COLUMNS);
        sqlx::query_as::<_, Equipment>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Equipment {} not found", id)))
    }

    /// Create equipment; a new piece starts fully checked in
    pub async fn create(&self, data: &CreateEquipment) -> AppResult<Equipment> {
        let query = format!(
            "INSERT INTO equipment (name, total_quantity, current_quantity) \
             VALUES ($1, $2, $2) RETURNING {}",
            COLUMNS
        );
        let row = sqlx::query_as::<_, Equipment>(&query)
            .bind(data.name.trim())
            .bind(data.total_quantity)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    /// Stock of the given equipment, keyed by id. Unknown ids are simply absent.
    pub async fn stock_for(&self, ids: &[i32]) -> AppResult<BTreeMap<i32, EquipmentStock>> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let query = format!("SELECT {} FROM equipment WHERE id = ANY($1)", COLUMNS);
        let rows = sqlx::query_as::<_, Equipment>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|e| {
                (
                    e.id,
                    EquipmentStock {
                        name: e.name,
                        total_quantity: e.total_quantity,
                    },
                )
            })
            .collect())
    }
}

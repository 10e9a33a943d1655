//! Equipment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Equipment record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Equipment {
    pub id: i32,
    /// Equipment name
    pub name: String,
    /// Units owned; the ceiling for overlapping demand
    pub total_quantity: i32,
    /// Units currently checked in at the warehouse
    pub current_quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Create equipment request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEquipment {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 0, message = "total_quantity must be >= 0"))]
    pub total_quantity: i32,
}

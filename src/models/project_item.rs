//! Project item (demand line) models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Summed demand of one project for one piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ProjectItem {
    pub equipment_id: i32,
    pub quantity: i32,
}

/// One line of a replace request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ProjectItemLine {
    pub equipment_id: i32,
    #[validate(range(min = 1, message = "quantity must be >= 1"))]
    pub quantity: i32,
}

/// Replace the full item list of a project
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplaceProjectItems {
    #[validate(nested)]
    pub items: Vec<ProjectItemLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProjectItemsResponse {
    pub project_id: i32,
    pub items: Vec<ProjectItem>,
}

//! Shortage report models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    engine::clock::parse_instant,
    error::{AppError, AppResult},
};

/// One piece of equipment a project is short on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortageDetail {
    pub equipment_id: i32,
    pub name: String,
    /// Units owned
    pub total_quantity: i32,
    /// Summed demand of every booking overlapping this one
    pub max_overlapping_demand: i64,
}

/// Shortage status of one project
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectShortage {
    pub project_id: i32,
    /// True when `shortage_details` is non-empty
    pub shortage: bool,
    #[serde(default)]
    pub shortage_details: Vec<ShortageDetail>,
}

impl ProjectShortage {
    pub fn new(project_id: i32, shortage_details: Vec<ShortageDetail>) -> Self {
        Self {
            project_id,
            shortage: !shortage_details.is_empty(),
            shortage_details,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ShortagesResponse {
    pub projects: Vec<ProjectShortage>,
}

/// Query parameters for shortages
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ShortageQuery {
    /// Only projects whose window ends after this instant
    pub from: Option<String>,
    /// Only projects whose window starts before this instant
    pub to: Option<String>,
    /// Report a single project instead of a range
    pub project_id: Option<i32>,
}

impl ShortageQuery {
    /// Resolve the query into a scope. `project_id` takes precedence over a range.
    pub fn scope(&self) -> AppResult<ShortageScope> {
        if let Some(id) = self.project_id {
            return Ok(ShortageScope::Project(id));
        }
        let from = self.from.as_deref().map(parse_instant).transpose()?;
        let to = self.to.as_deref().map(parse_instant).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if to <= from {
                return Err(AppError::Validation("to must be after from".to_string()));
            }
        }
        Ok(ShortageScope::Range { from, to })
    }
}

/// Parsed selection of projects to report on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortageScope {
    Range {
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    Project(i32),
}

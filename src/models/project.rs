//! Project (booking) model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::{engine::clock::parse_instant, error::AppError};

/// Booking lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Confirmed,
    Cancelled,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Confirmed => "confirmed",
            ProjectStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProjectStatus::Draft),
            "confirmed" => Ok(ProjectStatus::Confirmed),
            "cancelled" => Ok(ProjectStatus::Cancelled),
            _ => Err(format!("Invalid project status: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for ProjectStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ProjectStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ProjectStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// How the equipment travels to the venue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ShippingType {
    Near,
    Far,
    Carry,
}

impl ShippingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShippingType::Near => "near",
            ShippingType::Far => "far",
            ShippingType::Carry => "carry",
        }
    }
}

impl std::str::FromStr for ShippingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "near" => Ok(ShippingType::Near),
            "far" => Ok(ShippingType::Far),
            "carry" => Ok(ShippingType::Carry),
            _ => Err(format!("Invalid shipping type: {}", s)),
        }
    }
}

impl sqlx::Type<Postgres> for ShippingType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for ShippingType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for ShippingType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <String as Encode<Postgres>>::encode(self.as_str().to_string(), buf)
    }
}

/// Project record.
///
/// Also the read-side shape of the booking source: older clients send
/// `usage_start_at`/`usage_end_at`, which are folded into the canonical
/// fields here and nowhere else.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Project {
    pub id: i32,
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub venue: Option<String>,
    pub person_in_charge: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    pub shipping_type: Option<ShippingType>,
    pub shipping_date: Option<NaiveDate>,
    /// Usage window start (timezone-qualified)
    #[serde(alias = "usage_start_at", alias = "usageStart")]
    pub usage_start: DateTime<Utc>,
    /// Usage window end, strictly after the start
    #[serde(alias = "usage_end_at", alias = "usageEnd")]
    pub usage_end: DateTime<Utc>,
    pub arrival_date: Option<NaiveDate>,
    /// Calendar color tag (1-12)
    pub color_key: Option<i16>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn display_title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| "(no title)".to_string())
    }

    /// Reject a record whose usage window is empty or reversed
    pub fn check_window(&self) -> Result<(), AppError> {
        if self.usage_end <= self.usage_start {
            return Err(AppError::Validation(format!(
                "Project {}: usage_end must be after usage_start",
                self.id
            )));
        }
        Ok(())
    }
}

/// Create or replace project request
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct SaveProject {
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub venue: Option<String>,
    pub person_in_charge: Option<String>,
    /// Defaults to draft
    pub status: Option<ProjectStatus>,
    pub shipping_type: Option<ShippingType>,
    pub shipping_date: Option<NaiveDate>,
    /// ISO-8601 instant with timezone, e.g. 2026-02-19T10:00:00+09:00
    #[serde(alias = "usage_start_at", alias = "usageStart")]
    pub usage_start: Option<String>,
    #[serde(alias = "usage_end_at", alias = "usageEnd")]
    pub usage_end: Option<String>,
    #[validate(range(min = 1, max = 12, message = "color_key must be between 1 and 12"))]
    pub color_key: Option<i16>,
}

/// Validated project fields, ready to persist
#[derive(Debug, Clone)]
pub struct ProjectFields {
    pub title: Option<String>,
    pub client_name: Option<String>,
    pub venue: Option<String>,
    pub person_in_charge: Option<String>,
    pub status: ProjectStatus,
    pub shipping_type: Option<ShippingType>,
    pub shipping_date: Option<NaiveDate>,
    pub usage_start: DateTime<Utc>,
    pub usage_end: DateTime<Utc>,
    pub color_key: Option<i16>,
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl SaveProject {
    /// Validate the request and normalize it into storable fields
    pub fn into_fields(self) -> Result<ProjectFields, AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let (Some(start), Some(end)) = (self.usage_start.as_deref(), self.usage_end.as_deref())
        else {
            return Err(AppError::Validation(
                "usage_start and usage_end are required".to_string(),
            ));
        };
        let usage_start = parse_instant(start)?;
        let usage_end = parse_instant(end)?;
        if usage_end <= usage_start {
            return Err(AppError::Validation(
                "usage_end must be after usage_start".to_string(),
            ));
        }

        Ok(ProjectFields {
            title: normalize_text(self.title),
            client_name: normalize_text(self.client_name),
            venue: normalize_text(self.venue),
            person_in_charge: normalize_text(self.person_in_charge),
            status: self.status.unwrap_or_default(),
            shipping_type: self.shipping_type,
            shipping_date: self.shipping_date,
            usage_start,
            usage_end,
            color_key: self.color_key,
        })
    }
}

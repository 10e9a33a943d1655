//! Shortages API endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::shortage::{ShortageQuery, ShortagesResponse},
};

use super::AuthenticatedUser;

/// Shortage status of projects in a range, or of a single project
#[utoipa::path(
    get,
    path = "/shortages",
    tag = "shortages",
    security(("bearer_auth" = [])),
    params(ShortageQuery),
    responses(
        (status = 200, description = "Shortage report", body = ShortagesResponse),
        (status = 400, description = "Malformed instant", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Demand for unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_shortages(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<ShortageQuery>,
) -> AppResult<Json<ShortagesResponse>> {
    let scope = query.scope()?;
    let projects = state.services.shortages.report(scope).await?;
    Ok(Json(ShortagesResponse { projects }))
}

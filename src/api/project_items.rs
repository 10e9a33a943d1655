//! Project items API endpoints

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::AppResult,
    models::project_item::{ProjectItemsResponse, ReplaceProjectItems},
};

use super::AuthenticatedUser;

/// Get a project's items, duplicate equipment lines summed
#[utoipa::path(
    get,
    path = "/projects/{id}/items",
    tag = "projects",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project items", body = ProjectItemsResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_project_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ProjectItemsResponse>> {
    let items = state.services.project_items.get(id).await?;
    Ok(Json(items))
}

/// Replace a project's items
#[utoipa::path(
    put,
    path = "/projects/{id}/items",
    tag = "projects",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Project ID")),
    request_body = ReplaceProjectItems,
    responses(
        (status = 200, description = "Items replaced", body = ProjectItemsResponse),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 404, description = "Project not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Unknown equipment", body = crate::error::ErrorResponse)
    )
)]
pub async fn replace_project_items(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(data): Json<ReplaceProjectItems>,
) -> AppResult<Json<ProjectItemsResponse>> {
    let items = state.services.project_items.replace(id, &data).await?;
    Ok(Json(items))
}

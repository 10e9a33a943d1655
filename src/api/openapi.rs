//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{calendar, equipment, health, project_items, projects, shortages};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Warehouse API",
        version = "0.3.0",
        description = "Equipment rental projects, stock shortages and booking calendar",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Projects
        projects::list_projects,
        projects::get_project,
        projects::create_project,
        projects::update_project,
        project_items::get_project_items,
        project_items::replace_project_items,
        // Equipment
        equipment::list_equipment,
        equipment::get_equipment,
        equipment::create_equipment,
        // Shortages
        shortages::get_shortages,
        // Calendar
        calendar::get_calendar,
    ),
    components(
        schemas(
            // Projects
            crate::models::project::Project,
            crate::models::project::ProjectStatus,
            crate::models::project::ShippingType,
            crate::models::project::SaveProject,
            crate::models::project_item::ProjectItem,
            crate::models::project_item::ProjectItemLine,
            crate::models::project_item::ReplaceProjectItems,
            crate::models::project_item::ProjectItemsResponse,
            // Equipment
            crate::models::equipment::Equipment,
            crate::models::equipment::CreateEquipment,
            // Shortages
            crate::models::shortage::ShortageDetail,
            crate::models::shortage::ProjectShortage,
            crate::models::shortage::ShortagesResponse,
            // Calendar
            crate::engine::clock::ViewMode,
            crate::models::calendar::CalendarBlock,
            crate::models::calendar::CalendarDay,
            crate::models::calendar::CalendarView,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "projects", description = "Rental projects and their equipment lines"),
        (name = "equipment", description = "Equipment stock"),
        (name = "shortages", description = "Overlapping demand over stock"),
        (name = "calendar", description = "Laid-out booking calendar")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

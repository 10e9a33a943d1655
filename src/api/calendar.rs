//! Calendar API endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::calendar::{CalendarQuery, CalendarView, ViewState},
};

use super::AuthenticatedUser;

/// Render one page of the booking calendar
#[utoipa::path(
    get,
    path = "/calendar",
    tag = "calendar",
    security(("bearer_auth" = [])),
    params(CalendarQuery),
    responses(
        (status = 200, description = "Laid-out calendar view", body = CalendarView),
        (status = 400, description = "Malformed mode or date", body = crate::error::ErrorResponse),
        (status = 502, description = "Booking source unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_calendar(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarView>> {
    let calendar = &state.services.calendar;
    let view_state = ViewState::from_query(&query, calendar.today())?;
    let view = calendar.render(view_state).await?;
    Ok(Json(view))
}

use super::common::{created_response, success_response, validate_input};
use crate::{
    errors::ServiceError,
    handlers::AppState,
    services::time_clock::{ClockIn, ClockOut},
};
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClockInRequest {
    pub worker_id: i32,
    pub project_id: i32,
    /// ISO-8601; a trailing `Z` means UTC, a naive value is anchored to the
    /// configured reference zone, and an absent value means "now"
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClockOutRequest {
    pub worker_id: i32,
    /// Accepted for wire compatibility; the open-entry lookup is
    /// worker-scoped, so this field is not consulted
    pub project_id: Option<i32>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClockEntryFilters {
    pub worker_id: Option<i32>,
    pub project_id: Option<i32>,
}

pub fn time_clock_routes() -> Router<AppState> {
    Router::new()
        .route("/clockin", post(clock_in))
        .route("/clockout", post(clock_out))
        .route("/clock_entries", get(list_clock_entries))
}

/// Clock a worker in on a project
#[utoipa::path(
    post,
    path = "/api/v1/clockin",
    request_body = ClockInRequest,
    responses(
        (status = 201, description = "Entry opened", body = crate::services::time_clock::ClockEntryView),
        (status = 404, description = "Worker or project not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Worker already clocked in", body = crate::errors::ErrorResponse)
    ),
    tag = "time-clock"
)]
pub async fn clock_in(
    State(state): State<AppState>,
    Json(payload): Json<ClockInRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let entry = state
        .services
        .time_clock
        .clock_in(ClockIn {
            worker_id: payload.worker_id,
            project_id: payload.project_id,
            timestamp: payload.timestamp,
        })
        .await?;

    info!(
        "Worker {} clocked in on project {} (entry {})",
        entry.worker_id, entry.project_id, entry.id
    );

    Ok(created_response(entry))
}

/// Clock a worker out of their open entry
#[utoipa::path(
    post,
    path = "/api/v1/clockout",
    request_body = ClockOutRequest,
    responses(
        (status = 200, description = "Entry closed", body = crate::services::time_clock::ClockEntryView),
        (status = 409, description = "No active clock-in for this worker", body = crate::errors::ErrorResponse)
    ),
    tag = "time-clock"
)]
pub async fn clock_out(
    State(state): State<AppState>,
    Json(payload): Json<ClockOutRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let entry = state
        .services
        .time_clock
        .clock_out(ClockOut {
            worker_id: payload.worker_id,
            timestamp: payload.timestamp,
        })
        .await?;

    info!(
        "Worker {} clocked out (entry {}, {:?} hours)",
        entry.worker_id, entry.id, entry.total_hours
    );

    Ok(success_response(entry))
}

/// List clock entries, newest first, with optional worker/project filters
#[utoipa::path(
    get,
    path = "/api/v1/clock_entries",
    params(ClockEntryFilters),
    responses(
        (status = 200, description = "List entries", body = [crate::services::time_clock::ClockEntryView])
    ),
    tag = "time-clock"
)]
pub async fn list_clock_entries(
    State(state): State<AppState>,
    Query(filters): Query<ClockEntryFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let entries = state
        .services
        .time_clock
        .list_entries(filters.worker_id, filters.project_id)
        .await?;

    Ok(success_response(entries))
}

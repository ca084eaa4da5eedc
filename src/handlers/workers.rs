use super::common::{created_response, success_response, validate_input};
use crate::{
    errors::ServiceError,
    handlers::AppState,
    services::workers::NewWorker,
};
use axum::{
    extract::{Json, Query, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateWorkerRequest {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub role: String,
    /// Project this worker starts out assigned to; must exist when given
    pub assigned_project_id: Option<i32>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WorkerFilters {
    /// Restrict to workers assigned to this project; absent means unfiltered
    pub project_id: Option<i32>,
}

pub fn worker_routes() -> Router<AppState> {
    Router::new().route("/", post(create_worker).get(list_workers))
}

/// Create a new worker
#[utoipa::path(
    post,
    path = "/api/v1/workers",
    request_body = CreateWorkerRequest,
    responses(
        (status = 201, description = "Worker created", body = crate::entities::worker::Model),
        (status = 404, description = "Referenced project not found", body = crate::errors::ErrorResponse)
    ),
    tag = "workers"
)]
pub async fn create_worker(
    State(state): State<AppState>,
    Json(payload): Json<CreateWorkerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let worker = state
        .services
        .workers
        .create_worker(NewWorker {
            name: payload.name,
            role: payload.role,
            assigned_project_id: payload.assigned_project_id,
        })
        .await?;

    info!("Worker created: {} ({})", worker.name, worker.id);
    Ok(created_response(worker))
}

/// List workers with an optional project filter
#[utoipa::path(
    get,
    path = "/api/v1/workers",
    params(WorkerFilters),
    responses(
        (status = 200, description = "List workers", body = [crate::entities::worker::Model])
    ),
    tag = "workers"
)]
pub async fn list_workers(
    State(state): State<AppState>,
    Query(filters): Query<WorkerFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let workers = state
        .services
        .workers
        .list_workers(filters.project_id)
        .await?;

    Ok(success_response(workers))
}

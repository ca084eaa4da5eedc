use super::common::{created_response, success_response, validate_input};
use crate::{
    errors::ServiceError,
    handlers::AppState,
    services::projects::NewProject,
};
use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateProjectRequest {
    /// Project name (unique)
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
    /// Defaults to "Planned" when absent
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProjectFilters {
    /// Case-insensitive substring match on status; absent means unfiltered
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignWorkerRequest {
    pub worker_id: i32,
}

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route("/:id", get(get_project))
        .route("/:id/assign", post(assign_worker))
}

/// Create a new project
#[utoipa::path(
    post,
    path = "/api/v1/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created", body = crate::entities::project::Model),
        (status = 409, description = "Project name already in use", body = crate::errors::ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let project = state
        .services
        .projects
        .create_project(NewProject {
            name: payload.name,
            description: payload.description,
            status: payload.status,
        })
        .await?;

    info!("Project created: {} ({})", project.name, project.id);
    Ok(created_response(project))
}

/// List projects with an optional status filter
#[utoipa::path(
    get,
    path = "/api/v1/projects",
    params(ProjectFilters),
    responses(
        (status = 200, description = "List projects", body = [crate::entities::project::Model])
    ),
    tag = "projects"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Query(filters): Query<ProjectFilters>,
) -> Result<impl IntoResponse, ServiceError> {
    let projects = state.services.projects.list_projects(filters.status).await?;
    Ok(success_response(projects))
}

/// Get a project by ID
#[utoipa::path(
    get,
    path = "/api/v1/projects/{id}",
    params(("id" = i32, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project found", body = crate::entities::project::Model),
        (status = 404, description = "Project not found", body = crate::errors::ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let project = state
        .services
        .projects
        .get_project(project_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

    Ok(success_response(project))
}

/// Assign a worker to a project
#[utoipa::path(
    post,
    path = "/api/v1/projects/{id}/assign",
    params(("id" = i32, Path, description = "Project id")),
    request_body = AssignWorkerRequest,
    responses(
        (status = 200, description = "Worker assigned"),
        (status = 404, description = "Project or worker not found", body = crate::errors::ErrorResponse)
    ),
    tag = "projects"
)]
pub async fn assign_worker(
    State(state): State<AppState>,
    Path(project_id): Path<i32>,
    Json(payload): Json<AssignWorkerRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state
        .services
        .workers
        .assign(project_id, payload.worker_id)
        .await?;

    info!(
        "Worker {} assigned to project {}",
        outcome.worker.id, outcome.project.id
    );

    Ok(success_response(json!({
        "message": format!(
            "Worker {} assigned to project {}",
            outcome.worker.name, outcome.project.name
        )
    })))
}

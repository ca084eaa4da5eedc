use super::common::{created_response, success_response, validate_input};
use crate::{
    errors::ServiceError,
    handlers::AppState,
    services::queries::NewQueryTicket,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateQueryTicketRequest {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    pub worker_name: String,
    pub project_name: String,
    /// Defaults to "medium" when absent
    pub priority: Option<String>,
}

pub fn query_routes() -> Router<AppState> {
    Router::new().route("/", post(create_query_ticket).get(list_query_tickets))
}

/// Open a query ticket
#[utoipa::path(
    post,
    path = "/api/v1/queries",
    request_body = CreateQueryTicketRequest,
    responses(
        (status = 201, description = "Ticket opened", body = crate::entities::query_ticket::Model)
    ),
    tag = "queries"
)]
pub async fn create_query_ticket(
    State(state): State<AppState>,
    Json(payload): Json<CreateQueryTicketRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    validate_input(&payload)?;

    let ticket = state
        .services
        .tickets
        .create_ticket(NewQueryTicket {
            title: payload.title,
            description: payload.description,
            worker_name: payload.worker_name,
            project_name: payload.project_name,
            priority: payload.priority,
        })
        .await?;

    info!("Query ticket opened: {} ({})", ticket.title, ticket.id);
    Ok(created_response(ticket))
}

/// List query tickets, newest first
#[utoipa::path(
    get,
    path = "/api/v1/queries",
    responses(
        (status = 200, description = "List tickets", body = [crate::entities::query_ticket::Model])
    ),
    tag = "queries"
)]
pub async fn list_query_tickets(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let tickets = state.services.tickets.list_tickets().await?;
    Ok(success_response(tickets))
}

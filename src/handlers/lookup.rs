use super::common::success_response;
use crate::{errors::ServiceError, handlers::AppState};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Free-text token matched against worker names, then project names.
    /// `query` is accepted as an alias for older clients.
    #[serde(alias = "query")]
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
}

/// Resolve a free-text query to a worker or project summary
#[utoipa::path(
    post,
    path = "/api/v1/chatbot",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Summary or not-found message", body = ChatResponse)
    ),
    tag = "lookup"
)]
pub async fn chatbot(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let response = state.services.lookup.respond(&payload.message).await?;
    Ok(success_response(ChatResponse { response }))
}

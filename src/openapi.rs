use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth::login,
        crate::handlers::projects::create_project,
        crate::handlers::projects::list_projects,
        crate::handlers::projects::get_project,
        crate::handlers::projects::assign_worker,
        crate::handlers::workers::create_worker,
        crate::handlers::workers::list_workers,
        crate::handlers::time_clock::clock_in,
        crate::handlers::time_clock::clock_out,
        crate::handlers::time_clock::list_clock_entries,
        crate::handlers::lookup::chatbot,
        crate::handlers::queries::create_query_ticket,
        crate::handlers::queries::list_query_tickets,
        crate::handlers::health::health,
    ),
    components(schemas(
        crate::entities::project::Model,
        crate::entities::worker::Model,
        crate::entities::clock_entry::Model,
        crate::entities::query_ticket::Model,
        crate::services::time_clock::ClockEntryView,
        crate::handlers::auth::LoginRequest,
        crate::handlers::auth::LoginResponse,
        crate::handlers::projects::CreateProjectRequest,
        crate::handlers::projects::AssignWorkerRequest,
        crate::handlers::workers::CreateWorkerRequest,
        crate::handlers::time_clock::ClockInRequest,
        crate::handlers::time_clock::ClockOutRequest,
        crate::handlers::lookup::ChatRequest,
        crate::handlers::lookup::ChatResponse,
        crate::handlers::queries::CreateQueryTicketRequest,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "auth", description = "Login"),
        (name = "projects", description = "Project management and assignment"),
        (name = "workers", description = "Worker management"),
        (name = "time-clock", description = "Clock-in/clock-out state machine"),
        (name = "lookup", description = "Keyword lookup responder"),
        (name = "queries", description = "Query tickets"),
        (name = "health", description = "Health checks"),
    ),
    info(
        title = "worksite-api",
        description = "Project and worker time-tracking backend"
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /docs, serving the generated document at
/// /api-docs/openapi.json
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi())
}

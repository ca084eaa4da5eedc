pub mod auth;
pub mod common;
pub mod health;
pub mod lookup;
pub mod projects;
pub mod queries;
pub mod time_clock;
pub mod workers;

use crate::auth::CredentialVerifier;
use crate::db::DbPool;
use crate::events::EventSender;
use chrono::FixedOffset;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub projects: Arc<crate::services::projects::ProjectService>,
    pub workers: Arc<crate::services::workers::WorkerService>,
    pub time_clock: Arc<crate::services::time_clock::TimeClockService>,
    pub lookup: Arc<crate::services::lookup::LookupService>,
    pub users: Arc<crate::services::users::UserService>,
    pub tickets: Arc<crate::services::queries::QueryTicketService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        verifier: Arc<dyn CredentialVerifier>,
        reference_zone: FixedOffset,
    ) -> Self {
        let projects = Arc::new(crate::services::projects::ProjectService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let workers = Arc::new(crate::services::workers::WorkerService::new(
            db.clone(),
            event_sender.clone(),
        ));
        let time_clock = Arc::new(crate::services::time_clock::TimeClockService::new(
            db.clone(),
            event_sender.clone(),
            reference_zone,
        ));
        let lookup = Arc::new(crate::services::lookup::LookupService::new(
            db.clone(),
            reference_zone,
        ));
        let users = Arc::new(crate::services::users::UserService::new(
            db.clone(),
            verifier,
        ));
        let tickets = Arc::new(crate::services::queries::QueryTicketService::new(
            db,
            event_sender,
            reference_zone,
        ));

        Self {
            projects,
            workers,
            time_clock,
            lookup,
            users,
            tickets,
        }
    }
}

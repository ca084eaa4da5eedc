use crate::{
    db::DbPool,
    entities::query_ticket,
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{FixedOffset, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, QueryOrder, Set};
use std::sync::Arc;
use tracing::instrument;

/// Service for free-form query tickets raised against workers/projects
#[derive(Clone)]
pub struct QueryTicketService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    reference_zone: FixedOffset,
}

#[derive(Debug)]
pub struct NewQueryTicket {
    pub title: String,
    pub description: String,
    pub worker_name: String,
    pub project_name: String,
    pub priority: Option<String>,
}

impl QueryTicketService {
    pub fn new(
        db: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        reference_zone: FixedOffset,
    ) -> Self {
        Self {
            db,
            event_sender,
            reference_zone,
        }
    }

    /// Opens a new ticket. Priority defaults to "medium", status to "open".
    #[instrument(skip(self))]
    pub async fn create_ticket(
        &self,
        input: NewQueryTicket,
    ) -> Result<query_ticket::Model, ServiceError> {
        let priority = input
            .priority
            .filter(|p| !p.trim().is_empty())
            .unwrap_or_else(|| "medium".to_string());

        let active = query_ticket::ActiveModel {
            title: Set(input.title),
            description: Set(input.description),
            worker_name: Set(input.worker_name),
            project_name: Set(input.project_name),
            priority: Set(priority),
            status: Set("open".to_string()),
            created_at: Set(Utc::now().with_timezone(&self.reference_zone)),
            ..Default::default()
        };

        let model = active
            .insert(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.event_sender
            .send(Event::QueryTicketOpened(model.id))
            .await;

        Ok(model)
    }

    /// Lists tickets, newest first.
    #[instrument(skip(self))]
    pub async fn list_tickets(&self) -> Result<Vec<query_ticket::Model>, ServiceError> {
        let tickets = query_ticket::Entity::find()
            .order_by_desc(query_ticket::Column::CreatedAt)
            .order_by_desc(query_ticket::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(tickets)
    }
}

use crate::{
    db::DbPool,
    entities::{project, worker},
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use std::sync::Arc;
use tracing::instrument;

/// Service for managing workers and their project assignment
#[derive(Clone)]
pub struct WorkerService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug)]
pub struct NewWorker {
    pub name: String,
    pub role: String,
    pub assigned_project_id: Option<i32>,
}

/// Result of an assignment, carrying both records for the confirmation
/// message.
#[derive(Debug)]
pub struct AssignmentOutcome {
    pub worker: worker::Model,
    pub project: project::Model,
}

impl WorkerService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a new worker. A referenced project must exist.
    #[instrument(skip(self))]
    pub async fn create_worker(&self, input: NewWorker) -> Result<worker::Model, ServiceError> {
        if let Some(project_id) = input.assigned_project_id {
            project::Entity::find_by_id(project_id)
                .one(&*self.db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("Project {} not found", project_id))
                })?;
        }

        let active = worker::ActiveModel {
            name: Set(input.name),
            role: Set(input.role),
            assigned_project_id: Set(input.assigned_project_id),
            ..Default::default()
        };

        let model = active
            .insert(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.event_sender.send(Event::WorkerCreated(model.id)).await;
        Ok(model)
    }

    /// Gets a worker by ID
    #[instrument(skip(self))]
    pub async fn get_worker(&self, worker_id: i32) -> Result<Option<worker::Model>, ServiceError> {
        let worker = worker::Entity::find_by_id(worker_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(worker)
    }

    /// Lists workers, optionally narrowed to those assigned to a project.
    #[instrument(skip(self))]
    pub async fn list_workers(
        &self,
        project_id: Option<i32>,
    ) -> Result<Vec<worker::Model>, ServiceError> {
        let mut query = worker::Entity::find().order_by_asc(worker::Column::Id);

        if let Some(project_id) = project_id {
            query = query.filter(worker::Column::AssignedProjectId.eq(project_id));
        }

        let workers = query.all(&*self.db).await.map_err(ServiceError::DatabaseError)?;
        Ok(workers)
    }

    /// Assigns a worker to a project, overwriting any prior assignment.
    /// No history is kept. Both ids must resolve.
    #[instrument(skip(self))]
    pub async fn assign(
        &self,
        project_id: i32,
        worker_id: i32,
    ) -> Result<AssignmentOutcome, ServiceError> {
        let project = project::Entity::find_by_id(project_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

        let worker = worker::Entity::find_by_id(worker_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Worker {} not found", worker_id)))?;

        let mut active: worker::ActiveModel = worker.into();
        active.assigned_project_id = Set(Some(project.id));
        let worker = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        self.event_sender
            .send(Event::WorkerAssigned {
                worker_id: worker.id,
                project_id: project.id,
            })
            .await;

        Ok(AssignmentOutcome { worker, project })
    }
}

use crate::{
    db::DbPool,
    entities::project,
    errors::ServiceError,
    events::{Event, EventSender},
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use std::sync::Arc;
use tracing::instrument;

/// Service for managing projects
#[derive(Clone)]
pub struct ProjectService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

#[derive(Debug)]
pub struct NewProject {
    pub name: String,
    pub description: Option<String>,
    pub status: Option<String>,
}

impl ProjectService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self { db, event_sender }
    }

    /// Creates a new project. Project names are unique; a duplicate fails
    /// with `Conflict`.
    #[instrument(skip(self))]
    pub async fn create_project(&self, input: NewProject) -> Result<project::Model, ServiceError> {
        let status = input
            .status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| "Planned".to_string());

        let active = project::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            status: Set(status),
            ..Default::default()
        };

        let model = match active.insert(&*self.db).await {
            Ok(model) => model,
            Err(err) => {
                return Err(match err.sql_err() {
                    Some(SqlErr::UniqueConstraintViolation(_)) => {
                        ServiceError::Conflict("Project name already in use".to_string())
                    }
                    _ => ServiceError::DatabaseError(err),
                })
            }
        };

        self.event_sender.send(Event::ProjectCreated(model.id)).await;
        Ok(model)
    }

    /// Gets a project by ID
    #[instrument(skip(self))]
    pub async fn get_project(&self, project_id: i32) -> Result<Option<project::Model>, ServiceError> {
        let project = project::Entity::find_by_id(project_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(project)
    }

    /// Lists projects, optionally narrowed by a case-insensitive substring
    /// match on status. An absent filter means unfiltered.
    #[instrument(skip(self))]
    pub async fn list_projects(
        &self,
        status: Option<String>,
    ) -> Result<Vec<project::Model>, ServiceError> {
        let mut query = project::Entity::find().order_by_asc(project::Column::Id);

        if let Some(status) = status.filter(|s| !s.trim().is_empty()) {
            let needle = format!("%{}%", status.trim().to_lowercase());
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(project::Column::Status))).like(needle),
            );
        }

        let projects = query.all(&*self.db).await.map_err(ServiceError::DatabaseError)?;
        Ok(projects)
    }
}

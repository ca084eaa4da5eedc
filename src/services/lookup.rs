//! Keyword lookup responder.
//!
//! Resolves a free-text token against worker names first, then project
//! names, with a case-insensitive substring match, and renders a plain-text
//! summary. The first match in ascending-id order wins; a worker match
//! always shadows a project match.

use crate::{
    db::DbPool,
    entities::{clock_entry, project, worker},
    errors::ServiceError,
};
use chrono::{DateTime, FixedOffset};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::instrument;

#[derive(Clone)]
pub struct LookupService {
    db: Arc<DbPool>,
    reference_zone: FixedOffset,
}

impl LookupService {
    pub fn new(db: Arc<DbPool>, reference_zone: FixedOffset) -> Self {
        Self { db, reference_zone }
    }

    fn minute(&self, at: DateTime<FixedOffset>) -> String {
        at.with_timezone(&self.reference_zone)
            .format("%Y-%m-%d %H:%M")
            .to_string()
    }

    /// Resolves `text` to a textual summary.
    #[instrument(skip(self))]
    pub async fn respond(&self, text: &str) -> Result<String, ServiceError> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Self::not_found(text));
        }

        let workers = worker::Entity::find()
            .order_by_asc(worker::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(matched) = workers
            .iter()
            .find(|w| w.name.to_lowercase().contains(&needle))
        {
            return self.worker_summary(matched).await;
        }

        let projects = project::Entity::find()
            .order_by_asc(project::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(matched) = projects
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
        {
            return self.project_summary(matched).await;
        }

        Ok(Self::not_found(text))
    }

    fn not_found(text: &str) -> String {
        format!(
            "No worker or project matching '{}' was found.",
            text.trim()
        )
    }

    async fn worker_summary(&self, matched: &worker::Model) -> Result<String, ServiceError> {
        let assigned = match matched.assigned_project_id {
            Some(project_id) => project::Entity::find_by_id(project_id)
                .one(&*self.db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .map(|p| p.name),
            None => None,
        };

        let entries = clock_entry::Entity::find()
            .filter(clock_entry::Column::WorkerId.eq(matched.id))
            .order_by_desc(clock_entry::Column::ClockInTime)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut out = String::new();
        let _ = writeln!(out, "Worker: {}", matched.name);
        let _ = writeln!(out, "Role: {}", matched.role);
        let _ = writeln!(
            out,
            "Assigned project: {}",
            assigned.as_deref().unwrap_or("None")
        );

        if entries.is_empty() {
            let _ = writeln!(out, "No clock entries recorded.");
        } else {
            let _ = writeln!(out, "Clock entries:");
            for entry in entries {
                let clocked_out = entry
                    .clock_out_time
                    .map(|t| self.minute(t))
                    .unwrap_or_else(|| "In progress".to_string());
                let _ = writeln!(
                    out,
                    "- {} -> {}",
                    self.minute(entry.clock_in_time),
                    clocked_out
                );
            }
        }

        Ok(out.trim_end().to_string())
    }

    async fn project_summary(&self, matched: &project::Model) -> Result<String, ServiceError> {
        let workers = worker::Entity::find()
            .filter(worker::Column::AssignedProjectId.eq(matched.id))
            .order_by_asc(worker::Column::Id)
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let mut out = String::new();
        let _ = writeln!(out, "Project: {}", matched.name);
        let _ = writeln!(out, "Status: {}", matched.status);

        if workers.is_empty() {
            let _ = writeln!(out, "No workers assigned.");
        } else {
            let _ = writeln!(out, "Assigned workers:");
            for w in workers {
                let _ = writeln!(out, "- {} ({})", w.name, w.role);
            }
        }

        Ok(out.trim_end().to_string())
    }
}

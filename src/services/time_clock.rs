//! The clock-in/clock-out state machine.
//!
//! Each worker is either idle or clocked in on exactly one project. The store
//! backs this with a partial unique index on open entries, and clock-in runs
//! its check-then-insert inside a transaction, so two concurrent clock-ins
//! for the same worker cannot both land.

use crate::{
    db::DbPool,
    entities::{clock_entry, project, worker},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, FixedOffset, NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

/// Service driving the per-worker clock state machine
#[derive(Clone)]
pub struct TimeClockService {
    db: Arc<DbPool>,
    event_sender: Arc<EventSender>,
    reference_zone: FixedOffset,
}

#[derive(Debug)]
pub struct ClockIn {
    pub worker_id: i32,
    pub project_id: i32,
    /// Optional caller-supplied timestamp; "now" in the reference zone when
    /// absent.
    pub timestamp: Option<String>,
}

#[derive(Debug)]
pub struct ClockOut {
    pub worker_id: i32,
    pub timestamp: Option<String>,
}

/// A clock entry enriched with the denormalized worker and project names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClockEntryView {
    pub id: i32,
    pub worker_id: i32,
    pub worker_name: String,
    pub project_id: i32,
    pub project_name: String,
    #[schema(value_type = String)]
    pub clock_in_time: DateTime<FixedOffset>,
    #[schema(value_type = Option<String>)]
    pub clock_out_time: Option<DateTime<FixedOffset>>,
    pub total_hours: Option<f64>,
}

impl ClockEntryView {
    fn from_parts(entry: clock_entry::Model, worker_name: &str, project_name: &str) -> Self {
        Self {
            id: entry.id,
            worker_id: entry.worker_id,
            worker_name: worker_name.to_string(),
            project_id: entry.project_id,
            project_name: project_name.to_string(),
            clock_in_time: entry.clock_in_time,
            clock_out_time: entry.clock_out_time,
            total_hours: entry.total_hours,
        }
    }
}

/// Parses a caller-supplied timestamp. A trailing `Z` is normalized to an
/// explicit zero offset before parsing; a naive timestamp gets the reference
/// zone attached, not UTC.
pub(crate) fn parse_timestamp(
    raw: &str,
    zone: FixedOffset,
) -> Result<DateTime<FixedOffset>, ServiceError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('Z') || trimmed.ends_with('z') {
        format!("{}+00:00", &trimmed[..trimmed.len() - 1])
    } else {
        trimmed.to_string()
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(parsed);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            if let Some(anchored) = naive.and_local_timezone(zone).single() {
                return Ok(anchored);
            }
        }
    }

    Err(ServiceError::ValidationError(format!(
        "Unparseable timestamp '{}'",
        raw
    )))
}

/// Elapsed hours rounded to two decimals. The sign of the input is kept.
pub(crate) fn round_hours(elapsed: chrono::Duration) -> f64 {
    let hours = elapsed.num_milliseconds() as f64 / 3_600_000.0;
    (hours * 100.0).round() / 100.0
}

impl TimeClockService {
    pub fn new(db: Arc<DbPool>, event_sender: Arc<EventSender>, reference_zone: FixedOffset) -> Self {
        Self {
            db,
            event_sender,
            reference_zone,
        }
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.reference_zone)
    }

    fn resolve_timestamp(
        &self,
        raw: Option<&str>,
    ) -> Result<DateTime<FixedOffset>, ServiceError> {
        match raw {
            Some(raw) => parse_timestamp(raw, self.reference_zone),
            None => Ok(self.now()),
        }
    }

    /// The worker's open entry, if any.
    #[instrument(skip(self))]
    pub async fn active_entry(
        &self,
        worker_id: i32,
    ) -> Result<Option<clock_entry::Model>, ServiceError> {
        let entry = clock_entry::Entity::find()
            .filter(clock_entry::Column::WorkerId.eq(worker_id))
            .filter(clock_entry::Column::ClockOutTime.is_null())
            .order_by_desc(clock_entry::Column::Id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(entry)
    }

    /// Opens a clock entry for the worker on the project.
    ///
    /// Fails with `AlreadyClockedIn` (carrying the conflicting project id)
    /// when the worker already has an open entry.
    #[instrument(skip(self))]
    pub async fn clock_in(&self, input: ClockIn) -> Result<ClockEntryView, ServiceError> {
        let worker = worker::Entity::find_by_id(input.worker_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Worker {} not found", input.worker_id)))?;

        let project = project::Entity::find_by_id(input.project_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Project {} not found", input.project_id))
            })?;

        let clock_in_time = self.resolve_timestamp(input.timestamp.as_deref())?;

        let txn = self.db.begin().await.map_err(ServiceError::DatabaseError)?;

        let open = clock_entry::Entity::find()
            .filter(clock_entry::Column::WorkerId.eq(worker.id))
            .filter(clock_entry::Column::ClockOutTime.is_null())
            .order_by_desc(clock_entry::Column::Id)
            .one(&txn)
            .await
            .map_err(ServiceError::DatabaseError)?;

        if let Some(existing) = open {
            return Err(ServiceError::AlreadyClockedIn {
                project_id: existing.project_id,
            });
        }

        let active = clock_entry::ActiveModel {
            worker_id: Set(worker.id),
            project_id: Set(project.id),
            clock_in_time: Set(clock_in_time),
            ..Default::default()
        };

        let entry = match active.insert(&txn).await {
            Ok(entry) => entry,
            // The partial unique index catches a concurrent clock-in that
            // slipped past the check above.
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    drop(txn);
                    let existing = self.active_entry(worker.id).await?;
                    return Err(ServiceError::AlreadyClockedIn {
                        project_id: existing.map(|e| e.project_id).unwrap_or(project.id),
                    });
                }
                _ => return Err(ServiceError::DatabaseError(err)),
            },
        };

        txn.commit().await.map_err(ServiceError::DatabaseError)?;

        self.event_sender
            .send(Event::WorkerClockedIn {
                entry_id: entry.id,
                worker_id: worker.id,
                project_id: project.id,
            })
            .await;

        Ok(ClockEntryView::from_parts(entry, &worker.name, &project.name))
    }

    /// Closes the worker's most recently opened entry and computes
    /// `total_hours`, rounded to two decimals.
    ///
    /// The lookup is worker-scoped: a worker has at most one open entry, so
    /// no project filter is applied. The elapsed time may be zero or negative
    /// when the caller supplies an out-of-order timestamp; that value is
    /// stored as-is and validating against it is the caller's responsibility.
    #[instrument(skip(self))]
    pub async fn clock_out(&self, input: ClockOut) -> Result<ClockEntryView, ServiceError> {
        let entry = clock_entry::Entity::find()
            .filter(clock_entry::Column::WorkerId.eq(input.worker_id))
            .filter(clock_entry::Column::ClockOutTime.is_null())
            .order_by_desc(clock_entry::Column::Id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or(ServiceError::NoActiveEntry)?;

        let clock_out_time = self.resolve_timestamp(input.timestamp.as_deref())?;

        // Normalize both ends into the reference zone before subtracting.
        let elapsed = clock_out_time.with_timezone(&self.reference_zone)
            - entry.clock_in_time.with_timezone(&self.reference_zone);
        let total_hours = round_hours(elapsed);

        let worker_id = entry.worker_id;
        let project_id = entry.project_id;

        let mut active: clock_entry::ActiveModel = entry.into();
        active.clock_out_time = Set(Some(clock_out_time));
        active.total_hours = Set(Some(total_hours));
        let entry = active
            .update(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        let worker = worker::Entity::find_by_id(worker_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Worker {} not found", worker_id)))?;
        let project = project::Entity::find_by_id(project_id)
            .one(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Project {} not found", project_id)))?;

        self.event_sender
            .send(Event::WorkerClockedOut {
                entry_id: entry.id,
                worker_id,
                total_hours,
            })
            .await;

        Ok(ClockEntryView::from_parts(entry, &worker.name, &project.name))
    }

    /// Lists entries, newest first, enriched with worker and project names.
    /// Absent filters mean unfiltered.
    #[instrument(skip(self))]
    pub async fn list_entries(
        &self,
        worker_id: Option<i32>,
        project_id: Option<i32>,
    ) -> Result<Vec<ClockEntryView>, ServiceError> {
        let mut query = clock_entry::Entity::find()
            .order_by_desc(clock_entry::Column::ClockInTime);

        if let Some(worker_id) = worker_id {
            query = query.filter(clock_entry::Column::WorkerId.eq(worker_id));
        }
        if let Some(project_id) = project_id {
            query = query.filter(clock_entry::Column::ProjectId.eq(project_id));
        }

        let entries = query.all(&*self.db).await.map_err(ServiceError::DatabaseError)?;
        self.enrich(entries).await
    }

    async fn enrich(
        &self,
        entries: Vec<clock_entry::Model>,
    ) -> Result<Vec<ClockEntryView>, ServiceError> {
        let worker_ids: Vec<i32> = entries.iter().map(|e| e.worker_id).collect();
        let project_ids: Vec<i32> = entries.iter().map(|e| e.project_id).collect();

        let worker_names: HashMap<i32, String> = worker::Entity::find()
            .filter(worker::Column::Id.is_in(worker_ids))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|w| (w.id, w.name))
            .collect();

        let project_names: HashMap<i32, String> = project::Entity::find()
            .filter(project::Column::Id.is_in(project_ids))
            .all(&*self.db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let worker_name = worker_names
                    .get(&entry.worker_id)
                    .cloned()
                    .unwrap_or_default();
                let project_name = project_names
                    .get(&entry.project_id)
                    .cloned()
                    .unwrap_or_default();
                ClockEntryView::from_parts(entry, &worker_name, &project_name)
            })
            .collect())
    }
}

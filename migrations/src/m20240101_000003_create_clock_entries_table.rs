use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_projects_table::Projects;
use crate::m20240101_000002_create_workers_table::Workers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ClockEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClockEntries::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClockEntries::WorkerId).integer().not_null())
                    .col(
                        ColumnDef::new(ClockEntries::ProjectId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClockEntries::ClockInTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClockEntries::ClockOutTime)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(ClockEntries::TotalHours).double().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clock_entries_worker")
                            .from(ClockEntries::Table, ClockEntries::WorkerId)
                            .to(Workers::Table, Workers::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_clock_entries_project")
                            .from(ClockEntries::Table, ClockEntries::ProjectId)
                            .to(Projects::Table, Projects::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clock_entries_worker")
                    .table(ClockEntries::Table)
                    .col(ClockEntries::WorkerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_clock_entries_project")
                    .table(ClockEntries::Table)
                    .col(ClockEntries::ProjectId)
                    .to_owned(),
            )
            .await?;

        // Partial unique index: at most one open entry per worker. This is the
        // store-level guard behind the clock-in state machine; a concurrent
        // clock-in that slips past the transactional check fails here.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_clock_entries_one_open_per_worker \
                 ON clock_entries (worker_id) WHERE clock_out_time IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ClockEntries::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ClockEntries {
    Table,
    Id,
    WorkerId,
    ProjectId,
    ClockInTime,
    ClockOutTime,
    TotalHours,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QueryTickets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QueryTickets::Id)
                            .integer()
                            .primary_key()
                            .auto_increment()
                            .not_null(),
                    )
                    .col(ColumnDef::new(QueryTickets::Title).string().not_null())
                    .col(ColumnDef::new(QueryTickets::Description).text().not_null())
                    .col(ColumnDef::new(QueryTickets::WorkerName).string().not_null())
                    .col(
                        ColumnDef::new(QueryTickets::ProjectName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(QueryTickets::Priority)
                            .string()
                            .not_null()
                            .default("medium"),
                    )
                    .col(
                        ColumnDef::new(QueryTickets::Status)
                            .string()
                            .not_null()
                            .default("open"),
                    )
                    .col(
                        ColumnDef::new(QueryTickets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_query_tickets_title")
                    .table(QueryTickets::Table)
                    .col(QueryTickets::Title)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QueryTickets::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum QueryTickets {
    Table,
    Id,
    Title,
    Description,
    WorkerName,
    ProjectName,
    Priority,
    Status,
    CreatedAt,
}

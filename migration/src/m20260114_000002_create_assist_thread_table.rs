use sea_orm_migration::{prelude::*, schema::*};

use super::m20260114_000001_create_assist_request_table::AssistRequest;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssistThread::Table)
                    .if_not_exists()
                    .col(uuid(AssistThread::RequestId).primary_key())
                    .col(string(AssistThread::ThreadId))
                    .col(string(AssistThread::AssistantId))
                    .col(
                        timestamp(AssistThread::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assist_thread_request_id")
                            .from(AssistThread::Table, AssistThread::RequestId)
                            .to(AssistRequest::Table, AssistRequest::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssistThread::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AssistThread {
    Table,
    RequestId,
    ThreadId,
    AssistantId,
    CreatedAt,
}

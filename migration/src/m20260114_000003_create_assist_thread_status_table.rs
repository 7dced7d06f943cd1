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
                    .table(AssistThreadStatus::Table)
                    .if_not_exists()
                    .col(uuid(AssistThreadStatus::RequestId).primary_key())
                    .col(timestamp(AssistThreadStatus::ClosedAt))
                    .col(boolean(AssistThreadStatus::RequesterInactive).default(false))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_assist_thread_status_request_id")
                            .from(AssistThreadStatus::Table, AssistThreadStatus::RequestId)
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
            .drop_table(Table::drop().table(AssistThreadStatus::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AssistThreadStatus {
    Table,
    RequestId,
    ClosedAt,
    RequesterInactive,
}

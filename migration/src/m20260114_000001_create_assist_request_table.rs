use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AssistRequest::Table)
                    .if_not_exists()
                    .col(uuid(AssistRequest::Id).primary_key())
                    .col(string(AssistRequest::UserId))
                    .col(string(AssistRequest::GuildId))
                    .col(string(AssistRequest::Issue))
                    .col(string(AssistRequest::Locale))
                    .col(string(AssistRequest::InteractionId))
                    .col(
                        timestamp(AssistRequest::RequestedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AssistRequest::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AssistRequest {
    Table,
    Id,
    UserId,
    GuildId,
    Issue,
    Locale,
    InteractionId,
    RequestedAt,
}

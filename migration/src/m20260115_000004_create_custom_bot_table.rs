use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CustomBot::Table)
                    .if_not_exists()
                    .col(uuid(CustomBot::Id).primary_key())
                    .col(string(CustomBot::UserId))
                    .col(string(CustomBot::Username))
                    .col(string(CustomBot::Token))
                    .col(boolean(CustomBot::Validation).default(true))
                    .col(string_null(CustomBot::ActivityType))
                    .col(string_null(CustomBot::ActivityName))
                    .col(integer(CustomBot::TierId))
                    .col(
                        timestamp(CustomBot::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CustomBot::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CustomBot {
    Table,
    Id,
    UserId,
    Username,
    Token,
    Validation,
    ActivityType,
    ActivityName,
    TierId,
    CreatedAt,
}

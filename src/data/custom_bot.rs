use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter,
};
use uuid::Uuid;

use crate::model::custom_bot::{CreateCustomBotParams, CustomBot};

/// Repository providing database operations for custom bot subscriptions.
pub struct CustomBotRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CustomBotRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new custom bot record with a fresh id.
    ///
    /// The record is created with `validation = true`; the caller is expected
    /// to have run the token validation pipeline first.
    ///
    /// # Arguments
    /// - `params`: Validated creation parameters
    ///
    /// # Returns
    /// - `Ok(CustomBot)`: The created custom bot
    /// - `Err(DbErr)`: Database error
    pub async fn create(&self, params: CreateCustomBotParams) -> Result<CustomBot, DbErr> {
        let row = entity::custom_bot::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(params.user_id),
            username: ActiveValue::Set(params.username),
            token: ActiveValue::Set(params.token),
            validation: ActiveValue::Set(true),
            activity_type: ActiveValue::Set(params.activity_type),
            activity_name: ActiveValue::Set(params.activity_name),
            tier_id: ActiveValue::Set(params.tier_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await?;

        Ok(CustomBot::from_entity(row))
    }

    /// Gets a custom bot by id.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<CustomBot>, DbErr> {
        let row = entity::prelude::CustomBot::find_by_id(id).one(self.db).await?;

        Ok(row.map(CustomBot::from_entity))
    }

    /// Gets the custom bots matching any of the given ids.
    pub async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<CustomBot>, DbErr> {
        let rows = entity::prelude::CustomBot::find()
            .filter(entity::custom_bot::Column::Id.is_in(ids.iter().copied()))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(CustomBot::from_entity).collect())
    }

    /// Gets all custom bots registered by a user.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<CustomBot>, DbErr> {
        let rows = entity::prelude::CustomBot::find()
            .filter(entity::custom_bot::Column::UserId.eq(user_id))
            .all(self.db)
            .await?;

        Ok(rows.into_iter().map(CustomBot::from_entity).collect())
    }

    /// Counts the custom bots registered by a user.
    pub async fn count_by_user(&self, user_id: &str) -> Result<u64, DbErr> {
        entity::prelude::CustomBot::find()
            .filter(entity::custom_bot::Column::UserId.eq(user_id))
            .count(self.db)
            .await
    }

    /// Gets a custom bot by its stored token.
    pub async fn find_by_token(&self, token: &str) -> Result<Option<CustomBot>, DbErr> {
        let row = entity::prelude::CustomBot::find()
            .filter(entity::custom_bot::Column::Token.eq(token))
            .one(self.db)
            .await?;

        Ok(row.map(CustomBot::from_entity))
    }

    /// Gets the ids of every custom bot with an active subscription.
    ///
    /// A row's existence is the subscription: lapsed subscribers have their
    /// rows removed upstream, so this is the active set the reconciliation
    /// job cross-references running processes against.
    pub async fn all_ids(&self) -> Result<Vec<Uuid>, DbErr> {
        let rows = entity::prelude::CustomBot::find().all(self.db).await?;

        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    /// Sets the validation flag of a custom bot.
    pub async fn set_validation(&self, id: Uuid, validation: bool) -> Result<(), DbErr> {
        entity::prelude::CustomBot::update_many()
            .col_expr(
                entity::custom_bot::Column::Validation,
                sea_orm::sea_query::Expr::value(validation),
            )
            .filter(entity::custom_bot::Column::Id.eq(id))
            .exec(self.db)
            .await?;

        Ok(())
    }

    /// Marks any record holding the given token as failed validation.
    ///
    /// Invoked by the validation pipeline when the remote API rejects the
    /// token, so a stale record stops being started with it.
    pub async fn invalidate_by_token(&self, token: &str) -> Result<(), DbErr> {
        entity::prelude::CustomBot::update_many()
            .col_expr(
                entity::custom_bot::Column::Validation,
                sea_orm::sea_query::Expr::value(false),
            )
            .filter(entity::custom_bot::Column::Token.eq(token))
            .exec(self.db)
            .await?;

        Ok(())
    }
}

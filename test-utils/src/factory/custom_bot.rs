//! Custom bot factory for creating test custom bot entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for creating test custom bots with customizable fields.
pub struct CustomBotFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: String,
    username: String,
    token: String,
    validation: bool,
    tier_id: i32,
}

impl<'a> CustomBotFactory<'a> {
    /// Creates a new CustomBotFactory with default values.
    ///
    /// Defaults:
    /// - user_id: auto-incremented unique id
    /// - username: `"bot-{id}"`
    /// - token: `"token-{id}"`
    /// - validation: `true`
    /// - tier_id: `1`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            user_id: (3_000_000 + id).to_string(),
            username: format!("bot-{}", id),
            token: format!("token-{}", id),
            validation: true,
            tier_id: 1,
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    pub fn tier_id(mut self, tier_id: i32) -> Self {
        self.tier_id = tier_id;
        self
    }

    /// Builds and inserts the custom bot entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::custom_bot::Model)` - Created custom bot entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::custom_bot::Model, DbErr> {
        entity::custom_bot::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(self.user_id),
            username: ActiveValue::Set(self.username),
            token: ActiveValue::Set(self.token),
            validation: ActiveValue::Set(self.validation),
            activity_type: ActiveValue::Set(None),
            activity_name: ActiveValue::Set(None),
            tier_id: ActiveValue::Set(self.tier_id),
            created_at: ActiveValue::Set(Utc::now()),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a custom bot with default values.
///
/// Shorthand for `CustomBotFactory::new(db).build().await`.
pub async fn create_custom_bot(
    db: &DatabaseConnection,
) -> Result<entity::custom_bot::Model, DbErr> {
    CustomBotFactory::new(db).build().await
}

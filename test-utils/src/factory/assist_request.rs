//! Assistance request factory for creating test request entities.
//!
//! This module provides factory methods for creating request rows with
//! sensible defaults, plus shorthands for the accepted and closed shapes
//! (thread and thread-status rows).

use crate::factory::helpers::{next_id, snowflake_at};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Factory for creating test assistance requests with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::assist_request::AssistRequestFactory;
///
/// let request = AssistRequestFactory::new(&db)
///     .user_id("123456789")
///     .locale("de")
///     .build()
///     .await?;
/// ```
pub struct AssistRequestFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: String,
    guild_id: String,
    issue: String,
    locale: String,
    requested_at: DateTime<Utc>,
}

impl<'a> AssistRequestFactory<'a> {
    /// Creates a new AssistRequestFactory with default values.
    ///
    /// Defaults:
    /// - user_id / guild_id: auto-incremented unique ids
    /// - issue: `"Issue {id}"`
    /// - locale: `"en-US"`
    /// - requested_at: now
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            user_id: (1_000_000 + id).to_string(),
            guild_id: (2_000_000 + id).to_string(),
            issue: format!("Issue {}", id),
            locale: "en-US".to_string(),
            requested_at: Utc::now(),
        }
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    pub fn issue(mut self, issue: impl Into<String>) -> Self {
        self.issue = issue.into();
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Sets both `requested_at` and the interaction id's embedded mint time.
    pub fn requested_at(mut self, requested_at: DateTime<Utc>) -> Self {
        self.requested_at = requested_at;
        self
    }

    /// Builds and inserts the request entity into the database.
    ///
    /// The interaction id is a synthetic snowflake minted at `requested_at`.
    ///
    /// # Returns
    /// - `Ok(entity::assist_request::Model)` - Created request entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::assist_request::Model, DbErr> {
        entity::assist_request::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            user_id: ActiveValue::Set(self.user_id),
            guild_id: ActiveValue::Set(self.guild_id),
            issue: ActiveValue::Set(self.issue),
            locale: ActiveValue::Set(self.locale),
            interaction_id: ActiveValue::Set(snowflake_at(self.requested_at)),
            requested_at: ActiveValue::Set(self.requested_at),
        }
        .insert(self.db)
        .await
    }
}

/// Creates a request with default values.
///
/// Shorthand for `AssistRequestFactory::new(db).build().await`.
pub async fn create_request(
    db: &DatabaseConnection,
) -> Result<entity::assist_request::Model, DbErr> {
    AssistRequestFactory::new(db).build().await
}

/// Creates a request owned by a specific user.
pub async fn create_request_for_user(
    db: &DatabaseConnection,
    user_id: impl Into<String>,
) -> Result<entity::assist_request::Model, DbErr> {
    AssistRequestFactory::new(db).user_id(user_id).build().await
}

/// Adds the acceptance rows to a request: the thread row.
///
/// # Arguments
/// - `db` - Database connection
/// - `request_id` - The accepted request
/// - `assistant_id` - Discord ID of the accepting assistant
///
/// # Returns
/// - `Ok(entity::assist_thread::Model)` - Created thread entity
/// - `Err(DbErr)` - Database error during insert
pub async fn accept_request(
    db: &DatabaseConnection,
    request_id: Uuid,
    assistant_id: impl Into<String>,
) -> Result<entity::assist_thread::Model, DbErr> {
    entity::assist_thread::ActiveModel {
        request_id: ActiveValue::Set(request_id),
        thread_id: ActiveValue::Set((5_000_000 + next_id()).to_string()),
        assistant_id: ActiveValue::Set(assistant_id.into()),
        created_at: ActiveValue::Set(Utc::now()),
    }
    .insert(db)
    .await
}

/// Adds the terminal disposition row to a request.
///
/// # Arguments
/// - `db` - Database connection
/// - `request_id` - The closed request
/// - `closed_at` - Moment of the terminal transition
/// - `requester_inactive` - Whether the requester went silent
pub async fn close_request(
    db: &DatabaseConnection,
    request_id: Uuid,
    closed_at: DateTime<Utc>,
    requester_inactive: bool,
) -> Result<entity::assist_thread_status::Model, DbErr> {
    entity::assist_thread_status::ActiveModel {
        request_id: ActiveValue::Set(request_id),
        closed_at: ActiveValue::Set(closed_at),
        requester_inactive: ActiveValue::Set(requester_inactive),
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_request_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_request_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let request = create_request(db).await?;

        assert!(!request.user_id.is_empty());
        assert_eq!(request.locale, "en-US");

        Ok(())
    }

    #[tokio::test]
    async fn creates_multiple_unique_requests() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_request_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let first = create_request(db).await?;
        let second = create_request(db).await?;

        assert_ne!(first.id, second.id);
        assert_ne!(first.user_id, second.user_id);

        Ok(())
    }

    #[tokio::test]
    async fn interaction_id_embeds_requested_at() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_request_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let moment = Utc::now() - chrono::Duration::minutes(30);
        let request = AssistRequestFactory::new(db)
            .requested_at(moment)
            .build()
            .await?;

        let raw: u64 = request.interaction_id.parse().unwrap();
        let embedded_millis = (raw >> 22) as i64 + 1_420_070_400_000;
        assert_eq!(embedded_millis, moment.timestamp_millis());

        Ok(())
    }
}

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    JoinType, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};
use uuid::Uuid;

use crate::model::request::AssistRequest;

/// Repository providing database operations for assistance requests.
///
/// The request's lifecycle state is split across three tables: the request row
/// itself, a thread row written once on acceptance, and a thread-status row
/// written once on the terminal transition. Reads reassemble the full domain
/// model from that join shape.
pub struct AssistRequestRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AssistRequestRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persists the core row of a freshly created request.
    ///
    /// Only the immutable creation fields are written; thread and status rows
    /// follow later through their own inserts.
    ///
    /// # Arguments
    /// - `request`: Domain model assembled by the lifecycle
    ///
    /// # Returns
    /// - `Ok(())`: Row inserted
    /// - `Err(DbErr)`: Database error
    pub async fn insert(&self, request: &AssistRequest) -> Result<(), DbErr> {
        entity::assist_request::ActiveModel {
            id: ActiveValue::Set(request.id),
            user_id: ActiveValue::Set(request.user_id.clone()),
            guild_id: ActiveValue::Set(request.guild_id.clone()),
            issue: ActiveValue::Set(request.issue.clone()),
            locale: ActiveValue::Set(request.locale.clone()),
            interaction_id: ActiveValue::Set(request.interaction_id.clone()),
            requested_at: ActiveValue::Set(request.requested_at),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Gets a request by its id, rehydrating thread and status rows.
    ///
    /// # Returns
    /// - `Ok(Some(request))`: The assembled request
    /// - `Ok(None)`: No request with that id
    /// - `Err(DbErr)`: Database error
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AssistRequest>, DbErr> {
        let Some(request) = entity::prelude::AssistRequest::find_by_id(id)
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        self.hydrate(request).await.map(Some)
    }

    /// Gets a request by the id of its support thread.
    ///
    /// # Returns
    /// - `Ok(Some(request))`: The assembled request
    /// - `Ok(None)`: No thread row references that thread id
    /// - `Err(DbErr)`: Database error
    pub async fn find_by_thread_id(&self, thread_id: &str) -> Result<Option<AssistRequest>, DbErr> {
        let Some(thread) = entity::prelude::AssistThread::find()
            .filter(entity::assist_thread::Column::ThreadId.eq(thread_id))
            .one(self.db)
            .await?
        else {
            return Ok(None);
        };

        self.find_by_id(thread.request_id).await
    }

    /// Gets the most recent requests of a user, newest first.
    ///
    /// # Arguments
    /// - `user_id`: Discord ID of the requester
    /// - `limit`: Maximum number of requests to return
    ///
    /// # Returns
    /// - `Ok(requests)`: Assembled requests, newest first
    /// - `Err(DbErr)`: Database error
    pub async fn find_recent_by_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> Result<Vec<AssistRequest>, DbErr> {
        let rows = entity::prelude::AssistRequest::find()
            .filter(entity::assist_request::Column::UserId.eq(user_id))
            .order_by_desc(entity::assist_request::Column::RequestedAt)
            .limit(limit)
            .all(self.db)
            .await?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in rows {
            requests.push(self.hydrate(row).await?);
        }

        Ok(requests)
    }

    /// Gets the user's request that is still searching for an assistant, if any.
    ///
    /// Searching means no thread row and no status row exist yet. The lookup is
    /// not scoped to a guild: one open request per user across all communities.
    ///
    /// # Returns
    /// - `Ok(Some(request))`: The user's open request
    /// - `Ok(None)`: The user has no open request
    /// - `Err(DbErr)`: Database error
    pub async fn find_searching_by_user(
        &self,
        user_id: &str,
    ) -> Result<Option<AssistRequest>, DbErr> {
        let request = entity::prelude::AssistRequest::find()
            .filter(entity::assist_request::Column::UserId.eq(user_id))
            .join(
                JoinType::LeftJoin,
                entity::assist_request::Relation::AssistThread.def(),
            )
            .join(
                JoinType::LeftJoin,
                entity::assist_request::Relation::AssistThreadStatus.def(),
            )
            .filter(entity::assist_thread::Column::RequestId.is_null())
            .filter(entity::assist_thread_status::Column::RequestId.is_null())
            .one(self.db)
            .await?;

        Ok(request.map(|row| AssistRequest::from_entities(row, None, None)))
    }

    /// Gets the user's requests that were created or closed since the given moment.
    ///
    /// Used for the per-day creation quotas, which count both what was opened
    /// today and what reached a terminal disposition today.
    ///
    /// # Arguments
    /// - `user_id`: Discord ID of the requester
    /// - `since`: Start of the UTC day under consideration
    ///
    /// # Returns
    /// - `Ok(requests)`: Assembled requests matching either bound
    /// - `Err(DbErr)`: Database error
    pub async fn find_daily_activity(
        &self,
        user_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<AssistRequest>, DbErr> {
        let rows = entity::prelude::AssistRequest::find()
            .filter(entity::assist_request::Column::UserId.eq(user_id))
            .join(
                JoinType::LeftJoin,
                entity::assist_request::Relation::AssistThreadStatus.def(),
            )
            .filter(
                Condition::any()
                    .add(entity::assist_request::Column::RequestedAt.gte(since))
                    .add(entity::assist_thread_status::Column::ClosedAt.gte(since)),
            )
            .all(self.db)
            .await?;

        let mut requests = Vec::with_capacity(rows.len());
        for row in rows {
            requests.push(self.hydrate(row).await?);
        }

        Ok(requests)
    }

    /// Records the acceptance of a request.
    ///
    /// Written exactly once per request; the primary key on the request id
    /// rejects a second acceptance at the storage layer as well.
    ///
    /// # Arguments
    /// - `request_id`: The accepted request
    /// - `thread_id`: Discord ID of the created support thread
    /// - `assistant_id`: Discord ID of the accepting assistant
    /// - `created_at`: Moment the thread was created
    ///
    /// # Returns
    /// - `Ok(())`: Thread row inserted
    /// - `Err(DbErr)`: Database error, including a second acceptance
    pub async fn insert_thread(
        &self,
        request_id: Uuid,
        thread_id: &str,
        assistant_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<(), DbErr> {
        entity::assist_thread::ActiveModel {
            request_id: ActiveValue::Set(request_id),
            thread_id: ActiveValue::Set(thread_id.to_string()),
            assistant_id: ActiveValue::Set(assistant_id.to_string()),
            created_at: ActiveValue::Set(created_at),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Records the terminal disposition of a request.
    ///
    /// # Arguments
    /// - `request_id`: The closed request
    /// - `closed_at`: Moment of the terminal transition
    /// - `requester_inactive`: Whether the requester went silent
    ///
    /// # Returns
    /// - `Ok(())`: Status row inserted
    /// - `Err(DbErr)`: Database error
    pub async fn insert_thread_status(
        &self,
        request_id: Uuid,
        closed_at: DateTime<Utc>,
        requester_inactive: bool,
    ) -> Result<(), DbErr> {
        entity::assist_thread_status::ActiveModel {
            request_id: ActiveValue::Set(request_id),
            closed_at: ActiveValue::Set(closed_at),
            requester_inactive: ActiveValue::Set(requester_inactive),
        }
        .insert(self.db)
        .await?;

        Ok(())
    }

    /// Loads the thread and status rows belonging to a request row.
    async fn hydrate(
        &self,
        request: entity::assist_request::Model,
    ) -> Result<AssistRequest, DbErr> {
        let thread = entity::prelude::AssistThread::find_by_id(request.id)
            .one(self.db)
            .await?;
        let status = entity::prelude::AssistThreadStatus::find_by_id(request.id)
            .one(self.db)
            .await?;

        Ok(AssistRequest::from_entities(request, thread, status))
    }
}

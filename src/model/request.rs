//! Assistance request domain model and status derivation.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::util::snowflake;

/// Maximum length of the free-text issue, enforced on ingestion.
pub const MAX_ISSUE_LENGTH: usize = 100;

/// How long a request may search for an assistant before a late closure
/// derives as expired rather than cancelled.
pub fn expiry_window() -> Duration {
    Duration::minutes(15)
}

/// Lifecycle status of an assistance request.
///
/// Never stored: always recomputed from the persisted fields so it cannot
/// drift out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    /// Waiting for an assistant to accept.
    Searching,
    /// Accepted; the support thread is open.
    Active,
    /// Closed by the assistant with the issue resolved.
    Solved,
    /// Closed by the assistant because the requester went silent.
    Inactive,
    /// Closed before an assistant accepted, within the expiry window.
    Cancelled,
    /// Closed before an assistant accepted, after the expiry window elapsed.
    Expired,
}

impl RequestStatus {
    /// Whether the status is a terminal disposition.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Searching | Self::Active)
    }
}

/// Reason an assistant closes an active request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Solved,
    Inactive,
}

/// A support ticket raised by a guild member seeking a human assistant.
///
/// Mutable lifecycle fields (`thread_id`, `assistant_id`, `closed_at`,
/// `requester_inactive`) are set at most once by the lifecycle operations;
/// everything else is immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistRequest {
    /// Opaque unique identifier, generated at creation and never reused.
    pub id: Uuid,
    /// Discord ID of the requester (stored as String).
    pub user_id: String,
    /// Discord ID of the guild the request was raised in (stored as String).
    pub guild_id: String,
    /// Free-text description of the problem, at most [`MAX_ISSUE_LENGTH`] chars.
    pub issue: String,
    /// Language tag deciding which assistant pool can serve the request.
    pub locale: String,
    /// Snowflake of the interaction that created the request. Its embedded
    /// timestamp anchors the expiry window.
    pub interaction_id: String,
    /// Timestamp when the request was created.
    pub requested_at: DateTime<Utc>,
    /// Discord ID of the support thread, set once on acceptance.
    pub thread_id: Option<String>,
    /// Timestamp paired with `thread_id`.
    pub thread_created_at: Option<DateTime<Utc>>,
    /// Discord ID of the accepting assistant, set once on acceptance.
    pub assistant_id: Option<String>,
    /// Timestamp of the terminal disposition, if any.
    pub closed_at: Option<DateTime<Utc>>,
    /// Distinguishes "solved" from "requester went silent" once closed.
    pub requester_inactive: bool,
    /// Token of the creating interaction, kept in memory only so the closing
    /// survey can be delivered through the original webhook while it lives.
    pub webhook_token: Option<String>,
}

impl AssistRequest {
    /// Rehydrates a request from its persisted rows.
    ///
    /// # Arguments
    /// - `request` - The request row
    /// - `thread` - The thread row written on acceptance, if any
    /// - `status` - The terminal disposition row, if any
    ///
    /// # Returns
    /// - `AssistRequest` - The assembled domain model
    pub fn from_entities(
        request: entity::assist_request::Model,
        thread: Option<entity::assist_thread::Model>,
        status: Option<entity::assist_thread_status::Model>,
    ) -> Self {
        Self {
            id: request.id,
            user_id: request.user_id,
            guild_id: request.guild_id,
            issue: request.issue,
            locale: request.locale,
            interaction_id: request.interaction_id,
            requested_at: request.requested_at,
            thread_id: thread.as_ref().map(|t| t.thread_id.clone()),
            thread_created_at: thread.as_ref().map(|t| t.created_at),
            assistant_id: thread.map(|t| t.assistant_id),
            closed_at: status.as_ref().map(|s| s.closed_at),
            requester_inactive: status.map(|s| s.requester_inactive).unwrap_or(false),
            webhook_token: None,
        }
    }

    /// The moment the creating interaction's id was minted.
    ///
    /// Falls back to `requested_at` when the stored id does not parse as a
    /// snowflake; the two are equal in practice.
    pub fn minted_at(&self) -> DateTime<Utc> {
        snowflake::minted_at(&self.interaction_id).unwrap_or(self.requested_at)
    }

    /// Derives the current lifecycle status from the persisted fields.
    ///
    /// A closure before acceptance derives as `Cancelled` when it happened
    /// inside the expiry window and as `Expired` when the window had already
    /// elapsed; a closure after acceptance derives as `Inactive` or `Solved`
    /// depending on the `requester_inactive` flag.
    pub fn status(&self) -> RequestStatus {
        match &self.thread_id {
            None => match self.closed_at {
                Some(closed_at) => {
                    if closed_at - self.minted_at() > expiry_window() {
                        RequestStatus::Expired
                    } else {
                        RequestStatus::Cancelled
                    }
                }
                None => RequestStatus::Searching,
            },
            Some(_) => match self.closed_at {
                Some(_) => {
                    if self.requester_inactive {
                        RequestStatus::Inactive
                    } else {
                        RequestStatus::Solved
                    }
                }
                None => RequestStatus::Active,
            },
        }
    }
}

/// Parameters for creating a new assistance request.
#[derive(Debug, Clone)]
pub struct CreateRequestParams {
    /// Discord ID of the requester.
    pub user_id: String,
    /// Discord ID of the guild the request is raised in.
    pub guild_id: String,
    /// Free-text description; truncated to [`MAX_ISSUE_LENGTH`] on ingestion.
    pub issue: String,
    /// Resolved language of the requester, or `None` when no language role
    /// could be resolved.
    pub locale: Option<String>,
    /// Snowflake of the creating interaction.
    pub interaction_id: String,
    /// Token of the creating interaction for follow-up delivery.
    pub webhook_token: Option<String>,
}

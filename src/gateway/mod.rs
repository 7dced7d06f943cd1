//! Narrow interface over the guild/thread surface of the Discord API.
//!
//! The request lifecycle only ever needs a handful of guild operations:
//! resolving members, roles and channels, managing the support thread, and
//! delivering messages. Putting them behind `SupportGateway` keeps the
//! lifecycle independent of the serenity client so it can be exercised
//! against an in-memory fake.

pub mod discord;

use async_trait::async_trait;
use thiserror::Error;

/// Error raised by gateway operations.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Discord API error from Serenity. Boxed due to large size.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),

    /// The gateway could not serve the operation.
    ///
    /// # Fields
    /// - Message describing the failed operation
    #[error("{0}")]
    Unavailable(String),
}

impl From<serenity::Error> for GatewayError {
    fn from(err: serenity::Error) -> Self {
        GatewayError::Discord(Box::new(err))
    }
}

/// A guild member as seen through the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayMember {
    /// Discord ID of the member.
    pub user_id: u64,
    /// Nickname if set, otherwise the account username.
    pub display_name: String,
    /// IDs of the roles the member currently holds.
    pub roles: Vec<u64>,
}

/// Guild and thread operations consumed by the request lifecycle.
#[async_trait]
pub trait SupportGateway: Send + Sync {
    /// Fetches a guild member.
    ///
    /// An unknown member is a distinct non-fatal case and resolves to
    /// `Ok(None)`; every other failure is an error.
    async fn fetch_member(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<GatewayMember>, GatewayError>;

    /// Resolves a guild role id by its exact name.
    async fn find_role_by_name(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<u64>, GatewayError>;

    /// Resolves a guild channel id by its exact name.
    async fn find_channel_by_name(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<u64>, GatewayError>;

    /// Creates a public thread under the given channel, returning its id.
    async fn create_thread(&self, channel_id: u64, name: &str) -> Result<u64, GatewayError>;

    /// Adds a member to a thread.
    async fn add_thread_member(&self, thread_id: u64, user_id: u64) -> Result<(), GatewayError>;

    /// Sends a plain message to a channel or thread, returning the message id.
    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError>;

    /// Archives and locks a thread.
    async fn archive_thread(&self, thread_id: u64) -> Result<(), GatewayError>;

    /// Grants a role to a guild member.
    async fn add_role(&self, guild_id: u64, user_id: u64, role_id: u64)
        -> Result<(), GatewayError>;

    /// Removes a role from a guild member.
    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError>;

    /// Sends an ephemeral follow-up through an interaction webhook token.
    ///
    /// Fails once the token has expired; callers treat delivery as
    /// best-effort.
    async fn send_followup(&self, interaction_token: &str, content: &str)
        -> Result<(), GatewayError>;
}

//! Serenity-backed implementation of the support gateway.

use async_trait::async_trait;
use serenity::all::{
    ChannelId, ChannelType, CreateMessage, CreateThread, EditThread, GuildId, RoleId, UserId,
};
use serenity::http::{Http, HttpError};
use std::sync::Arc;

use super::{GatewayError, GatewayMember, SupportGateway};

/// Discord JSON error code for an unknown guild member.
const UNKNOWN_MEMBER: isize = 10007;
/// Discord JSON error code for an unknown user.
const UNKNOWN_USER: isize = 10013;

/// Gateway implementation over the Discord HTTP API.
pub struct DiscordGateway {
    http: Arc<Http>,
}

impl DiscordGateway {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Whether the error means the requested member/user does not exist.
    fn is_unknown_member(err: &serenity::Error) -> bool {
        if let serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) = err {
            return response.error.code == UNKNOWN_MEMBER || response.error.code == UNKNOWN_USER;
        }
        false
    }
}

#[async_trait]
impl SupportGateway for DiscordGateway {
    async fn fetch_member(
        &self,
        guild_id: u64,
        user_id: u64,
    ) -> Result<Option<GatewayMember>, GatewayError> {
        match self
            .http
            .get_member(GuildId::new(guild_id), UserId::new(user_id))
            .await
        {
            Ok(member) => Ok(Some(GatewayMember {
                user_id,
                display_name: member.nick.clone().unwrap_or_else(|| member.user.name.clone()),
                roles: member.roles.iter().map(|role| role.get()).collect(),
            })),
            Err(err) if Self::is_unknown_member(&err) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn find_role_by_name(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<u64>, GatewayError> {
        let roles = self.http.get_guild_roles(GuildId::new(guild_id)).await?;

        Ok(roles
            .iter()
            .find(|role| role.name == name)
            .map(|role| role.id.get()))
    }

    async fn find_channel_by_name(
        &self,
        guild_id: u64,
        name: &str,
    ) -> Result<Option<u64>, GatewayError> {
        let channels = self.http.get_channels(GuildId::new(guild_id)).await?;

        Ok(channels
            .iter()
            .find(|channel| channel.name == name)
            .map(|channel| channel.id.get()))
    }

    async fn create_thread(&self, channel_id: u64, name: &str) -> Result<u64, GatewayError> {
        let thread = ChannelId::new(channel_id)
            .create_thread(
                &self.http,
                CreateThread::new(name).kind(ChannelType::PublicThread),
            )
            .await?;

        Ok(thread.id.get())
    }

    async fn add_thread_member(&self, thread_id: u64, user_id: u64) -> Result<(), GatewayError> {
        self.http
            .add_thread_channel_member(ChannelId::new(thread_id), UserId::new(user_id))
            .await?;

        Ok(())
    }

    async fn send_message(&self, channel_id: u64, content: &str) -> Result<u64, GatewayError> {
        let message = ChannelId::new(channel_id)
            .send_message(&self.http, CreateMessage::new().content(content))
            .await?;

        Ok(message.id.get())
    }

    async fn archive_thread(&self, thread_id: u64) -> Result<(), GatewayError> {
        ChannelId::new(thread_id)
            .edit_thread(&self.http, EditThread::new().archived(true).locked(true))
            .await?;

        Ok(())
    }

    async fn add_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        self.http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await?;

        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    ) -> Result<(), GatewayError> {
        self.http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                None,
            )
            .await?;

        Ok(())
    }

    async fn send_followup(
        &self,
        interaction_token: &str,
        content: &str,
    ) -> Result<(), GatewayError> {
        // Flag 64 marks the follow-up ephemeral.
        let map = serde_json::json!({ "content": content, "flags": 64 });

        self.http
            .create_followup_message(interaction_token, &map, vec![])
            .await?;

        Ok(())
    }
}

//! Authenticated Discord REST client used to validate custom bot tokens.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Public user flag marking a verified bot account.
pub const VERIFIED_BOT_FLAG: u64 = 1 << 16;
/// Application flag granting the message content intent.
pub const MESSAGE_CONTENT_INTENT_FLAG: u64 = 1 << 18;

const DISCORD_API_BASE_URL: &str = "https://discord.com/api/v10";

/// Error raised by token validation API calls.
#[derive(Error, Debug)]
pub enum BotApiError {
    /// The token was rejected with 401 Unauthorized.
    #[error("The bot token was rejected")]
    Unauthorized,

    /// The API rate limited the call twice in a row.
    ///
    /// A single 429 is retried after the server-provided delay; a second one
    /// propagates as a fault.
    #[error("Rate limited twice in a row, retry after {retry_after}s")]
    RateLimited {
        /// Server-provided delay of the second 429, in seconds
        retry_after: f64,
    },

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

/// The bot account behind a token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotAccount {
    pub id: String,
    pub username: String,
    /// Public user flags; bit 16 marks a verified bot.
    #[serde(default)]
    pub public_flags: u64,
}

/// The application a bot account belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotApplication {
    pub id: String,
    pub owner: ApplicationOwner,
    #[serde(default)]
    pub bot_public: bool,
    /// Application flags; bit 18 marks the message content intent.
    #[serde(default)]
    pub flags: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApplicationOwner {
    pub id: String,
}

/// A guild the bot account is a member of.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotGuild {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RetryAfter {
    retry_after: f64,
}

/// Discord REST operations performed with a custom bot's own token.
#[async_trait]
pub trait BotTokenApi: Send + Sync {
    /// Fetches the bot account the token authenticates as.
    async fn current_user(&self, token: &str) -> Result<BotAccount, BotApiError>;

    /// Fetches the application owning the bot account.
    async fn current_application(&self, token: &str) -> Result<BotApplication, BotApiError>;

    /// Fetches the guilds the bot account is currently a member of.
    async fn current_guilds(&self, token: &str) -> Result<Vec<BotGuild>, BotApiError>;

    /// Makes the bot account leave a guild.
    async fn leave_guild(&self, token: &str, guild_id: &str) -> Result<(), BotApiError>;
}

/// Production implementation over the Discord REST API.
pub struct DiscordBotApi {
    client: reqwest::Client,
    base_url: String,
}

impl DiscordBotApi {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: DISCORD_API_BASE_URL.to_string(),
        }
    }

    /// Overrides the API base URL; used to point tests at a local server.
    pub fn with_base_url(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }

    /// Issues the request, retrying a 429 exactly once after the
    /// server-provided delay. 401 maps to `Unauthorized`; any other
    /// unsuccessful status is an error.
    async fn send(
        &self,
        method: reqwest::Method,
        token: &str,
        path: &str,
    ) -> Result<reqwest::Response, BotApiError> {
        let mut retried = false;
        loop {
            let response = self
                .client
                .request(method.clone(), format!("{}/{}", self.base_url, path))
                .header("Authorization", format!("Bot {token}"))
                .send()
                .await?;

            match response.status() {
                StatusCode::UNAUTHORIZED => return Err(BotApiError::Unauthorized),
                StatusCode::TOO_MANY_REQUESTS => {
                    let retry_after = response
                        .json::<RetryAfter>()
                        .await
                        .map(|body| body.retry_after)
                        .unwrap_or(1.0);

                    if retried {
                        return Err(BotApiError::RateLimited { retry_after });
                    }
                    retried = true;
                    tokio::time::sleep(std::time::Duration::from_secs_f64(retry_after)).await;
                }
                _ => return Ok(response.error_for_status()?),
            }
        }
    }
}

#[async_trait]
impl BotTokenApi for DiscordBotApi {
    async fn current_user(&self, token: &str) -> Result<BotAccount, BotApiError> {
        let response = self
            .send(reqwest::Method::GET, token, "users/@me")
            .await?;

        Ok(response.json().await?)
    }

    async fn current_application(&self, token: &str) -> Result<BotApplication, BotApiError> {
        let response = self
            .send(reqwest::Method::GET, token, "applications/@me")
            .await?;

        Ok(response.json().await?)
    }

    async fn current_guilds(&self, token: &str) -> Result<Vec<BotGuild>, BotApiError> {
        let response = self
            .send(reqwest::Method::GET, token, "users/@me/guilds")
            .await?;

        Ok(response.json().await?)
    }

    async fn leave_guild(&self, token: &str, guild_id: &str) -> Result<(), BotApiError> {
        self.send(
            reqwest::Method::DELETE,
            token,
            &format!("users/@me/guilds/{guild_id}"),
        )
        .await?;

        Ok(())
    }
}

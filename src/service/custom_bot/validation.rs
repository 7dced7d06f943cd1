//! Three-stage validation pipeline for custom bot tokens.
//!
//! Stages run in order and the first failure aborts the pipeline: the bot
//! account stage (token works, account is not a verified bot), the
//! application stage (owned by the subscriber, public, message content
//! intent enabled), and the guild-count stage (within the tier's cap).
//! A rejected token also invalidates any stored record holding it, so a
//! stale subscription stops being started with a rotten token.

use sea_orm::DatabaseConnection;

use crate::{
    data::custom_bot::CustomBotRepository,
    error::{custom_bot::CustomBotError, AppError},
    model::custom_bot::Tier,
    service::custom_bot::api::{
        BotAccount, BotApiError, BotTokenApi, MESSAGE_CONTENT_INTENT_FLAG, VERIFIED_BOT_FLAG,
    },
};

/// Runs the custom bot token validation pipeline.
pub struct TokenValidator<'a> {
    db: &'a DatabaseConnection,
    api: &'a dyn BotTokenApi,
}

impl<'a> TokenValidator<'a> {
    pub fn new(db: &'a DatabaseConnection, api: &'a dyn BotTokenApi) -> Self {
        Self { db, api }
    }

    /// Validates a token for a subscriber under a tier.
    ///
    /// # Arguments
    /// - `user_id`: Discord ID of the subscribing user
    /// - `token`: Bot token to validate
    /// - `tier`: Tier whose guild cap applies
    ///
    /// # Returns
    /// - `Ok(BotAccount)`: The validated bot account
    /// - `Err(AppError::CustomBotErr)`: A stage rejected the token
    /// - `Err(AppError)`: Infrastructure fault during validation
    pub async fn validate(
        &self,
        user_id: &str,
        token: &str,
        tier: Tier,
    ) -> Result<BotAccount, AppError> {
        let account = self.validate_bot_account(token).await?;
        self.validate_application(user_id, token).await?;
        self.validate_guild_count(token, tier).await?;

        Ok(account)
    }

    /// Stage 1: the token must authenticate a non-verified bot account.
    async fn validate_bot_account(&self, token: &str) -> Result<BotAccount, AppError> {
        let account = match self.api.current_user(token).await {
            Ok(account) => account,
            Err(BotApiError::Unauthorized) => {
                self.invalidate(token).await?;
                return Err(CustomBotError::TokenInvalid.into());
            }
            Err(err) => return Err(err.into()),
        };

        if account.public_flags & VERIFIED_BOT_FLAG != 0 {
            return Err(CustomBotError::VerifiedBot.into());
        }

        Ok(account)
    }

    /// Stage 2: the application must be owned by the subscriber, public, and
    /// carry the message content intent.
    async fn validate_application(&self, user_id: &str, token: &str) -> Result<(), AppError> {
        let application = match self.api.current_application(token).await {
            Ok(application) => application,
            Err(BotApiError::Unauthorized) => {
                self.invalidate(token).await?;
                return Err(CustomBotError::TokenInvalid.into());
            }
            Err(err) => return Err(err.into()),
        };

        if application.owner.id != user_id {
            self.invalidate(token).await?;
            return Err(CustomBotError::NotApplicationOwner.into());
        }
        if !application.bot_public {
            return Err(CustomBotError::ApplicationNotPublic.into());
        }
        if application.flags & MESSAGE_CONTENT_INTENT_FLAG == 0 {
            return Err(CustomBotError::MissingIntent.into());
        }

        Ok(())
    }

    /// Stage 3: the bot must not exceed the tier's guild cap.
    async fn validate_guild_count(&self, token: &str, tier: Tier) -> Result<(), AppError> {
        let guilds = match self.api.current_guilds(token).await {
            Ok(guilds) => guilds,
            Err(BotApiError::Unauthorized) => return Err(CustomBotError::TokenInvalid.into()),
            Err(err) => return Err(err.into()),
        };

        if guilds.len() > tier.guild_cap {
            return Err(CustomBotError::GuildLimitExceeded {
                count: guilds.len(),
                cap: tier.guild_cap,
            }
            .into());
        }

        Ok(())
    }

    /// Marks any stored record holding the token as failed validation.
    async fn invalidate(&self, token: &str) -> Result<(), AppError> {
        CustomBotRepository::new(self.db)
            .invalidate_by_token(token)
            .await?;

        Ok(())
    }
}

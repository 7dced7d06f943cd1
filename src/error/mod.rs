//! Error types for the helpdesk bot.
//!
//! This module provides the application's error hierarchy. The `AppError` enum
//! serves as the top-level error type that wraps infrastructure errors and the
//! domain-specific error enums (`RequestError`, `CustomBotError`) raised by the
//! support-request lifecycle and the custom bot supervisor. Domain errors are
//! expected user-facing conditions; infrastructure errors indicate faults and
//! are logged before a generic message is shown to the user.

pub mod config;
pub mod custom_bot;
pub mod request;

use thiserror::Error;

use crate::error::{config::ConfigError, custom_bot::CustomBotError, request::RequestError};
use crate::gateway::GatewayError;
use crate::process::ProcessError;

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most
/// variants use `#[from]` for automatic error conversion. Domain errors
/// (`RequestErr`, `CustomBotErr`) carry their own user-facing messages and are
/// surfaced to the triggering interaction without being logged as errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Expected failure of a support-request operation (quota exceeded,
    /// request already accepted, requester left the guild, ...).
    #[error(transparent)]
    RequestErr(#[from] RequestError),

    /// Expected failure of a custom bot operation (invalid token, tier
    /// limit exceeded, bot not offline, ...).
    #[error(transparent)]
    CustomBotErr(#[from] CustomBotError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Guild/thread gateway error raised below the serenity surface.
    #[error(transparent)]
    GatewayErr(#[from] GatewayError),

    /// Process manager error while supervising custom bot child processes.
    #[error(transparent)]
    ProcessErr(#[from] ProcessError),

    /// HTTP client request error from reqwest.
    #[error(transparent)]
    ReqwestErr(#[from] reqwest::Error),

    /// Token validation REST call failed for a non-domain reason
    /// (repeated rate limiting, transport failure).
    #[error(transparent)]
    BotApiErr(#[from] crate::service::custom_bot::api::BotApiError),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Internal error with custom message.
    ///
    /// # Fields
    /// - Detailed error message for operator-side logging
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}

impl AppError {
    /// Returns the message to show the interacting user, when the error is an
    /// expected domain condition.
    ///
    /// Infrastructure errors return `None`; callers log those and reply with a
    /// generic failure message instead.
    pub fn user_message(&self) -> Option<String> {
        match self {
            Self::RequestErr(err) => Some(err.user_message()),
            Self::CustomBotErr(err) => Some(err.user_message()),
            _ => None,
        }
    }
}

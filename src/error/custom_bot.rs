use thiserror::Error;

/// Expected failures of custom bot management operations.
///
/// Raised by the token validation pipeline and the process supervisor and
/// surfaced to the subscriber as an ephemeral reply.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CustomBotError {
    /// The stored or provided token was rejected by Discord (401).
    #[error("The custom bot token is invalid")]
    TokenInvalid,

    /// The token belongs to a verified bot, which cannot be hosted.
    #[error("Verified bots cannot be added as custom bots")]
    VerifiedBot,

    /// The bot application is not owned by the subscribing user.
    #[error("The bot application is owned by another user")]
    NotApplicationOwner,

    /// The bot application has the public flag disabled.
    #[error("The bot application must be public")]
    ApplicationNotPublic,

    /// The bot application lacks the message content intent.
    #[error("The bot application is missing the message content intent")]
    MissingIntent,

    /// The bot is in more guilds than the subscription tier allows.
    #[error("The bot is in {count} guilds but the tier allows {cap}")]
    GuildLimitExceeded {
        /// Number of guilds the bot account is currently in
        count: usize,
        /// Guild cap of the subscription tier
        cap: usize,
    },

    /// The user already runs as many custom bots as the tier allows.
    #[error("Custom bot quantity limit reached for this tier")]
    QuotaExceeded,

    /// No custom bot exists for the given id.
    #[error("Custom bot not found")]
    NotFound,

    /// Start was requested while the bot is not offline.
    #[error("The custom bot is not offline")]
    NotOffline,
}

impl CustomBotError {
    /// Message shown to the interacting user.
    pub fn user_message(&self) -> String {
        match self {
            Self::TokenInvalid => {
                "That bot token is invalid. Reset the token in the Discord Developer Portal and try again.".to_string()
            }
            Self::VerifiedBot => "Verified bots cannot be hosted as custom bots.".to_string(),
            Self::NotApplicationOwner => {
                "You must be the owner of the bot application to host it.".to_string()
            }
            Self::ApplicationNotPublic => {
                "Enable the 'Public Bot' option for your application and try again.".to_string()
            }
            Self::MissingIntent => {
                "Enable the 'Message Content Intent' for your application and try again.".to_string()
            }
            Self::GuildLimitExceeded { count, cap } => format!(
                "Your bot is in {count} servers, but your tier allows at most {cap}. Remove it from some servers first."
            ),
            Self::QuotaExceeded => {
                "You already host the maximum number of custom bots for your tier.".to_string()
            }
            Self::NotFound => "No custom bot was found for your account.".to_string(),
            Self::NotOffline => "The custom bot is already starting or running.".to_string(),
        }
    }
}

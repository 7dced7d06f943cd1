use crate::error::{config::ConfigError, AppError};

pub struct Config {
    pub database_url: String,
    pub discord_bot_token: String,

    /// Path to the script spawned for each provisioned custom bot.
    pub custom_bot_script: String,

    /// Optional channel receiving an audit line for every closed request.
    pub audit_log_channel: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            custom_bot_script: std::env::var("CUSTOM_BOT_SCRIPT")
                .map_err(|_| ConfigError::MissingEnvVar("CUSTOM_BOT_SCRIPT".to_string()))?,
            audit_log_channel: match std::env::var("AUDIT_LOG_CHANNEL_ID") {
                Ok(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidEnvVar {
                    name: "AUDIT_LOG_CHANNEL_ID".to_string(),
                    value: raw.clone(),
                })?),
                Err(_) => None,
            },
        })
    }
}

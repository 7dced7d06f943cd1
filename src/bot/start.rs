use serenity::all::{Client, GatewayIntents};

use crate::bot::handler::Handler;
use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

/// Builds the Discord bot client.
///
/// # Arguments
/// - `config` - Application configuration containing the bot token
/// - `state` - Shared application state handed to the event handler
///
/// # Returns
/// - `Ok(Client)` - Client ready to be started
/// - `Err(AppError)` - Client initialization failed
pub async fn init_bot(config: &Config, state: AppState) -> Result<Client, AppError> {
    // Configure gateway intents - what events the bot will receive
    // GUILD_MEMBERS is a privileged intent - must be enabled in Discord Developer Portal
    let intents =
        GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::GUILD_MEMBERS;

    let client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(Handler::new(state))
        .await?;

    Ok(client)
}

/// Starts the Discord bot in a blocking manner
///
/// This function blocks until the bot shuts down, so it should be the last
/// thing the main task does after spawning background jobs.
///
/// # Arguments
/// - `client` - Client built by [`init_bot`]
///
/// # Returns
/// - `Ok(())` if the bot runs and shuts down cleanly
/// - `Err(AppError)` if the gateway connection fails
pub async fn start_bot(client: &mut Client) -> Result<(), AppError> {
    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}

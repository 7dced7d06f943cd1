use std::sync::Arc;

use serenity::http::Http;
use tracing_subscriber::EnvFilter;

use helpdesk::{
    bot::start,
    config::Config,
    error::AppError,
    gateway::discord::DiscordGateway,
    process::{local::LocalProcessManager, ProcessManager},
    scheduler::custom_bot_reconciliation,
    service::{
        custom_bot::{api::DiscordBotApi, CustomBotsManager},
        rate_limit::RateLimiter,
        request::registry::RequestRegistry,
    },
    startup,
    state::AppState,
};

/// Sliding window of the request-creation limiter.
const REQUEST_LIMIT_WINDOW_MILLIS: i64 = 120_000;
/// Hits admitted per user inside the window.
const REQUEST_LIMIT_CAPACITY: usize = 5;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    let db = startup::connect_to_database(&config).await?;

    let http_client = startup::setup_reqwest_client()?;
    let discord_http = Arc::new(Http::new(&config.discord_bot_token));

    let process_manager = Arc::new(LocalProcessManager::new());
    process_manager.connect().await?;

    let gateway = Arc::new(DiscordGateway::new(discord_http.clone()));
    let bot_api = Arc::new(DiscordBotApi::new(http_client));

    let requests = Arc::new(RequestRegistry::new(db.clone()));
    let request_limiter = Arc::new(RateLimiter::new(
        REQUEST_LIMIT_WINDOW_MILLIS,
        REQUEST_LIMIT_CAPACITY,
    ));
    let custom_bots = Arc::new(CustomBotsManager::new(
        db.clone(),
        bot_api,
        process_manager,
        config.custom_bot_script.clone(),
    ));

    tracing::info!("Starting helpdesk");

    // Start the daily custom bot reconciliation job
    let scheduler_manager = custom_bots.clone();
    tokio::spawn(async move {
        if let Err(e) = custom_bot_reconciliation::start_scheduler(scheduler_manager).await {
            tracing::error!("Custom bot reconciliation scheduler error: {}", e);
        }
    });

    let state = AppState::new(
        db,
        discord_http,
        gateway,
        requests,
        request_limiter,
        custom_bots,
        config.audit_log_channel,
    );

    let mut client = start::init_bot(&config, state).await?;
    start::start_bot(&mut client).await?;

    Ok(())
}
